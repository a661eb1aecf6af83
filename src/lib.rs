//! Finance module of the pushkind suite: expense categories and money
//! accounts managed through server-rendered pages.

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_identity::IdentityMiddleware;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::Key;
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger, from_fn};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::db::establish_connection_pool;
#[cfg(feature = "server")]
use crate::middleware::{RedirectUnauthorized, nav_items, provide_locale};
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::routes::Controller;
#[cfg(feature = "server")]
use crate::routes::expense_categories::ExpenseCategoriesController;
#[cfg(feature = "server")]
use crate::routes::main::{index, logout, not_assigned};
#[cfg(feature = "server")]
use crate::routes::money_accounts::MoneyAccountsController;

pub mod db;
pub mod domain;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod context;
#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod i18n;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

pub const SERVICE_ACCESS_ROLE: &str = "finance";

/// Every controller mounted by [`run`], in registration order.
#[cfg(feature = "server")]
pub fn controllers() -> Vec<Box<dyn Controller>> {
    vec![
        Box::new(ExpenseCategoriesController),
        Box::new(MoneyAccountsController),
    ]
}

/// Registers the finance controllers and the supporting pages.
///
/// The catch-all scope comes last so it cannot shadow the controllers.
#[cfg(feature = "server")]
pub fn configure(cfg: &mut web::ServiceConfig) {
    for controller in controllers() {
        log::debug!("Registering controller {}", controller.key());
        controller.register(cfg);
    }

    cfg.service(
        web::scope("")
            .wrap(from_fn(nav_items))
            .wrap(from_fn(provide_locale))
            .wrap(RedirectUnauthorized)
            .service(index)
            .service(not_assigned)
            .service(logout),
    );
}

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    // Establish Diesel connection pool for the SQLite database.
    let pool = establish_connection_pool(&server_config.database_url).map_err(|e| {
        std::io::Error::other(format!("Failed to establish database connection: {e}"))
    })?;

    // Keys and stores for identity, sessions, and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{}", server_config.domain)))
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .configure(configure)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
