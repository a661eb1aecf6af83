use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::context::RequestContext;
use crate::models::config::ServerConfig;
use crate::routes::{base_context, context_error_response, redirect, render_template};
use crate::services::expense_categories::BASE_PATH as EXPENSE_CATEGORIES_PATH;

#[get("/")]
pub async fn index() -> impl Responder {
    redirect(EXPENSE_CATEGORIES_PATH)
}

#[get("/na")]
pub async fn not_assigned(
    ctx: RequestContext,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> HttpResponse {
    match base_context(&ctx, &flash_messages, &server_config) {
        Ok(context) => render_template(&tera, "main/not_assigned.html", &context),
        Err(err) => context_error_response(err, &server_config),
    }
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
