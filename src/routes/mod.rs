//! HTTP handlers and the helpers they share.

use std::fmt::Display;

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::de::DeserializeOwned;
use tera::{Context, Tera};

use crate::context::{ContextError, RequestContext};
use crate::models::config::ServerConfig;
use crate::services::ServiceError;

pub mod expense_categories;
pub mod main;
pub mod money_accounts;

pub const NOT_ASSIGNED_PATH: &str = "/na";
pub const HX_REDIRECT_HEADER: &str = "HX-Redirect";

/// A group of routes mounted under one base path.
pub trait Controller {
    /// Base path, unique per controller.
    fn key(&self) -> &'static str;
    fn register(&self, cfg: &mut web::ServiceConfig);
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Redirect after a successful mutation; HTMX callers also get `HX-Redirect`.
pub fn redirect_after_mutation(location: &str, hx_request: bool) -> HttpResponse {
    let mut response = HttpResponse::SeeOther();
    response.insert_header((header::LOCATION, location));
    if hx_request {
        response.insert_header((HX_REDIRECT_HEADER, location));
    }
    response.finish()
}

/// 500 response; the error text is only exposed when configured.
pub fn internal_error(err: &dyn Display, config: &ServerConfig) -> HttpResponse {
    let body = if config.expose_error_details {
        err.to_string()
    } else {
        "Internal Server Error".to_string()
    };
    HttpResponse::InternalServerError()
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

/// Decodes an urlencoded body; malformed bodies get `400 Bad Request`.
pub fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, HttpResponse> {
    serde_html_form::from_bytes(body).map_err(|err| {
        log::warn!("Failed to decode form body: {err}");
        HttpResponse::BadRequest().body("Invalid form data")
    })
}

/// Maps a failed service call onto a response.
pub fn service_error_response(
    err: ServiceError,
    ctx: &RequestContext,
    config: &ServerConfig,
    action: &str,
) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            let message = ctx
                .localizer()
                .map(|localizer| localizer.t("flash.unauthorized"))
                .unwrap_or_else(|_| "Unauthorized".to_string());
            FlashMessage::error(message).send();
            redirect(NOT_ASSIGNED_PATH)
        }
        err => {
            log::error!("Failed to {action}: {err}");
            internal_error(&err, config)
        }
    }
}

pub fn context_error_response(err: ContextError, config: &ServerConfig) -> HttpResponse {
    log::error!("Incomplete request context: {err}");
    internal_error(&err, config)
}

/// Template context shared by every page: user, alerts, navigation, translations.
pub fn base_context(
    ctx: &RequestContext,
    flash_messages: &IncomingFlashMessages,
    config: &ServerConfig,
) -> Result<Context, ContextError> {
    let localizer = ctx.localizer()?;

    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", ctx.user());
    context.insert("nav_items", ctx.nav_items()?);
    context.insert("home_url", &config.auth_service_url);
    context.insert("locale", localizer.locale().code());
    context.insert("t", localizer.catalog());
    Ok(context)
}
