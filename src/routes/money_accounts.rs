//! Handlers for `/finance/accounts`.

use actix_web::middleware::from_fn;
use actix_web::{HttpResponse, guard, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::context::RequestContext;
use crate::domain::types::MoneyAccountId;
use crate::dto::CurrencyView;
use crate::forms::money_accounts::MoneyAccountForm;
use crate::forms::{FieldErrors, FormAction, ValidatedForm};
use crate::middleware::{RedirectUnauthorized, nav_items, provide_locale, with_transaction};
use crate::models::config::ServerConfig;
use crate::pagination::PaginationParams;
use crate::repository::DieselRepository;
use crate::routes::{
    Controller, base_context, context_error_response, parse_form, redirect_after_mutation,
    render_template, service_error_response,
};
use crate::services::currencies::list_currencies;
use crate::services::money_accounts::{self as accounts_service, BASE_PATH};

pub struct MoneyAccountsController;

impl Controller for MoneyAccountsController {
    fn key(&self) -> &'static str {
        BASE_PATH
    }

    fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope(self.key())
                .wrap(from_fn(nav_items))
                .wrap(from_fn(provide_locale))
                .wrap(RedirectUnauthorized)
                .service(web::resource(["", "/"]).guard(guard::Get()).to(list))
                .service(web::resource("/new").guard(guard::Get()).to(new_form))
                .service(web::resource(r"/{id:[0-9a-fA-F-]+}").guard(guard::Get()).to(edit_form))
                .service(
                    web::resource(["", "/"])
                        .guard(guard::Post())
                        .wrap(from_fn(with_transaction))
                        .to(create),
                )
                .service(
                    web::resource(r"/{id:[0-9a-fA-F-]+}")
                        .guard(guard::Post())
                        .wrap(from_fn(with_transaction))
                        .to(update),
                )
                .service(
                    web::resource(r"/{id:[0-9a-fA-F-]+}")
                        .guard(guard::Delete())
                        .wrap(from_fn(with_transaction))
                        .to(delete),
                ),
        );
    }
}

/// UUID from the path; strings that only look like one are unknown routes.
fn account_id(raw: &str) -> Result<MoneyAccountId, HttpResponse> {
    raw.parse::<MoneyAccountId>()
        .map_err(|_| HttpResponse::NotFound().finish())
}

fn page_context(
    ctx: &RequestContext,
    flash_messages: &IncomingFlashMessages,
    config: &ServerConfig,
) -> Result<Context, HttpResponse> {
    base_context(ctx, flash_messages, config).map_err(|err| context_error_response(err, config))
}

/// Context for re-rendering a form fragment with errors and the submitted values.
fn invalid_form_context(
    ctx: &RequestContext,
    flash_messages: &IncomingFlashMessages,
    config: &ServerConfig,
    form: &MoneyAccountForm,
    errors: &FieldErrors,
    currencies: &[CurrencyView],
) -> Result<Context, HttpResponse> {
    let mut context = page_context(ctx, flash_messages, config)?;
    context.insert("form", form);
    context.insert("errors", errors);
    context.insert("currencies", currencies);
    Ok(context)
}

pub async fn list(
    ctx: RequestContext,
    repo: DieselRepository,
    params: web::Query<PaginationParams>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> HttpResponse {
    let data = match accounts_service::load_index_page(&repo, ctx.user(), &params) {
        Ok(data) => data,
        Err(err) => {
            return service_error_response(err, &ctx, &server_config, "list money accounts");
        }
    };

    let mut context = match page_context(&ctx, &flash_messages, &server_config) {
        Ok(context) => context,
        Err(response) => return response,
    };
    context.insert("accounts", &data.accounts.items);
    context.insert("pagination", &data.accounts.pagination);

    let template = if ctx.is_hx_request() {
        "money_accounts/_table.html"
    } else {
        "money_accounts/index.html"
    };
    render_template(&tera, template, &context)
}

pub async fn new_form(
    ctx: RequestContext,
    repo: DieselRepository,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> HttpResponse {
    let data = match accounts_service::load_new_page(&repo, ctx.user()) {
        Ok(data) => data,
        Err(err) => return service_error_response(err, &ctx, &server_config, "load new form"),
    };

    let mut context = match page_context(&ctx, &flash_messages, &server_config) {
        Ok(context) => context,
        Err(response) => return response,
    };
    context.insert("form", &data.form);
    context.insert("errors", &FieldErrors::new());
    context.insert("currencies", &data.currencies);

    let template = if ctx.is_hx_request() {
        "money_accounts/_create_form.html"
    } else {
        "money_accounts/new.html"
    };
    render_template(&tera, template, &context)
}

pub async fn edit_form(
    ctx: RequestContext,
    repo: DieselRepository,
    path: web::Path<String>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> HttpResponse {
    let id = match account_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let data = match accounts_service::load_edit_page(&repo, ctx.user(), id) {
        Ok(data) => data,
        Err(err) => {
            return service_error_response(err, &ctx, &server_config, "load money account");
        }
    };

    let mut context = match page_context(&ctx, &flash_messages, &server_config) {
        Ok(context) => context,
        Err(response) => return response,
    };
    context.insert("id", &data.account.id);
    context.insert("account", &data.account);
    context.insert("form", &data.form);
    context.insert("errors", &FieldErrors::new());
    context.insert("currencies", &data.currencies);

    let template = if ctx.is_hx_request() {
        "money_accounts/_edit_form.html"
    } else {
        "money_accounts/edit.html"
    };
    render_template(&tera, template, &context)
}

pub async fn create(
    ctx: RequestContext,
    repo: DieselRepository,
    body: web::Bytes,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> HttpResponse {
    let form: MoneyAccountForm = match parse_form(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };
    let localizer = match ctx.localizer() {
        Ok(localizer) => *localizer,
        Err(err) => return context_error_response(err, &server_config),
    };

    let currencies = match list_currencies(&repo, ctx.user()) {
        Ok(currencies) => currencies,
        Err(err) => return service_error_response(err, &ctx, &server_config, "load currencies"),
    };

    let (errors, ok) = form.ok_with_currencies(&localizer, &currencies);
    if !ok {
        return match invalid_form_context(
            &ctx,
            &flash_messages,
            &server_config,
            &form,
            &errors,
            &currencies,
        ) {
            Ok(context) => render_template(&tera, "money_accounts/_create_form.html", &context),
            Err(response) => response,
        };
    }

    let hub_id = match ctx.tenant_id() {
        Ok(hub_id) => hub_id,
        Err(err) => return context_error_response(err, &server_config),
    };

    match accounts_service::create(&repo, ctx.user(), hub_id, &form) {
        Ok(_) => {
            FlashMessage::success(localizer.t("flash.created")).send();
            redirect_after_mutation(BASE_PATH, ctx.is_hx_request())
        }
        Err(err) => service_error_response(err, &ctx, &server_config, "create money account"),
    }
}

pub async fn update(
    ctx: RequestContext,
    repo: DieselRepository,
    path: web::Path<String>,
    body: web::Bytes,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    server_config: web::Data<ServerConfig>,
) -> HttpResponse {
    let id = match account_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let form: MoneyAccountForm = match parse_form(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };
    let localizer = match ctx.localizer() {
        Ok(localizer) => *localizer,
        Err(err) => return context_error_response(err, &server_config),
    };

    match form.action() {
        Ok(FormAction::Save) => {}
        Ok(FormAction::Delete) => return delete_account(&ctx, &repo, &server_config, id),
        Err(_) => return HttpResponse::BadRequest().body("Invalid action"),
    }

    let currencies = match list_currencies(&repo, ctx.user()) {
        Ok(currencies) => currencies,
        Err(err) => return service_error_response(err, &ctx, &server_config, "load currencies"),
    };

    let (errors, ok) = form.ok_with_currencies(&localizer, &currencies);
    if !ok {
        return match invalid_form_context(
            &ctx,
            &flash_messages,
            &server_config,
            &form,
            &errors,
            &currencies,
        ) {
            Ok(mut context) => {
                context.insert("id", &id.to_string());
                render_template(&tera, "money_accounts/_edit_form.html", &context)
            }
            Err(response) => response,
        };
    }

    match accounts_service::update(&repo, ctx.user(), id, &form) {
        Ok(_) => {
            FlashMessage::success(localizer.t("flash.updated")).send();
            redirect_after_mutation(BASE_PATH, ctx.is_hx_request())
        }
        Err(err) => service_error_response(err, &ctx, &server_config, "update money account"),
    }
}

pub async fn delete(
    ctx: RequestContext,
    repo: DieselRepository,
    path: web::Path<String>,
    server_config: web::Data<ServerConfig>,
) -> HttpResponse {
    match account_id(&path) {
        Ok(id) => delete_account(&ctx, &repo, &server_config, id),
        Err(response) => response,
    }
}

fn delete_account(
    ctx: &RequestContext,
    repo: &DieselRepository,
    server_config: &ServerConfig,
    id: MoneyAccountId,
) -> HttpResponse {
    match accounts_service::delete(repo, ctx.user(), id) {
        Ok(()) => {
            if let Ok(localizer) = ctx.localizer() {
                FlashMessage::success(localizer.t("flash.deleted")).send();
            }
            redirect_after_mutation(BASE_PATH, ctx.is_hx_request())
        }
        Err(err) => service_error_response(err, ctx, server_config, "delete money account"),
    }
}
