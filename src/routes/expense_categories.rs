//! Handlers for `/finance/expense-categories`.

use actix_web::middleware::from_fn;
use actix_web::{HttpResponse, guard, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::{Context, Tera};

use crate::context::RequestContext;
use crate::domain::types::ExpenseCategoryId;
use crate::dto::CurrencyView;
use crate::forms::expense_categories::ExpenseCategoryForm;
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
use crate::services::expense_categories::{self as categories_service, BASE_PATH};

pub struct ExpenseCategoriesController;

impl Controller for ExpenseCategoriesController {
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
                .service(web::resource(r"/{id:\d+}").guard(guard::Get()).to(edit_form))
                .service(
                    web::resource(["", "/"])
                        .guard(guard::Post())
                        .wrap(from_fn(with_transaction))
                        .to(create),
                )
                .service(
                    web::resource(r"/{id:\d+}")
                        .guard(guard::Post())
                        .wrap(from_fn(with_transaction))
                        .to(update),
                )
                .service(
                    web::resource(r"/{id:\d+}")
                        .guard(guard::Delete())
                        .wrap(from_fn(with_transaction))
                        .to(delete),
                ),
        );
    }
}

/// Numeric id from the path; zero and overflow are treated as unknown routes.
fn category_id(raw: &str) -> Result<ExpenseCategoryId, HttpResponse> {
    raw.parse::<i32>()
        .ok()
        .and_then(|id| ExpenseCategoryId::new(id).ok())
        .ok_or_else(|| HttpResponse::NotFound().finish())
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
    form: &ExpenseCategoryForm,
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
    let data = match categories_service::load_index_page(&repo, ctx.user(), &params) {
        Ok(data) => data,
        Err(err) => {
            return service_error_response(err, &ctx, &server_config, "list expense categories");
        }
    };

    let mut context = match page_context(&ctx, &flash_messages, &server_config) {
        Ok(context) => context,
        Err(response) => return response,
    };
    context.insert("categories", &data.categories.items);
    context.insert("pagination", &data.categories.pagination);

    let template = if ctx.is_hx_request() {
        "expense_categories/_table.html"
    } else {
        "expense_categories/index.html"
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
    let data = match categories_service::load_new_page(&repo, ctx.user()) {
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
        "expense_categories/_create_form.html"
    } else {
        "expense_categories/new.html"
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
    let id = match category_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let data = match categories_service::load_edit_page(&repo, ctx.user(), id) {
        Ok(data) => data,
        Err(err) => {
            return service_error_response(err, &ctx, &server_config, "load expense category");
        }
    };

    let mut context = match page_context(&ctx, &flash_messages, &server_config) {
        Ok(context) => context,
        Err(response) => return response,
    };
    context.insert("id", &data.category.id);
    context.insert("category", &data.category);
    context.insert("form", &data.form);
    context.insert("errors", &FieldErrors::new());
    context.insert("currencies", &data.currencies);

    let template = if ctx.is_hx_request() {
        "expense_categories/_edit_form.html"
    } else {
        "expense_categories/edit.html"
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
    let form: ExpenseCategoryForm = match parse_form(&body) {
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
            Ok(context) => render_template(&tera, "expense_categories/_create_form.html", &context),
            Err(response) => response,
        };
    }

    let hub_id = match ctx.tenant_id() {
        Ok(hub_id) => hub_id,
        Err(err) => return context_error_response(err, &server_config),
    };

    match categories_service::create(&repo, ctx.user(), hub_id, &form) {
        Ok(_) => {
            FlashMessage::success(localizer.t("flash.created")).send();
            redirect_after_mutation(BASE_PATH, ctx.is_hx_request())
        }
        Err(err) => service_error_response(err, &ctx, &server_config, "create expense category"),
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
    let id = match category_id(&path) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let form: ExpenseCategoryForm = match parse_form(&body) {
        Ok(form) => form,
        Err(response) => return response,
    };
    let localizer = match ctx.localizer() {
        Ok(localizer) => *localizer,
        Err(err) => return context_error_response(err, &server_config),
    };

    match form.action() {
        Ok(FormAction::Save) => {}
        Ok(FormAction::Delete) => return delete_category(&ctx, &repo, &server_config, id),
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
                context.insert("id", &id.get());
                render_template(&tera, "expense_categories/_edit_form.html", &context)
            }
            Err(response) => response,
        };
    }

    match categories_service::update(&repo, ctx.user(), id, &form) {
        Ok(_) => {
            FlashMessage::success(localizer.t("flash.updated")).send();
            redirect_after_mutation(BASE_PATH, ctx.is_hx_request())
        }
        Err(err) => service_error_response(err, &ctx, &server_config, "update expense category"),
    }
}

pub async fn delete(
    ctx: RequestContext,
    repo: DieselRepository,
    path: web::Path<String>,
    server_config: web::Data<ServerConfig>,
) -> HttpResponse {
    match category_id(&path) {
        Ok(id) => delete_category(&ctx, &repo, &server_config, id),
        Err(response) => response,
    }
}

fn delete_category(
    ctx: &RequestContext,
    repo: &DieselRepository,
    server_config: &ServerConfig,
    id: ExpenseCategoryId,
) -> HttpResponse {
    match categories_service::delete(repo, ctx.user(), id) {
        Ok(()) => {
            if let Ok(localizer) = ctx.localizer() {
                FlashMessage::success(localizer.t("flash.deleted")).send();
            }
            redirect_after_mutation(BASE_PATH, ctx.is_hx_request())
        }
        Err(err) => service_error_response(err, ctx, server_config, "delete expense category"),
    }
}
