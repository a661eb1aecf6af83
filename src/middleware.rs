//! Middleware shared by the finance scopes.

use std::future::{Ready, ready};
use std::pin::Pin;

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::error::ErrorInternalServerError;
use actix_web::http::{StatusCode, header};
use actix_web::middleware::Next;
use actix_web::{Error, HttpMessage, HttpRequest, HttpResponse, web};

use crate::context::{NavItem, NavItems};
use crate::db::{DbPool, SharedTransaction};
use crate::i18n::{LOCALE_COOKIE, Locale, Localizer};
use crate::services::{expense_categories, money_accounts};

pub const SIGNIN_PATH: &str = "/auth/signin";

/// Turns `401 Unauthorized` responses into a redirect to the sign-in page.
pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware { service }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;

            if res.status() != StatusCode::UNAUTHORIZED {
                return Ok(res.map_into_left_body());
            }

            let (req, _) = res.into_parts();
            let redirect = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, SIGNIN_PATH))
                .finish()
                .map_into_right_body();

            Ok(ServiceResponse::new(req, redirect))
        })
    }
}

/// Locale from the `lang` cookie, then `Accept-Language`, then English.
pub fn resolve_locale(req: &HttpRequest) -> Locale {
    req.cookie(LOCALE_COOKIE)
        .and_then(|cookie| Locale::from_code(cookie.value()))
        .or_else(|| {
            req.headers()
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok())
                .and_then(Locale::from_accept_language)
        })
        .unwrap_or_default()
}

pub async fn provide_locale(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let locale = resolve_locale(req.request());
    req.extensions_mut().insert(Localizer::new(locale));
    next.call(req).await
}

const NAVIGATION: &[(&str, &str)] = &[
    ("nav.expense_categories", expense_categories::BASE_PATH),
    ("nav.money_accounts", money_accounts::BASE_PATH),
];

pub fn navigation_for(path: &str) -> NavItems {
    NavItems(
        NAVIGATION
            .iter()
            .map(|&(label, url)| NavItem {
                label,
                url,
                active: path.starts_with(url),
            })
            .collect(),
    )
}

pub async fn nav_items(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let items = navigation_for(req.path());
    req.extensions_mut().insert(items);
    next.call(req).await
}

/// Runs the handler inside one database transaction.
///
/// The transaction commits unless the handler fails or answers with a 5xx
/// status, in which case it is rolled back.
pub async fn with_transaction(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let pool = req
        .app_data::<web::Data<DbPool>>()
        .ok_or_else(|| ErrorInternalServerError("database pool is not registered"))?
        .clone();

    let transaction = SharedTransaction::begin(&pool).map_err(|err| {
        log::error!("Failed to begin transaction: {err}");
        ErrorInternalServerError("failed to begin transaction")
    })?;
    req.extensions_mut().insert(transaction.clone());

    let result = next.call(req).await;

    match &result {
        Ok(res) if !res.status().is_server_error() => {
            transaction.commit().map_err(|err| {
                log::error!("Failed to commit transaction: {err}");
                ErrorInternalServerError("failed to commit transaction")
            })?;
        }
        _ => {
            if let Err(err) = transaction.rollback() {
                log::error!("Failed to roll back transaction: {err}");
            }
        }
    }

    result
}
