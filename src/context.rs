//! Request-scoped values handed to handlers through extractors.
//!
//! Middleware in [`crate::middleware`] stores the locale and navigation
//! entries in the request extensions; [`RequestContext`] collects them
//! together with the signed-in user.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest, web};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use thiserror::Error;

use crate::db::{DbPool, SharedTransaction};
use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{HubId, TypeConstraintError};
use crate::i18n::Localizer;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;

pub const HX_REQUEST_HEADER: &str = "Hx-Request";

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("request context is missing {0}")]
    Missing(&'static str),

    #[error("invalid tenant: {0}")]
    InvalidTenant(#[from] TypeConstraintError),
}

/// Entry of the top navigation bar.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NavItem {
    /// Catalog key of the label.
    pub label: &'static str,
    pub url: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavItems(pub Vec<NavItem>);

/// Encodes the user as an HS256 token, the format stored in the identity cookie.
pub fn encode_token(
    user: &AuthenticatedUser,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(),
        user,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn decode_token(
    token: &str,
    secret: &str,
) -> Result<AuthenticatedUser, jsonwebtoken::errors::Error> {
    decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let config = req
        .app_data::<web::Data<ServerConfig>>()
        .ok_or_else(|| ErrorInternalServerError("server configuration is not registered"))?;

    let identity = req
        .get_identity()
        .map_err(|_| ErrorUnauthorized("not signed in"))?;
    let token = identity.id().map_err(ErrorUnauthorized)?;

    decode_token(&token, &config.secret).map_err(|err| {
        log::warn!("Rejected identity token: {err}");
        ErrorUnauthorized("invalid identity")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Repository bound to the request's open transaction when there is one.
impl FromRequest for DieselRepository {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(pool) = req.app_data::<web::Data<DbPool>>() else {
            return ready(Err(ErrorInternalServerError(
                "database pool is not registered",
            )));
        };
        let pool = pool.get_ref().clone();

        let repo = match req.extensions().get::<SharedTransaction>() {
            Some(transaction) => DieselRepository::with_transaction(pool, transaction.clone()),
            None => DieselRepository::new(pool),
        };

        ready(Ok(repo))
    }
}

/// Whether the request came from HTMX and expects a fragment.
pub fn is_hx_request(req: &HttpRequest) -> bool {
    req.headers()
        .get(HX_REQUEST_HEADER)
        .is_some_and(|value| !value.is_empty())
}

/// Everything a handler needs to know about the caller.
#[derive(Debug, Clone)]
pub struct RequestContext {
    user: AuthenticatedUser,
    localizer: Option<Localizer>,
    nav_items: Option<NavItems>,
    hx_request: bool,
}

impl RequestContext {
    pub fn new(
        user: AuthenticatedUser,
        localizer: Option<Localizer>,
        nav_items: Option<NavItems>,
        hx_request: bool,
    ) -> Self {
        Self {
            user,
            localizer,
            nav_items,
            hx_request,
        }
    }

    pub fn user(&self) -> &AuthenticatedUser {
        &self.user
    }

    pub fn tenant_id(&self) -> Result<HubId, ContextError> {
        Ok(HubId::new(self.user.hub_id)?)
    }

    pub fn localizer(&self) -> Result<&Localizer, ContextError> {
        self.localizer.as_ref().ok_or(ContextError::Missing("localizer"))
    }

    pub fn nav_items(&self) -> Result<&[NavItem], ContextError> {
        self.nav_items
            .as_ref()
            .map(|items| items.0.as_slice())
            .ok_or(ContextError::Missing("navigation"))
    }

    pub fn is_hx_request(&self) -> bool {
        self.hx_request
    }
}

impl FromRequest for RequestContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let context = authenticate(req).map(|user| {
            let extensions = req.extensions();
            RequestContext::new(
                user,
                extensions.get::<Localizer>().copied(),
                extensions.get::<NavItems>().cloned(),
                is_hx_request(req),
            )
        });
        ready(context)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::i18n::Locale;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "7".to_string(),
            email: "user@example.com".to_string(),
            hub_id: 3,
            name: "User".to_string(),
            roles: vec!["finance".to_string()],
            exp: 4_102_444_800,
        }
    }

    #[test]
    fn token_round_trip() {
        let token = encode_token(&user(), "secret").unwrap();
        assert_eq!(decode_token(&token, "secret").unwrap(), user());
        assert!(decode_token(&token, "other").is_err());
    }

    #[test]
    fn accessors_report_missing_values() {
        let context = RequestContext::new(user(), None, None, false);

        assert_eq!(context.tenant_id().unwrap().get(), 3);
        assert!(matches!(
            context.localizer(),
            Err(ContextError::Missing("localizer"))
        ));
        assert!(context.nav_items().is_err());

        let context = RequestContext::new(
            AuthenticatedUser {
                hub_id: 0,
                ..user()
            },
            Some(Localizer::new(Locale::Ru)),
            Some(NavItems::default()),
            true,
        );
        assert!(matches!(
            context.tenant_id(),
            Err(ContextError::InvalidTenant(_))
        ));
        assert_eq!(context.localizer().unwrap().locale(), Locale::Ru);
        assert!(context.is_hx_request());
    }

    #[test]
    fn hx_header_detection() {
        let req = TestRequest::default()
            .insert_header((HX_REQUEST_HEADER, "true"))
            .to_http_request();
        assert!(is_hx_request(&req));

        let req = TestRequest::default().to_http_request();
        assert!(!is_hx_request(&req));
    }
}
