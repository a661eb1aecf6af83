//! Business logic between the HTTP handlers and the repository.
//!
//! Every service takes the repository as a generic `&R` bounded by the
//! reader/writer traits it needs, so tests can pass a mock instead of the
//! Diesel implementation.

use thiserror::Error;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::{HubId, TypeConstraintError};
use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod currencies;
pub mod expense_categories;
pub mod money_accounts;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("form error: {0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<TypeConstraintError> for ServiceError {
    fn from(err: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(err.to_string())
    }
}

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless the user holds `role`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if user.has_role(role) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Tenant of the signed-in user.
pub fn user_hub(user: &AuthenticatedUser) -> ServiceResult<HubId> {
    Ok(HubId::new(user.hub_id)?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{NaiveDate, NaiveDateTime};

    use crate::SERVICE_ACCESS_ROLE;
    use crate::domain::auth::AuthenticatedUser;
    use crate::domain::types::HubId;

    pub fn hub() -> HubId {
        HubId::new(42).unwrap()
    }

    pub fn finance_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "accountant@example.com".to_string(),
            hub_id: 42,
            name: "Accountant".to_string(),
            roles: vec![SERVICE_ACCESS_ROLE.to_string()],
            exp: 0,
        }
    }

    pub fn outsider_user() -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "2".to_string(),
            email: "viewer@example.com".to_string(),
            hub_id: 42,
            name: "Viewer".to_string(),
            roles: vec!["crm".to_string()],
            exp: 0,
        }
    }

    pub fn timestamp(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_not_found_becomes_service_not_found() {
        assert!(matches!(
            ServiceError::from(RepositoryError::NotFound),
            ServiceError::NotFound
        ));
        assert!(matches!(
            ServiceError::from(RepositoryError::Database("boom".into())),
            ServiceError::Repository(_)
        ));
    }

    #[test]
    fn role_is_required() {
        assert!(ensure_role(&test_support::finance_user(), crate::SERVICE_ACCESS_ROLE).is_ok());
        assert!(matches!(
            ensure_role(&test_support::outsider_user(), crate::SERVICE_ACCESS_ROLE),
            Err(ServiceError::Unauthorized)
        ));
    }
}
