use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::domain::types::TypeConstraintError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid stored value: {0}")]
    Validation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                let constraint = match kind {
                    DatabaseErrorKind::UniqueViolation => "Unique",
                    DatabaseErrorKind::ForeignKeyViolation => "Foreign key",
                    DatabaseErrorKind::NotNullViolation => "Not null",
                    DatabaseErrorKind::CheckViolation => "Check",
                    _ => return RepositoryError::Database(message),
                };
                RepositoryError::ConstraintViolation(format!(
                    "{constraint} constraint violation: {message}"
                ))
            }
            DieselError::DeserializationError(e) => {
                RepositoryError::Validation(format!("Deserialization error: {e}"))
            }
            other => RepositoryError::Database(other.to_string()),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        RepositoryError::Connection(err.to_string())
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        RepositoryError::Connection(err.to_string())
    }
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(err: TypeConstraintError) -> Self {
        RepositoryError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        assert!(matches!(
            RepositoryError::from(DieselError::NotFound),
            RepositoryError::NotFound
        ));
    }

    #[test]
    fn rollback_maps_to_database_error() {
        assert!(matches!(
            RepositoryError::from(DieselError::RollbackTransaction),
            RepositoryError::Database(_)
        ));
    }

    #[test]
    fn type_constraint_maps_to_validation() {
        let err = RepositoryError::from(TypeConstraintError::InvalidUuid);
        assert_eq!(err.to_string(), "Invalid stored value: invalid uuid value");
    }
}
