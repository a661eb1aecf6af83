use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::currency::Currency as DomainCurrency;
use crate::domain::types::{CurrencyCode, TypeConstraintError};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::currency::Currency`].
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<Currency> for DomainCurrency {
    type Error = TypeConstraintError;

    fn try_from(currency: Currency) -> Result<Self, Self::Error> {
        Ok(Self {
            code: CurrencyCode::new(currency.code)?,
            name: currency.name,
            symbol: currency.symbol,
        })
    }
}
