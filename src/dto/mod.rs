//! View models and page data handed from services to templates.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::currency::Currency;

pub mod expense_categories;
pub mod money_accounts;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

pub(crate) fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Option shown in currency selects.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CurrencyView {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl From<&Currency> for CurrencyView {
    fn from(currency: &Currency) -> Self {
        Self {
            code: currency.code.to_string(),
            name: currency.name.clone(),
            symbol: currency.symbol.clone(),
        }
    }
}
