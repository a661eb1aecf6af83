//! Domain aggregates exposed by the finance service layer.

pub mod auth;
pub mod currency;
pub mod expense_category;
pub mod money_account;
pub mod types;
