//! Database models shared across the finance repository.

pub mod config;
pub mod currency;
pub mod expense_category;
pub mod money_account;
