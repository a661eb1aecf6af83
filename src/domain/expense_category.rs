use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    Amount, CategoryName, CurrencyCode, Description, ExpenseCategoryId, HubId,
};

/// Budget category that expenses are booked against.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExpenseCategory {
    pub id: ExpenseCategoryId,
    pub hub_id: HubId,
    pub name: CategoryName,
    pub description: Option<Description>,
    pub amount: Amount,
    pub currency_code: CurrencyCode,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Values required to insert a category; timestamps come from the database.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpenseCategory {
    pub hub_id: HubId,
    pub name: CategoryName,
    pub description: Option<Description>,
    pub amount: Amount,
    pub currency_code: CurrencyCode,
}

impl NewExpenseCategory {
    #[must_use]
    pub fn new(
        hub_id: HubId,
        name: CategoryName,
        description: Option<Description>,
        amount: Amount,
        currency_code: CurrencyCode,
    ) -> Self {
        Self {
            hub_id,
            name,
            description,
            amount,
            currency_code,
        }
    }
}
