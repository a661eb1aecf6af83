use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{AccountName, Amount, CurrencyCode, Description, HubId, MoneyAccountId};

/// Cash desk or bank account holding money in a single currency.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MoneyAccount {
    pub id: MoneyAccountId,
    pub hub_id: HubId,
    pub name: AccountName,
    pub account_number: String,
    pub description: Description,
    pub balance: Amount,
    pub currency_code: CurrencyCode,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Values required to insert an account. The identifier is generated here,
/// not by the database.
#[derive(Clone, Debug, PartialEq)]
pub struct NewMoneyAccount {
    pub id: MoneyAccountId,
    pub hub_id: HubId,
    pub name: AccountName,
    pub account_number: String,
    pub description: Description,
    pub balance: Amount,
    pub currency_code: CurrencyCode,
}

impl NewMoneyAccount {
    #[must_use]
    pub fn new(
        hub_id: HubId,
        name: AccountName,
        account_number: String,
        description: Description,
        balance: Amount,
        currency_code: CurrencyCode,
    ) -> Self {
        Self {
            id: MoneyAccountId::new(),
            hub_id,
            name,
            account_number: account_number.trim().to_string(),
            description,
            balance,
            currency_code,
        }
    }
}
