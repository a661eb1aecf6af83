use serde::Serialize;

use crate::domain::money_account::MoneyAccount;
use crate::dto::{CurrencyView, format_timestamp};
use crate::forms::money_accounts::MoneyAccountForm;
use crate::pagination::Paginated;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MoneyAccountView {
    pub id: String,
    pub name: String,
    pub account_number: String,
    pub description: String,
    pub balance: String,
    pub currency_code: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&MoneyAccount> for MoneyAccountView {
    fn from(account: &MoneyAccount) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.to_string(),
            account_number: account.account_number.clone(),
            description: account.description.to_string(),
            balance: account.balance.to_string(),
            currency_code: account.currency_code.to_string(),
            created_at: format_timestamp(&account.created_at),
            updated_at: format_timestamp(&account.updated_at),
        }
    }
}

#[derive(Debug)]
pub struct MoneyAccountsPageData {
    pub accounts: Paginated<MoneyAccountView>,
}

#[derive(Debug)]
pub struct NewMoneyAccountPageData {
    pub form: MoneyAccountForm,
    pub currencies: Vec<CurrencyView>,
}

#[derive(Debug)]
pub struct EditMoneyAccountPageData {
    pub account: MoneyAccountView,
    pub form: MoneyAccountForm,
    pub currencies: Vec<CurrencyView>,
}
