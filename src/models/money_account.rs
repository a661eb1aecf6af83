use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::money_account::{
    MoneyAccount as DomainMoneyAccount, NewMoneyAccount as DomainNewMoneyAccount,
};
use crate::domain::types::{
    AccountName, Amount, CurrencyCode, Description, HubId, MoneyAccountId, TypeConstraintError,
};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::money_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::money_account::MoneyAccount`].
pub struct MoneyAccount {
    pub id: Vec<u8>,
    pub hub_id: i32,
    pub name: String,
    pub account_number: String,
    pub description: String,
    pub balance: f64,
    pub balance_currency_code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::money_accounts)]
/// Insertable form of [`MoneyAccount`].
pub struct NewMoneyAccount<'a> {
    pub id: &'a [u8],
    pub hub_id: i32,
    pub name: &'a str,
    pub account_number: &'a str,
    pub description: &'a str,
    pub balance: f64,
    pub balance_currency_code: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::money_accounts)]
/// Data used when updating a [`MoneyAccount`] record.
pub struct UpdateMoneyAccount<'a> {
    pub name: &'a str,
    pub account_number: &'a str,
    pub description: &'a str,
    pub balance: f64,
    pub balance_currency_code: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<MoneyAccount> for DomainMoneyAccount {
    type Error = TypeConstraintError;

    fn try_from(account: MoneyAccount) -> Result<Self, Self::Error> {
        Ok(Self {
            id: MoneyAccountId::from_bytes(&account.id)?,
            hub_id: HubId::new(account.hub_id)?,
            name: AccountName::new(account.name)?,
            account_number: account.account_number,
            description: Description::new(account.description),
            balance: Amount::new(account.balance)?,
            currency_code: CurrencyCode::new(account.balance_currency_code)?,
            created_at: account.created_at,
            updated_at: account.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewMoneyAccount> for NewMoneyAccount<'a> {
    fn from(account: &'a DomainNewMoneyAccount) -> Self {
        Self {
            id: account.id.as_bytes(),
            hub_id: account.hub_id.get(),
            name: account.name.as_str(),
            account_number: account.account_number.as_str(),
            description: account.description.as_str(),
            balance: account.balance.get(),
            balance_currency_code: account.currency_code.as_str(),
        }
    }
}

impl<'a> From<&'a DomainMoneyAccount> for UpdateMoneyAccount<'a> {
    fn from(account: &'a DomainMoneyAccount) -> Self {
        Self {
            name: account.name.as_str(),
            account_number: account.account_number.as_str(),
            description: account.description.as_str(),
            balance: account.balance.get(),
            balance_currency_code: account.currency_code.as_str(),
            updated_at: account.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn db_row_into_domain() {
        let id = MoneyAccountId::new();
        let now = Utc::now().naive_utc();
        let row = MoneyAccount {
            id: id.as_bytes().to_vec(),
            hub_id: 3,
            name: " Main desk ".to_string(),
            account_number: "ACC-1".to_string(),
            description: String::new(),
            balance: 10.0,
            balance_currency_code: "RUB".to_string(),
            created_at: now,
            updated_at: now,
        };

        let domain = DomainMoneyAccount::try_from(row).unwrap();
        assert_eq!(domain.id, id);
        assert_eq!(domain.name.as_str(), "Main desk");
        assert_eq!(domain.balance.get(), 10.0);
    }

    #[test]
    fn truncated_id_is_rejected() {
        let now = Utc::now().naive_utc();
        let row = MoneyAccount {
            id: vec![0; 4],
            hub_id: 3,
            name: "Desk".to_string(),
            account_number: String::new(),
            description: String::new(),
            balance: 0.0,
            balance_currency_code: "RUB".to_string(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(
            DomainMoneyAccount::try_from(row),
            Err(TypeConstraintError::InvalidUuid)
        );
    }
}
