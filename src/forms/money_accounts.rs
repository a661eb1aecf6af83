//! Create/update form for money accounts.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::money_account::{MoneyAccount, NewMoneyAccount};
use crate::domain::types::{AccountName, Amount, CurrencyCode, Description, HubId};
use crate::forms::{
    FormAction, FormError, ValidatedForm, validate_amount, validate_currency_code,
    validate_required,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct MoneyAccountForm {
    #[serde(default)]
    #[validate(custom(function = "validate_required"), length(max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 64))]
    pub account_number: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub balance: String,
    #[serde(default)]
    #[validate(custom(function = "validate_currency_code"))]
    pub currency_code: String,
    #[serde(default, rename = "_action")]
    pub action: Option<String>,
}

impl ValidatedForm for MoneyAccountForm {
    fn currency_code(&self) -> &str {
        &self.currency_code
    }
}

pub struct MoneyAccountPayload {
    pub name: AccountName,
    pub account_number: String,
    pub description: Description,
    pub balance: Amount,
    pub currency_code: CurrencyCode,
}

impl TryFrom<&MoneyAccountForm> for MoneyAccountPayload {
    type Error = FormError;

    fn try_from(form: &MoneyAccountForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: AccountName::new(form.name.as_str()).map_err(|_| FormError::InvalidName)?,
            account_number: form.account_number.trim().to_string(),
            description: Description::new(&form.description),
            balance: form
                .balance
                .parse::<Amount>()
                .map_err(|_| FormError::InvalidAmount)?,
            currency_code: CurrencyCode::new(&form.currency_code)
                .map_err(|_| FormError::InvalidCurrencyCode)?,
        })
    }
}

impl MoneyAccountPayload {
    pub fn into_domain(self, hub_id: HubId) -> NewMoneyAccount {
        NewMoneyAccount::new(
            hub_id,
            self.name,
            self.account_number,
            self.description,
            self.balance,
            self.currency_code,
        )
    }

    pub fn apply_to(self, account: &mut MoneyAccount) {
        account.name = self.name;
        account.account_number = self.account_number;
        account.description = self.description;
        account.balance = self.balance;
        account.currency_code = self.currency_code;
    }
}

impl MoneyAccountForm {
    pub fn to_new_account(&self, hub_id: HubId) -> Result<NewMoneyAccount, FormError> {
        Ok(MoneyAccountPayload::try_from(self)?.into_domain(hub_id))
    }

    pub fn apply(&self, mut account: MoneyAccount) -> Result<MoneyAccount, FormError> {
        MoneyAccountPayload::try_from(self)?.apply_to(&mut account);
        Ok(account)
    }

    pub fn action(&self) -> Result<FormAction, FormError> {
        self.action.as_deref().unwrap_or_default().parse()
    }
}

impl From<&MoneyAccount> for MoneyAccountForm {
    fn from(account: &MoneyAccount) -> Self {
        Self {
            name: account.name.to_string(),
            account_number: account.account_number.clone(),
            description: account.description.to_string(),
            balance: account.balance.to_string(),
            currency_code: account.currency_code.to_string(),
            action: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Locale, Localizer};

    #[test]
    fn valid_form_converts_to_new_account() {
        let form = MoneyAccountForm {
            name: "Main cash desk".to_string(),
            account_number: " 40702810 ".to_string(),
            description: String::new(),
            balance: "1000".to_string(),
            currency_code: "RUB".to_string(),
            action: None,
        };
        let hub_id = HubId::new(1).unwrap();

        let account = form.to_new_account(hub_id).unwrap();

        assert_eq!(account.name.as_str(), "Main cash desk");
        assert_eq!(account.account_number, "40702810");
        assert_eq!(account.balance.get(), 1000.0);
        assert!(account.description.as_str().is_empty());
    }

    #[test]
    fn invalid_form_is_reported_in_russian() {
        let form = MoneyAccountForm {
            name: String::new(),
            balance: "-100".to_string(),
            currency_code: "INVALID".to_string(),
            ..Default::default()
        };

        let (errors, ok) = form.ok(&Localizer::new(Locale::Ru));

        assert!(!ok);
        assert_eq!(errors.len(), 3);
        assert_eq!(errors["name"], "Обязательное поле.");
        assert_eq!(errors["balance"], "Введите неотрицательное число.");
        assert_eq!(errors["currency_code"], "Выберите корректную валюту.");
    }

    #[test]
    fn delete_action_is_recognized() {
        let form = MoneyAccountForm {
            action: Some("delete".to_string()),
            ..Default::default()
        };
        assert_eq!(form.action().unwrap(), FormAction::Delete);

        let form = MoneyAccountForm {
            action: Some("drop".to_string()),
            ..Default::default()
        };
        assert!(form.action().is_err());
    }
}
