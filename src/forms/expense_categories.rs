//! Create/update form for expense categories.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::expense_category::{ExpenseCategory, NewExpenseCategory};
use crate::domain::types::{Amount, CategoryName, CurrencyCode, Description, HubId};
use crate::forms::{
    FormAction, FormError, ValidatedForm, validate_amount, validate_currency_code,
    validate_required,
};

/// Submitted category fields. Numbers stay as text so bad input can be echoed back.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct ExpenseCategoryForm {
    #[serde(default)]
    #[validate(custom(function = "validate_required"), length(max = 255))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    #[serde(default)]
    #[validate(custom(function = "validate_amount"))]
    pub amount: String,
    #[serde(default)]
    #[validate(custom(function = "validate_currency_code"))]
    pub currency_code: String,
    /// `save` or `delete` on the edit form.
    #[serde(default, rename = "_action")]
    pub action: Option<String>,
}

impl ValidatedForm for ExpenseCategoryForm {
    fn currency_code(&self) -> &str {
        &self.currency_code
    }
}

/// Typed values extracted from a valid [`ExpenseCategoryForm`].
pub struct ExpenseCategoryPayload {
    pub name: CategoryName,
    pub description: Option<Description>,
    pub amount: Amount,
    pub currency_code: CurrencyCode,
}

impl TryFrom<&ExpenseCategoryForm> for ExpenseCategoryPayload {
    type Error = FormError;

    fn try_from(form: &ExpenseCategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            name: CategoryName::new(form.name.as_str()).map_err(|_| FormError::InvalidName)?,
            description: Description::non_empty(&form.description),
            amount: form
                .amount
                .parse::<Amount>()
                .map_err(|_| FormError::InvalidAmount)?,
            currency_code: CurrencyCode::new(&form.currency_code)
                .map_err(|_| FormError::InvalidCurrencyCode)?,
        })
    }
}

impl ExpenseCategoryPayload {
    pub fn into_domain(self, hub_id: HubId) -> NewExpenseCategory {
        NewExpenseCategory::new(
            hub_id,
            self.name,
            self.description,
            self.amount,
            self.currency_code,
        )
    }

    /// Overwrites the editable fields; identity, tenant and timestamps are kept.
    pub fn apply_to(self, category: &mut ExpenseCategory) {
        category.name = self.name;
        category.description = self.description;
        category.amount = self.amount;
        category.currency_code = self.currency_code;
    }
}

impl ExpenseCategoryForm {
    pub fn to_new_category(&self, hub_id: HubId) -> Result<NewExpenseCategory, FormError> {
        Ok(ExpenseCategoryPayload::try_from(self)?.into_domain(hub_id))
    }

    pub fn apply(&self, mut category: ExpenseCategory) -> Result<ExpenseCategory, FormError> {
        ExpenseCategoryPayload::try_from(self)?.apply_to(&mut category);
        Ok(category)
    }

    pub fn action(&self) -> Result<FormAction, FormError> {
        self.action.as_deref().unwrap_or_default().parse()
    }
}

impl From<&ExpenseCategory> for ExpenseCategoryForm {
    fn from(category: &ExpenseCategory) -> Self {
        Self {
            name: category.name.to_string(),
            description: category
                .description
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            amount: category.amount.to_string(),
            currency_code: category.currency_code.to_string(),
            action: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::ExpenseCategoryId;
    use crate::i18n::{Locale, Localizer};

    fn valid_form() -> ExpenseCategoryForm {
        ExpenseCategoryForm {
            name: " Office ".to_string(),
            description: "Paper and <b>toner</b>".to_string(),
            amount: "1500,50".to_string(),
            currency_code: "usd".to_string(),
            action: None,
        }
    }

    #[test]
    fn valid_form_converts_to_new_category() {
        let hub_id = HubId::new(7).unwrap();
        let category = valid_form().to_new_category(hub_id).unwrap();

        assert_eq!(category.hub_id, hub_id);
        assert_eq!(category.name.as_str(), "Office");
        assert_eq!(category.amount.get(), 1500.5);
        assert_eq!(category.currency_code.as_str(), "USD");
        assert_eq!(
            category.description.as_ref().map(Description::as_str),
            Some("Paper and <b>toner</b>")
        );
    }

    #[test]
    fn invalid_form_reports_each_field() {
        let form = ExpenseCategoryForm {
            name: "  ".to_string(),
            description: String::new(),
            amount: "-100".to_string(),
            currency_code: "INVALID".to_string(),
            action: None,
        };

        let (errors, ok) = form.ok(&Localizer::new(Locale::En));

        assert!(!ok);
        assert_eq!(errors["name"], "This field is required.");
        assert_eq!(errors["amount"], "Enter a non-negative number.");
        assert_eq!(errors["currency_code"], "Choose a valid currency.");
        assert!(!errors.contains_key("description"));
        assert!(form.to_new_category(HubId::new(1).unwrap()).is_err());
    }

    #[test]
    fn apply_keeps_identity() {
        let now = Utc::now().naive_utc();
        let existing = ExpenseCategory {
            id: ExpenseCategoryId::new(3).unwrap(),
            hub_id: HubId::new(7).unwrap(),
            name: CategoryName::new("Old").unwrap(),
            description: None,
            amount: Amount::new(1.0).unwrap(),
            currency_code: CurrencyCode::new("EUR").unwrap(),
            created_at: now,
            updated_at: now,
        };

        let updated = valid_form().apply(existing.clone()).unwrap();

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.hub_id, existing.hub_id);
        assert_eq!(updated.name.as_str(), "Office");
        assert_eq!(updated.created_at, existing.created_at);
    }

    #[test]
    fn prefill_from_category() {
        let now = Utc::now().naive_utc();
        let category = ExpenseCategory {
            id: ExpenseCategoryId::new(3).unwrap(),
            hub_id: HubId::new(7).unwrap(),
            name: CategoryName::new("Rent").unwrap(),
            description: Some(Description::new("Monthly")),
            amount: Amount::new(250.0).unwrap(),
            currency_code: CurrencyCode::new("RUB").unwrap(),
            created_at: now,
            updated_at: now,
        };

        let form = ExpenseCategoryForm::from(&category);

        assert_eq!(form.name, "Rent");
        assert_eq!(form.description, "Monthly");
        assert_eq!(form.amount, "250.00");
        assert_eq!(form.currency_code, "RUB");
        assert_eq!(form.action().unwrap(), FormAction::Save);
    }
}
