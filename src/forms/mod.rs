//! Form definitions backing the finance routes.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::domain::types::{Amount, CurrencyCode};
use crate::dto::CurrencyView;
use crate::i18n::Localizer;

pub mod expense_categories;
pub mod money_accounts;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid name")]
    InvalidName,

    #[error("invalid amount")]
    InvalidAmount,

    #[error("invalid currency code")]
    InvalidCurrencyCode,

    #[error("invalid action")]
    InvalidAction,
}

/// Field name to localized message, one message per field.
pub type FieldErrors = HashMap<String, String>;

/// Validation contract shared by the create and update forms.
pub trait ValidatedForm: Validate {
    /// Submitted currency code, as typed.
    fn currency_code(&self) -> &str;

    /// Returns localized field errors and whether the form is valid.
    fn ok(&self, localizer: &Localizer) -> (FieldErrors, bool) {
        match self.validate() {
            Ok(()) => (FieldErrors::new(), true),
            Err(errors) => (localize_errors(&errors, localizer), false),
        }
    }

    /// Like [`ValidatedForm::ok`], but the currency must also be one of `currencies`.
    fn ok_with_currencies(
        &self,
        localizer: &Localizer,
        currencies: &[CurrencyView],
    ) -> (FieldErrors, bool) {
        let (mut errors, _) = self.ok(localizer);
        if !errors.contains_key("currency_code")
            && !is_known_currency(self.currency_code(), currencies)
        {
            errors.insert(
                "currency_code".to_string(),
                localizer.t("validation.currency"),
            );
        }
        let ok = errors.is_empty();
        (errors, ok)
    }
}

fn is_known_currency(code: &str, currencies: &[CurrencyView]) -> bool {
    let code = code.trim().to_ascii_uppercase();
    currencies.iter().any(|currency| currency.code == code)
}

/// Maps validator error codes to `validation.<code>` catalog messages.
pub fn localize_errors(errors: &ValidationErrors, localizer: &Localizer) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, field_errors)| {
            let error = field_errors.first()?;
            let key = format!("validation.{}", error.code);
            let message = if localizer.catalog().contains_key(key.as_str()) {
                localizer.t(&key)
            } else {
                localizer.t("validation.invalid")
            };
            Some((field.to_string(), message))
        })
        .collect()
}

/// What a `POST /{id}` submission asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormAction {
    #[default]
    Save,
    Delete,
}

impl FromStr for FormAction {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "save" => Ok(FormAction::Save),
            "delete" => Ok(FormAction::Delete),
            _ => Err(FormError::InvalidAction),
        }
    }
}

pub(crate) fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub(crate) fn validate_amount(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    value
        .parse::<Amount>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("amount"))
}

pub(crate) fn validate_currency_code(value: &str) -> Result<(), ValidationError> {
    CurrencyCode::new(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("currency"))
}
