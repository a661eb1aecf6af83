//! Strongly-typed value objects used by finance entities.
//!
//! Every wrapper validates on construction, so values that reach the domain
//! layer (identifiers, names, currency codes, amounts) can be trusted by the
//! repository and the templates alike.
use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::{ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier is zero or negative.
    #[error("id must be greater than zero")]
    NonPositiveId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Currency code is not three upper-case ASCII letters.
    #[error("invalid currency code")]
    InvalidCurrencyCode,
    /// Amount is negative, NaN or infinite.
    #[error("invalid amount")]
    InvalidAmount,
    /// Provided uuid failed format validation.
    #[error("invalid uuid value")]
    InvalidUuid,
}

/// Macro to generate lightweight newtypes for positive identifiers.
macro_rules! id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Creates a new identifier ensuring it is greater than zero.
            pub fn new(value: i32) -> Result<Self, TypeConstraintError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveId)
                }
            }

            /// Returns the raw `i32` backing this identifier.
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<i32> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: i32) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

id_newtype!(HubId, "Tenant (hub) identifier attached to every finance entity.");
id_newtype!(ExpenseCategoryId, "Numeric identifier of an expense category.");

/// UUID identifier of a money account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoneyAccountId(Uuid);

impl MoneyAccountId {
    /// Generate a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse from raw bytes (DB boundary)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TypeConstraintError> {
        Uuid::from_slice(bytes)
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidUuid)
    }

    /// Convert to raw bytes (DB boundary)
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for MoneyAccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for MoneyAccountId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MoneyAccountId {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| TypeConstraintError::InvalidUuid)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let trimmed = value.into().trim().to_string();
                if trimmed.is_empty() {
                    return Err(TypeConstraintError::EmptyString);
                }
                Ok(Self(trimmed))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

non_empty_string_newtype!(CategoryName, "Expense category name, trimmed and non-empty.");
non_empty_string_newtype!(AccountName, "Money account name, trimmed and non-empty.");

/// Removes every tag (and the content of `script`/`style`) and returns plain
/// text. Entities are decoded again since templates escape on output.
fn strip_markup(value: &str) -> String {
    let cleaned = ammonia::Builder::default()
        .tags(HashSet::new())
        .clean(value)
        .to_string();
    cleaned
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Free-form text stripped of markup. May be empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Description(String);

impl Description {
    pub fn new<S: AsRef<str>>(value: S) -> Self {
        Self(strip_markup(value.as_ref()).trim().to_string())
    }

    /// Returns `None` when nothing is left after sanitizing.
    pub fn non_empty<S: AsRef<str>>(value: S) -> Option<Self> {
        let description = Self::new(value);
        (!description.0.is_empty()).then_some(description)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Description {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO-4217 style currency code: three upper-case ASCII letters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Trims and upper-cases the input before checking its shape.
    pub fn new<S: AsRef<str>>(value: S) -> Result<Self, TypeConstraintError> {
        let code = value.as_ref().trim().to_ascii_uppercase();
        if is_currency_code(&code) {
            Ok(Self(code))
        } else {
            Err(TypeConstraintError::InvalidCurrencyCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Checks the shape of an already normalized currency code.
pub fn is_currency_code(value: &str) -> bool {
    value.len() == 3 && value.bytes().all(|b| b.is_ascii_uppercase())
}

/// Non-negative, finite monetary amount.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidAmount)
        }
    }

    pub const fn get(self) -> f64 {
        self.0
    }
}

impl FromStr for Amount {
    type Err = TypeConstraintError;

    /// Accepts both `1234.5` and `1 234,5` style input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        let value = normalized
            .parse::<f64>()
            .map_err(|_| TypeConstraintError::InvalidAmount)?;
        Self::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_rejects_non_positive_values() {
        assert_eq!(HubId::new(0), Err(TypeConstraintError::NonPositiveId));
        assert_eq!(
            ExpenseCategoryId::new(-3),
            Err(TypeConstraintError::NonPositiveId)
        );
        assert_eq!(ExpenseCategoryId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn money_account_id_parses_and_round_trips_bytes() {
        let id: MoneyAccountId = "5f0c8a7e-3b6d-4c1e-9a2f-0d7b9e4c2a11".parse().unwrap();
        let restored = MoneyAccountId::from_bytes(id.as_bytes()).unwrap();
        assert_eq!(id, restored);
        assert_eq!(restored.to_string(), "5f0c8a7e-3b6d-4c1e-9a2f-0d7b9e4c2a11");
    }

    #[test]
    fn money_account_id_rejects_garbage() {
        assert_eq!(
            "abc-def".parse::<MoneyAccountId>(),
            Err(TypeConstraintError::InvalidUuid)
        );
        assert!(MoneyAccountId::from_bytes(&[1, 2, 3]).is_err());
    }

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(CategoryName::new("  Travel ").unwrap().as_str(), "Travel");
        assert_eq!(
            AccountName::new("   "),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn description_strips_markup() {
        let description = Description::new(" Office <script>alert(1)</script>supplies ");
        assert_eq!(description.as_str(), "Office supplies");
        assert!(Description::non_empty("<script></script>").is_none());
        assert_eq!(Description::new("<b>bold</b> text").as_str(), "bold text");
    }

    #[test]
    fn description_keeps_plain_text_verbatim() {
        let description = Description::new("Rent & utilities < 5%");
        assert_eq!(description.as_str(), "Rent & utilities < 5%");
        assert_eq!(Description::new(description.as_str()), description);
        assert_eq!(Description::new("a &amp;lt; b").as_str(), "a &lt; b");
    }

    #[test]
    fn currency_code_is_normalized() {
        assert_eq!(CurrencyCode::new(" usd ").unwrap().as_str(), "USD");
        assert_eq!(
            CurrencyCode::new("INVALID"),
            Err(TypeConstraintError::InvalidCurrencyCode)
        );
        assert_eq!(
            CurrencyCode::new("U1D"),
            Err(TypeConstraintError::InvalidCurrencyCode)
        );
    }

    #[test]
    fn amount_parsing_accepts_common_formats() {
        assert_eq!("1500.25".parse::<Amount>().unwrap().get(), 1500.25);
        assert_eq!("1 500,5".parse::<Amount>().unwrap().get(), 1500.5);
        assert_eq!("-100".parse::<Amount>(), Err(TypeConstraintError::InvalidAmount));
        assert_eq!("ten".parse::<Amount>(), Err(TypeConstraintError::InvalidAmount));
        assert_eq!("NaN".parse::<Amount>(), Err(TypeConstraintError::InvalidAmount));
        assert_eq!(Amount::new(3.0).unwrap().to_string(), "3.00");
    }
}
