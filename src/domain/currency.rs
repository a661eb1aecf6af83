use serde::{Deserialize, Serialize};

use crate::domain::types::CurrencyCode;

/// Reference currency offered by the account and category forms.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Currency {
    pub code: CurrencyCode,
    pub name: String,
    pub symbol: String,
}
