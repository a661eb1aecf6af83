use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::expense_category::{
    ExpenseCategory as DomainExpenseCategory, NewExpenseCategory as DomainNewExpenseCategory,
};
use crate::domain::types::{
    Amount, CategoryName, CurrencyCode, Description, ExpenseCategoryId, HubId,
    TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::expense_categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
/// Diesel model for [`crate::domain::expense_category::ExpenseCategory`].
pub struct ExpenseCategory {
    pub id: i32,
    pub hub_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub amount: f64,
    pub amount_currency_code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::expense_categories)]
/// Insertable form of [`ExpenseCategory`].
pub struct NewExpenseCategory<'a> {
    pub hub_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub amount: f64,
    pub amount_currency_code: &'a str,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::expense_categories)]
#[diesel(treat_none_as_null = true)]
/// Data used when updating an [`ExpenseCategory`] record.
pub struct UpdateExpenseCategory<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub amount: f64,
    pub amount_currency_code: &'a str,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<ExpenseCategory> for DomainExpenseCategory {
    type Error = TypeConstraintError;

    fn try_from(category: ExpenseCategory) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ExpenseCategoryId::new(category.id)?,
            hub_id: HubId::new(category.hub_id)?,
            name: CategoryName::new(category.name)?,
            description: category.description.and_then(Description::non_empty),
            amount: Amount::new(category.amount)?,
            currency_code: CurrencyCode::new(category.amount_currency_code)?,
            created_at: category.created_at,
            updated_at: category.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewExpenseCategory> for NewExpenseCategory<'a> {
    fn from(category: &'a DomainNewExpenseCategory) -> Self {
        Self {
            hub_id: category.hub_id.get(),
            name: category.name.as_str(),
            description: category.description.as_ref().map(Description::as_str),
            amount: category.amount.get(),
            amount_currency_code: category.currency_code.as_str(),
        }
    }
}

impl<'a> From<&'a DomainExpenseCategory> for UpdateExpenseCategory<'a> {
    fn from(category: &'a DomainExpenseCategory) -> Self {
        Self {
            name: category.name.as_str(),
            description: category.description.as_ref().map(Description::as_str),
            amount: category.amount.get(),
            amount_currency_code: category.currency_code.as_str(),
            updated_at: category.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn db_category() -> ExpenseCategory {
        let now = Utc::now().naive_utc();
        ExpenseCategory {
            id: 4,
            hub_id: 2,
            name: "Travel".to_string(),
            description: Some("   ".to_string()),
            amount: 120.5,
            amount_currency_code: "usd".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn db_row_into_domain() {
        let domain = DomainExpenseCategory::try_from(db_category()).unwrap();
        assert_eq!(domain.id.get(), 4);
        assert_eq!(domain.hub_id.get(), 2);
        assert_eq!(domain.name.as_str(), "Travel");
        assert_eq!(domain.description, None);
        assert_eq!(domain.currency_code.as_str(), "USD");
    }

    #[test]
    fn corrupted_row_is_rejected() {
        let mut row = db_category();
        row.amount = -1.0;
        assert_eq!(
            DomainExpenseCategory::try_from(row),
            Err(TypeConstraintError::InvalidAmount)
        );
    }

    #[test]
    fn domain_new_into_insertable() {
        let domain = DomainNewExpenseCategory::new(
            HubId::new(1).unwrap(),
            CategoryName::new("Rent").unwrap(),
            Description::non_empty("Office rent"),
            Amount::new(900.0).unwrap(),
            CurrencyCode::new("EUR").unwrap(),
        );
        let insertable = NewExpenseCategory::from(&domain);
        assert_eq!(insertable.hub_id, 1);
        assert_eq!(insertable.name, "Rent");
        assert_eq!(insertable.description, Some("Office rent"));
        assert_eq!(insertable.amount, 900.0);
        assert_eq!(insertable.amount_currency_code, "EUR");
    }
}
