use serde::Serialize;

use crate::domain::expense_category::ExpenseCategory;
use crate::dto::{CurrencyView, format_timestamp};
use crate::forms::expense_categories::ExpenseCategoryForm;
use crate::pagination::Paginated;

/// Row of the categories table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExpenseCategoryView {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub amount: String,
    pub currency_code: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&ExpenseCategory> for ExpenseCategoryView {
    fn from(category: &ExpenseCategory) -> Self {
        Self {
            id: category.id.get(),
            name: category.name.to_string(),
            description: category
                .description
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            amount: category.amount.to_string(),
            currency_code: category.currency_code.to_string(),
            created_at: format_timestamp(&category.created_at),
            updated_at: format_timestamp(&category.updated_at),
        }
    }
}

/// Data required to render the categories index page or its table fragment.
#[derive(Debug)]
pub struct ExpenseCategoriesPageData {
    pub categories: Paginated<ExpenseCategoryView>,
}

/// Data for the create form.
#[derive(Debug)]
pub struct NewExpenseCategoryPageData {
    pub form: ExpenseCategoryForm,
    pub currencies: Vec<CurrencyView>,
}

/// Data for the edit form, prefilled from the stored category.
#[derive(Debug)]
pub struct EditExpenseCategoryPageData {
    pub category: ExpenseCategoryView,
    pub form: ExpenseCategoryForm,
    pub currencies: Vec<CurrencyView>,
}
