use std::ops::{Deref, DerefMut};
use std::sync::MutexGuard;

use diesel::sqlite::SqliteConnection;

use crate::{
    db::{DbConnection, DbPool, SharedTransaction, get_connection},
    domain::{
        currency::Currency,
        expense_category::{ExpenseCategory, NewExpenseCategory},
        money_account::{MoneyAccount, NewMoneyAccount},
        types::{ExpenseCategoryId, HubId, MoneyAccountId},
    },
    repository::errors::RepositoryResult,
};

pub mod currency;
pub mod errors;
pub mod expense_category;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod money_account;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of rows to skip; pages are 1-based.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }

    /// `LIMIT`/`OFFSET` pair in the database's integer type.
    pub(crate) fn limit_offset(&self) -> (i64, i64) {
        (
            i64::try_from(self.per_page).unwrap_or(i64::MAX),
            i64::try_from(self.offset()).unwrap_or(i64::MAX),
        )
    }
}

/// `LIKE` pattern matching `search` anywhere, with `%`, `_` and `\` escaped by `\`.
pub(crate) fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseCategoryListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoneyAccountListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

/// Blank search terms are dropped so they do not filter anything.
fn normalize_search(search: impl Into<String>) -> Option<String> {
    let search = search.into().trim().to_string();
    (!search.is_empty()).then_some(search)
}

impl ExpenseCategoryListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = normalize_search(search);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

impl MoneyAccountListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            pagination: None,
        }
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = normalize_search(search);
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait CurrencyReader {
    fn list_currencies(&self) -> RepositoryResult<Vec<Currency>>;
}

pub trait ExpenseCategoryReader {
    fn get_expense_category_by_id(
        &self,
        id: ExpenseCategoryId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<ExpenseCategory>>;
    /// Returns the total number of matching rows alongside the requested page.
    fn list_expense_categories(
        &self,
        query: ExpenseCategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<ExpenseCategory>)>;
    fn count_expense_categories(&self, query: &ExpenseCategoryListQuery)
    -> RepositoryResult<usize>;
}

pub trait ExpenseCategoryWriter {
    fn create_expense_category(
        &self,
        new_category: &NewExpenseCategory,
    ) -> RepositoryResult<ExpenseCategory>;
    fn update_expense_category(&self, category: &ExpenseCategory)
    -> RepositoryResult<ExpenseCategory>;
    fn delete_expense_category(&self, id: ExpenseCategoryId, hub_id: HubId)
    -> RepositoryResult<()>;
}

pub trait MoneyAccountReader {
    fn get_money_account_by_id(
        &self,
        id: MoneyAccountId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<MoneyAccount>>;
    /// Returns the total number of matching rows alongside the requested page.
    fn list_money_accounts(
        &self,
        query: MoneyAccountListQuery,
    ) -> RepositoryResult<(usize, Vec<MoneyAccount>)>;
    fn count_money_accounts(&self, query: &MoneyAccountListQuery) -> RepositoryResult<usize>;
}

pub trait MoneyAccountWriter {
    fn create_money_account(&self, new_account: &NewMoneyAccount)
    -> RepositoryResult<MoneyAccount>;
    fn update_money_account(&self, account: &MoneyAccount) -> RepositoryResult<MoneyAccount>;
    fn delete_money_account(&self, id: MoneyAccountId, hub_id: HubId) -> RepositoryResult<()>;
}

/// Diesel-backed repository.
///
/// Outside of a transaction every call checks out its own pooled
/// connection. When built with [`DieselRepository::with_transaction`] all
/// calls share the request's open transaction instead.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
    transaction: Option<SharedTransaction>,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            transaction: None,
        }
    }

    pub fn with_transaction(pool: DbPool, transaction: SharedTransaction) -> Self {
        Self {
            pool,
            transaction: Some(transaction),
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    fn conn(&self) -> RepositoryResult<RepositoryConnection<'_>> {
        match &self.transaction {
            Some(transaction) => Ok(RepositoryConnection::Shared(transaction.lock()?)),
            None => Ok(RepositoryConnection::Pooled(get_connection(&self.pool)?)),
        }
    }
}

enum RepositoryConnection<'a> {
    Pooled(DbConnection),
    Shared(MutexGuard<'a, DbConnection>),
}

impl Deref for RepositoryConnection<'_> {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Pooled(conn) => conn,
            Self::Shared(conn) => conn,
        }
    }
}

impl DerefMut for RepositoryConnection<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            Self::Pooled(conn) => conn,
            Self::Shared(conn) => conn,
        }
    }
}
