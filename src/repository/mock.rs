//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::currency::Currency;
use crate::domain::expense_category::{ExpenseCategory, NewExpenseCategory};
use crate::domain::money_account::{MoneyAccount, NewMoneyAccount};
use crate::domain::types::{ExpenseCategoryId, HubId, MoneyAccountId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    CurrencyReader, ExpenseCategoryListQuery, ExpenseCategoryReader, ExpenseCategoryWriter,
    MoneyAccountListQuery, MoneyAccountReader, MoneyAccountWriter,
};

mock! {
    pub Repository {}

    impl CurrencyReader for Repository {
        fn list_currencies(&self) -> RepositoryResult<Vec<Currency>>;
    }

    impl ExpenseCategoryReader for Repository {
        fn get_expense_category_by_id(
            &self,
            id: ExpenseCategoryId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<ExpenseCategory>>;
        fn list_expense_categories(
            &self,
            query: ExpenseCategoryListQuery,
        ) -> RepositoryResult<(usize, Vec<ExpenseCategory>)>;
        fn count_expense_categories(
            &self,
            query: &ExpenseCategoryListQuery,
        ) -> RepositoryResult<usize>;
    }

    impl ExpenseCategoryWriter for Repository {
        fn create_expense_category(
            &self,
            new_category: &NewExpenseCategory,
        ) -> RepositoryResult<ExpenseCategory>;
        fn update_expense_category(
            &self,
            category: &ExpenseCategory,
        ) -> RepositoryResult<ExpenseCategory>;
        fn delete_expense_category(
            &self,
            id: ExpenseCategoryId,
            hub_id: HubId,
        ) -> RepositoryResult<()>;
    }

    impl MoneyAccountReader for Repository {
        fn get_money_account_by_id(
            &self,
            id: MoneyAccountId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<MoneyAccount>>;
        fn list_money_accounts(
            &self,
            query: MoneyAccountListQuery,
        ) -> RepositoryResult<(usize, Vec<MoneyAccount>)>;
        fn count_money_accounts(&self, query: &MoneyAccountListQuery) -> RepositoryResult<usize>;
    }

    impl MoneyAccountWriter for Repository {
        fn create_money_account(
            &self,
            new_account: &NewMoneyAccount,
        ) -> RepositoryResult<MoneyAccount>;
        fn update_money_account(&self, account: &MoneyAccount) -> RepositoryResult<MoneyAccount>;
        fn delete_money_account(
            &self,
            id: MoneyAccountId,
            hub_id: HubId,
        ) -> RepositoryResult<()>;
    }
}
