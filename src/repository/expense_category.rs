//! Repository implementation for expense categories.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        expense_category::{ExpenseCategory, NewExpenseCategory},
        types::{ExpenseCategoryId, HubId},
    },
    models::expense_category::{
        ExpenseCategory as DbExpenseCategory, NewExpenseCategory as DbNewExpenseCategory,
        UpdateExpenseCategory as DbUpdateExpenseCategory,
    },
    repository::{
        DieselRepository, ExpenseCategoryListQuery, ExpenseCategoryReader, ExpenseCategoryWriter,
        contains_pattern,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::expense_categories,
};

/// Tenant and search filters shared by the page query and the count.
fn filtered(query: &ExpenseCategoryListQuery) -> expense_categories::BoxedQuery<'static, Sqlite> {
    let mut items = expense_categories::table
        .filter(expense_categories::hub_id.eq(query.hub_id.get()))
        .into_boxed();

    if let Some(search) = &query.search {
        let pattern = contains_pattern(search);
        items = items.filter(
            expense_categories::name
                .like(pattern.clone())
                .escape('\\')
                .or(expense_categories::description
                    .assume_not_null()
                    .like(pattern)
                    .escape('\\')),
        );
    }

    items
}

impl ExpenseCategoryReader for DieselRepository {
    fn get_expense_category_by_id(
        &self,
        id: ExpenseCategoryId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<ExpenseCategory>> {
        let mut conn = self.conn()?;

        let row = expense_categories::table
            .filter(expense_categories::id.eq(id.get()))
            .filter(expense_categories::hub_id.eq(hub_id.get()))
            .select(DbExpenseCategory::as_select())
            .first::<DbExpenseCategory>(&mut *conn)
            .optional()?;

        row.map(ExpenseCategory::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_expense_categories(
        &self,
        query: ExpenseCategoryListQuery,
    ) -> RepositoryResult<(usize, Vec<ExpenseCategory>)> {
        let total = self.count_expense_categories(&query)?;

        let mut conn = self.conn()?;

        let mut items = filtered(&query)
            .select(DbExpenseCategory::as_select())
            .order((
                expense_categories::created_at.desc(),
                expense_categories::id.desc(),
            ));

        if let Some(pagination) = &query.pagination {
            let (limit, offset) = pagination.limit_offset();
            items = items.limit(limit).offset(offset);
        }

        let categories = items
            .load::<DbExpenseCategory>(&mut *conn)?
            .into_iter()
            .map(ExpenseCategory::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, categories))
    }

    fn count_expense_categories(
        &self,
        query: &ExpenseCategoryListQuery,
    ) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(query).count().get_result(&mut *conn)?;

        Ok(total as usize)
    }
}

impl ExpenseCategoryWriter for DieselRepository {
    fn create_expense_category(
        &self,
        new_category: &NewExpenseCategory,
    ) -> RepositoryResult<ExpenseCategory> {
        let mut conn = self.conn()?;

        let db_new_category: DbNewExpenseCategory = new_category.into();

        let row = diesel::insert_into(expense_categories::table)
            .values(&db_new_category)
            .returning(DbExpenseCategory::as_returning())
            .get_result::<DbExpenseCategory>(&mut *conn)?;

        Ok(ExpenseCategory::try_from(row)?)
    }

    fn update_expense_category(
        &self,
        category: &ExpenseCategory,
    ) -> RepositoryResult<ExpenseCategory> {
        let mut conn = self.conn()?;

        let mut changes: DbUpdateExpenseCategory = category.into();
        changes.updated_at = Utc::now().naive_utc();

        let row = diesel::update(
            expense_categories::table
                .filter(expense_categories::id.eq(category.id.get()))
                .filter(expense_categories::hub_id.eq(category.hub_id.get())),
        )
        .set(&changes)
        .returning(DbExpenseCategory::as_returning())
        .get_result::<DbExpenseCategory>(&mut *conn)?;

        Ok(ExpenseCategory::try_from(row)?)
    }

    fn delete_expense_category(
        &self,
        id: ExpenseCategoryId,
        hub_id: HubId,
    ) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            expense_categories::table
                .filter(expense_categories::id.eq(id.get()))
                .filter(expense_categories::hub_id.eq(hub_id.get())),
        )
        .execute(&mut *conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
