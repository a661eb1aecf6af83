//! Repository implementation for money accounts.

use chrono::Utc;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::{
    domain::{
        money_account::{MoneyAccount, NewMoneyAccount},
        types::{HubId, MoneyAccountId},
    },
    models::money_account::{
        MoneyAccount as DbMoneyAccount, NewMoneyAccount as DbNewMoneyAccount,
        UpdateMoneyAccount as DbUpdateMoneyAccount,
    },
    repository::{
        DieselRepository, MoneyAccountListQuery, MoneyAccountReader, MoneyAccountWriter,
        contains_pattern,
        errors::{RepositoryError, RepositoryResult},
    },
    schema::money_accounts,
};

fn filtered(query: &MoneyAccountListQuery) -> money_accounts::BoxedQuery<'static, Sqlite> {
    let mut items = money_accounts::table
        .filter(money_accounts::hub_id.eq(query.hub_id.get()))
        .into_boxed();

    if let Some(search) = &query.search {
        let pattern = contains_pattern(search);
        items = items.filter(
            money_accounts::name
                .like(pattern.clone())
                .escape('\\')
                .or(money_accounts::account_number
                    .like(pattern.clone())
                    .escape('\\'))
                .or(money_accounts::description.like(pattern).escape('\\')),
        );
    }

    items
}

impl MoneyAccountReader for DieselRepository {
    fn get_money_account_by_id(
        &self,
        id: MoneyAccountId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<MoneyAccount>> {
        let mut conn = self.conn()?;

        let row = money_accounts::table
            .filter(money_accounts::id.eq(id.as_bytes().to_vec()))
            .filter(money_accounts::hub_id.eq(hub_id.get()))
            .select(DbMoneyAccount::as_select())
            .first::<DbMoneyAccount>(&mut *conn)
            .optional()?;

        row.map(MoneyAccount::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn list_money_accounts(
        &self,
        query: MoneyAccountListQuery,
    ) -> RepositoryResult<(usize, Vec<MoneyAccount>)> {
        let total = self.count_money_accounts(&query)?;

        let mut conn = self.conn()?;

        let mut items = filtered(&query)
            .select(DbMoneyAccount::as_select())
            .order((money_accounts::created_at.desc(), money_accounts::id.desc()));

        if let Some(pagination) = &query.pagination {
            let (limit, offset) = pagination.limit_offset();
            items = items.limit(limit).offset(offset);
        }

        let accounts = items
            .load::<DbMoneyAccount>(&mut *conn)?
            .into_iter()
            .map(MoneyAccount::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, accounts))
    }

    fn count_money_accounts(&self, query: &MoneyAccountListQuery) -> RepositoryResult<usize> {
        let mut conn = self.conn()?;

        let total: i64 = filtered(query).count().get_result(&mut *conn)?;

        Ok(total as usize)
    }
}

impl MoneyAccountWriter for DieselRepository {
    fn create_money_account(
        &self,
        new_account: &NewMoneyAccount,
    ) -> RepositoryResult<MoneyAccount> {
        let mut conn = self.conn()?;

        let db_new_account: DbNewMoneyAccount = new_account.into();

        let row = diesel::insert_into(money_accounts::table)
            .values(&db_new_account)
            .returning(DbMoneyAccount::as_returning())
            .get_result::<DbMoneyAccount>(&mut *conn)?;

        Ok(MoneyAccount::try_from(row)?)
    }

    fn update_money_account(&self, account: &MoneyAccount) -> RepositoryResult<MoneyAccount> {
        let mut conn = self.conn()?;

        let mut changes: DbUpdateMoneyAccount = account.into();
        changes.updated_at = Utc::now().naive_utc();

        let row = diesel::update(
            money_accounts::table
                .filter(money_accounts::id.eq(account.id.as_bytes().to_vec()))
                .filter(money_accounts::hub_id.eq(account.hub_id.get())),
        )
        .set(&changes)
        .returning(DbMoneyAccount::as_returning())
        .get_result::<DbMoneyAccount>(&mut *conn)?;

        Ok(MoneyAccount::try_from(row)?)
    }

    fn delete_money_account(&self, id: MoneyAccountId, hub_id: HubId) -> RepositoryResult<()> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            money_accounts::table
                .filter(money_accounts::id.eq(id.as_bytes().to_vec()))
                .filter(money_accounts::hub_id.eq(hub_id.get())),
        )
        .execute(&mut *conn)?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
