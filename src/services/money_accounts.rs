//! Services backing the money account pages.

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::money_account::MoneyAccount;
use crate::domain::types::{HubId, MoneyAccountId};
use crate::dto::money_accounts::{
    EditMoneyAccountPageData, MoneyAccountView, MoneyAccountsPageData, NewMoneyAccountPageData,
};
use crate::forms::money_accounts::MoneyAccountForm;
use crate::pagination::{Paginated, PaginationParams, PaginationState};
use crate::repository::{
    CurrencyReader, MoneyAccountListQuery, MoneyAccountReader, MoneyAccountWriter,
};
use crate::services::currencies::list_currencies;
use crate::services::{ServiceError, ServiceResult, ensure_role, user_hub};

pub const BASE_PATH: &str = "/finance/accounts";

fn list_query(
    user: &AuthenticatedUser,
    params: &PaginationParams,
) -> ServiceResult<MoneyAccountListQuery> {
    let mut query = MoneyAccountListQuery::new(user_hub(user)?);
    if let Some(search) = params.search() {
        query = query.search(search);
    }
    Ok(query)
}

pub fn get_by_id<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: MoneyAccountId,
) -> ServiceResult<MoneyAccount>
where
    R: MoneyAccountReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    repo.get_money_account_by_id(id, user_hub(user)?)?
        .ok_or(ServiceError::NotFound)
}

pub fn get_paginated<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &PaginationParams,
) -> ServiceResult<Vec<MoneyAccount>>
where
    R: MoneyAccountReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let query = list_query(user, params)?.paginate(params.page(), params.limit());
    let (_, accounts) = repo.list_money_accounts(query)?;

    Ok(accounts)
}

pub fn count<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &PaginationParams,
) -> ServiceResult<usize>
where
    R: MoneyAccountReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let query = list_query(user, params)?;

    Ok(repo.count_money_accounts(&query)?)
}

/// Creates the entity in `hub_id`, the tenant resolved from the request.
pub fn create<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hub_id: HubId,
    form: &MoneyAccountForm,
) -> ServiceResult<MoneyAccount>
where
    R: MoneyAccountWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let new_account = form.to_new_account(hub_id)?;

    repo.create_money_account(&new_account)
        .map_err(|err| {
            log::error!("Failed to create money account: {err}");
            err
        })
        .map_err(ServiceError::from)
}

pub fn update<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: MoneyAccountId,
    form: &MoneyAccountForm,
) -> ServiceResult<MoneyAccount>
where
    R: MoneyAccountReader + MoneyAccountWriter + ?Sized,
{
    let existing = get_by_id(repo, user, id)?;

    let account = form.apply(existing)?;

    Ok(repo.update_money_account(&account)?)
}

pub fn delete<R>(repo: &R, user: &AuthenticatedUser, id: MoneyAccountId) -> ServiceResult<()>
where
    R: MoneyAccountWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    repo.delete_money_account(id, user_hub(user)?)?;

    Ok(())
}

pub fn load_index_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &PaginationParams,
) -> ServiceResult<MoneyAccountsPageData>
where
    R: MoneyAccountReader + ?Sized,
{
    let total = count(repo, user, params)?;
    let accounts = get_paginated(repo, user, params)?;

    let pagination = PaginationState::new(BASE_PATH, params.page(), params.limit(), total)
        .with_search(params.search());
    let items = accounts.iter().map(MoneyAccountView::from).collect();

    Ok(MoneyAccountsPageData {
        accounts: Paginated::new(items, pagination),
    })
}

pub fn load_new_page<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<NewMoneyAccountPageData>
where
    R: CurrencyReader + ?Sized,
{
    let currencies = list_currencies(repo, user)?;

    Ok(NewMoneyAccountPageData {
        form: MoneyAccountForm::default(),
        currencies,
    })
}

pub fn load_edit_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: MoneyAccountId,
) -> ServiceResult<EditMoneyAccountPageData>
where
    R: MoneyAccountReader + CurrencyReader + ?Sized,
{
    let account = get_by_id(repo, user, id)?;
    let currencies = list_currencies(repo, user)?;

    Ok(EditMoneyAccountPageData {
        account: MoneyAccountView::from(&account),
        form: MoneyAccountForm::from(&account),
        currencies,
    })
}
