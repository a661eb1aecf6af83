use crate::SERVICE_ACCESS_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::dto::CurrencyView;
use crate::repository::CurrencyReader;
use crate::services::{ServiceResult, ensure_role};

/// Reference list offered by the currency selects.
pub fn list_currencies<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<CurrencyView>>
where
    R: CurrencyReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let currencies = repo.list_currencies()?;

    Ok(currencies.iter().map(CurrencyView::from).collect())
}
