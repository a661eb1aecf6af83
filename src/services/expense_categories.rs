//! Services backing the expense category pages.

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::auth::AuthenticatedUser;
use crate::domain::expense_category::ExpenseCategory;
use crate::domain::types::{ExpenseCategoryId, HubId};
use crate::dto::expense_categories::{
    EditExpenseCategoryPageData, ExpenseCategoriesPageData, ExpenseCategoryView,
    NewExpenseCategoryPageData,
};
use crate::forms::expense_categories::ExpenseCategoryForm;
use crate::pagination::{Paginated, PaginationParams, PaginationState};
use crate::repository::{
    CurrencyReader, ExpenseCategoryListQuery, ExpenseCategoryReader, ExpenseCategoryWriter,
};
use crate::services::currencies::list_currencies;
use crate::services::{ServiceError, ServiceResult, ensure_role, user_hub};

pub const BASE_PATH: &str = "/finance/expense-categories";

fn list_query(
    user: &AuthenticatedUser,
    params: &PaginationParams,
) -> ServiceResult<ExpenseCategoryListQuery> {
    let mut query = ExpenseCategoryListQuery::new(user_hub(user)?);
    if let Some(search) = params.search() {
        query = query.search(search);
    }
    Ok(query)
}

/// Loads one category of the user's hub.
pub fn get_by_id<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: ExpenseCategoryId,
) -> ServiceResult<ExpenseCategory>
where
    R: ExpenseCategoryReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    repo.get_expense_category_by_id(id, user_hub(user)?)?
        .ok_or(ServiceError::NotFound)
}

/// One page of categories, newest first.
pub fn get_paginated<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &PaginationParams,
) -> ServiceResult<Vec<ExpenseCategory>>
where
    R: ExpenseCategoryReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let query = list_query(user, params)?.paginate(params.page(), params.limit());
    let (_, categories) = repo.list_expense_categories(query)?;

    Ok(categories)
}

/// Number of categories matching the same filter as [`get_paginated`].
pub fn count<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &PaginationParams,
) -> ServiceResult<usize>
where
    R: ExpenseCategoryReader + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let query = list_query(user, params)?;

    Ok(repo.count_expense_categories(&query)?)
}

/// Creates the entity in `hub_id`, the tenant resolved from the request.
pub fn create<R>(
    repo: &R,
    user: &AuthenticatedUser,
    hub_id: HubId,
    form: &ExpenseCategoryForm,
) -> ServiceResult<ExpenseCategory>
where
    R: ExpenseCategoryWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    let new_category = form.to_new_category(hub_id)?;

    repo.create_expense_category(&new_category)
        .map_err(|err| {
            log::error!("Failed to create expense category: {err}");
            err
        })
        .map_err(ServiceError::from)
}

/// Applies the form to the stored category and saves it.
pub fn update<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: ExpenseCategoryId,
    form: &ExpenseCategoryForm,
) -> ServiceResult<ExpenseCategory>
where
    R: ExpenseCategoryReader + ExpenseCategoryWriter + ?Sized,
{
    let existing = get_by_id(repo, user, id)?;

    let category = form.apply(existing)?;

    Ok(repo.update_expense_category(&category)?)
}

pub fn delete<R>(repo: &R, user: &AuthenticatedUser, id: ExpenseCategoryId) -> ServiceResult<()>
where
    R: ExpenseCategoryWriter + ?Sized,
{
    ensure_role(user, SERVICE_ACCESS_ROLE)?;

    repo.delete_expense_category(id, user_hub(user)?)?;

    Ok(())
}

/// Loads the table data for the index page and its HTMX fragment.
pub fn load_index_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    params: &PaginationParams,
) -> ServiceResult<ExpenseCategoriesPageData>
where
    R: ExpenseCategoryReader + ?Sized,
{
    let total = count(repo, user, params)?;
    let categories = get_paginated(repo, user, params)?;

    let pagination = PaginationState::new(BASE_PATH, params.page(), params.limit(), total)
        .with_search(params.search());
    let items = categories.iter().map(ExpenseCategoryView::from).collect();

    Ok(ExpenseCategoriesPageData {
        categories: Paginated::new(items, pagination),
    })
}

pub fn load_new_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<NewExpenseCategoryPageData>
where
    R: CurrencyReader + ?Sized,
{
    let currencies = list_currencies(repo, user)?;

    Ok(NewExpenseCategoryPageData {
        form: ExpenseCategoryForm::default(),
        currencies,
    })
}

pub fn load_edit_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    id: ExpenseCategoryId,
) -> ServiceResult<EditExpenseCategoryPageData>
where
    R: ExpenseCategoryReader + CurrencyReader + ?Sized,
{
    let category = get_by_id(repo, user, id)?;
    let currencies = list_currencies(repo, user)?;

    Ok(EditExpenseCategoryPageData {
        category: ExpenseCategoryView::from(&category),
        form: ExpenseCategoryForm::from(&category),
        currencies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::currency::Currency;
    use crate::domain::types::{Amount, CategoryName, CurrencyCode, Description, HubId};
    use crate::repository::Pagination;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{finance_user, hub, outsider_user, timestamp};

    fn category(id: i32) -> ExpenseCategory {
        ExpenseCategory {
            id: ExpenseCategoryId::new(id).unwrap(),
            hub_id: HubId::new(42).unwrap(),
            name: CategoryName::new(format!("Category {id}")).unwrap(),
            description: Some(Description::new("Recurring")),
            amount: Amount::new(100.0).unwrap(),
            currency_code: CurrencyCode::new("USD").unwrap(),
            created_at: timestamp(id as u32),
            updated_at: timestamp(id as u32),
        }
    }

    fn params(page: &str, limit: &str, search: Option<&str>) -> PaginationParams {
        PaginationParams {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            search: search.map(str::to_string),
        }
    }

    fn valid_form() -> ExpenseCategoryForm {
        ExpenseCategoryForm {
            name: "Travel".to_string(),
            description: String::new(),
            amount: "300".to_string(),
            currency_code: "EUR".to_string(),
            action: None,
        }
    }

    #[test]
    fn index_page_is_scoped_and_paginated() {
        let mut repo = MockRepository::new();
        repo.expect_list_expense_categories()
            .withf(|query| {
                query.hub_id.get() == 42
                    && query.search.as_deref() == Some("rent")
                    && query.pagination
                        == Some(Pagination {
                            page: 2,
                            per_page: 5,
                        })
            })
            .returning(|_| Ok((7, vec![category(2), category(1)])));
        repo.expect_count_expense_categories()
            .withf(|query| query.hub_id.get() == 42 && query.pagination.is_none())
            .returning(|_| Ok(7));

        let data =
            load_index_page(&repo, &finance_user(), &params("2", "5", Some(" rent "))).unwrap();

        let pagination = &data.categories.pagination;
        assert_eq!(pagination.total, 7);
        assert_eq!(pagination.total_pages, 2);
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.base_path, BASE_PATH);
        assert_eq!(pagination.search.as_deref(), Some("rent"));
        assert_eq!(data.categories.items.len(), 2);
        assert_eq!(data.categories.items[0].name, "Category 2");
    }

    #[test]
    fn index_page_requires_role() {
        let repo = MockRepository::new();

        let result = load_index_page(&repo, &outsider_user(), &PaginationParams::default());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn count_uses_same_filter() {
        let mut repo = MockRepository::new();
        repo.expect_count_expense_categories()
            .withf(|query| query.search.as_deref() == Some("fuel") && query.pagination.is_none())
            .returning(|_| Ok(3));

        let total = count(&repo, &finance_user(), &params("1", "20", Some("fuel"))).unwrap();

        assert_eq!(total, 3);
    }

    #[test]
    fn get_paginated_clamps_limit() {
        let mut repo = MockRepository::new();
        repo.expect_list_expense_categories()
            .withf(|query| {
                query.pagination
                    == Some(Pagination {
                        page: 1,
                        per_page: 100,
                    })
            })
            .returning(|_| Ok((1, vec![category(1)])));

        let categories = get_paginated(&repo, &finance_user(), &params("0", "500", None)).unwrap();

        assert_eq!(categories.len(), 1);
    }

    #[test]
    fn missing_category_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_expense_category_by_id()
            .returning(|_, _| Ok(None));

        let result = get_by_id(&repo, &finance_user(), ExpenseCategoryId::new(9).unwrap());

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn create_uses_request_hub() {
        let mut repo = MockRepository::new();
        repo.expect_create_expense_category()
            .withf(|new_category| {
                new_category.hub_id.get() == 42 && new_category.name.as_str() == "Travel"
            })
            .times(1)
            .returning(|_| Ok(category(5)));

        let created = create(&repo, &finance_user(), hub(), &valid_form()).unwrap();

        assert_eq!(created.id.get(), 5);
    }

    #[test]
    fn invalid_create_never_reaches_repository() {
        let mut repo = MockRepository::new();
        repo.expect_create_expense_category().never();

        let form = ExpenseCategoryForm {
            name: String::new(),
            ..valid_form()
        };

        let result = create(&repo, &finance_user(), hub(), &form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn update_applies_form_to_existing() {
        let mut repo = MockRepository::new();
        repo.expect_get_expense_category_by_id()
            .returning(|id, _| Ok(Some(category(id.get()))));
        repo.expect_update_expense_category()
            .withf(|category| {
                category.id.get() == 3
                    && category.name.as_str() == "Travel"
                    && category.currency_code.as_str() == "EUR"
            })
            .returning(|category| Ok(category.clone()));

        let updated = update(
            &repo,
            &finance_user(),
            ExpenseCategoryId::new(3).unwrap(),
            &valid_form(),
        )
        .unwrap();

        assert_eq!(updated.amount.get(), 300.0);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete_expense_category()
            .returning(|_, _| Err(RepositoryError::NotFound));

        let result = delete(&repo, &finance_user(), ExpenseCategoryId::new(1).unwrap());

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[test]
    fn edit_page_is_prefilled() {
        let mut repo = MockRepository::new();
        repo.expect_get_expense_category_by_id()
            .returning(|id, _| Ok(Some(category(id.get()))));
        repo.expect_list_currencies().returning(|| {
            Ok(vec![Currency {
                code: CurrencyCode::new("USD").unwrap(),
                name: "US Dollar".to_string(),
                symbol: "$".to_string(),
            }])
        });

        let data =
            load_edit_page(&repo, &finance_user(), ExpenseCategoryId::new(4).unwrap()).unwrap();

        assert_eq!(data.category.id, 4);
        assert_eq!(data.form.name, "Category 4");
        assert_eq!(data.form.amount, "100.00");
        assert_eq!(data.currencies.len(), 1);
    }
}
