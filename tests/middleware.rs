use actix_web::middleware::from_fn;
use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use pushkind_finance::domain::expense_category::NewExpenseCategory;
use pushkind_finance::domain::types::{Amount, CategoryName, CurrencyCode, HubId};
use pushkind_finance::middleware::{RedirectUnauthorized, with_transaction};
use pushkind_finance::repository::{
    DieselRepository, ExpenseCategoryListQuery, ExpenseCategoryReader, ExpenseCategoryWriter,
};

mod common;

fn hub() -> HubId {
    HubId::new(1).unwrap()
}

fn category(name: &str) -> NewExpenseCategory {
    NewExpenseCategory::new(
        hub(),
        CategoryName::new(name).unwrap(),
        None,
        Amount::new(1.0).unwrap(),
        CurrencyCode::new("USD").unwrap(),
    )
}

async fn write_then(repo: DieselRepository, status: StatusCode) -> HttpResponse {
    assert!(repo.in_transaction());
    repo.create_expense_category(&category("Inside transaction"))
        .unwrap();
    HttpResponse::build(status).finish()
}

#[actix_web::test]
async fn redirects_unauthorized_to_signin() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/auth/signin"
    );
}

#[actix_web::test]
async fn success_response_passes_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn transaction_commits_on_success() {
    let test_db = common::TestDb::new("transaction_commits_on_success.db");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_db.pool()))
            .service(
                web::resource("/write")
                    .wrap(from_fn(with_transaction))
                    .to(|repo: DieselRepository| write_then(repo, StatusCode::SEE_OTHER)),
            ),
    )
    .await;

    let req = test::TestRequest::post().uri("/write").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    drop(resp);

    let repo = DieselRepository::new(test_db.pool());
    let total = repo
        .count_expense_categories(&ExpenseCategoryListQuery::new(hub()))
        .unwrap();
    assert_eq!(total, 1);
}

#[actix_web::test]
async fn transaction_rolls_back_on_server_error() {
    let test_db = common::TestDb::new("transaction_rolls_back_on_server_error.db");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_db.pool()))
            .service(
                web::resource("/write")
                    .wrap(from_fn(with_transaction))
                    .to(|repo: DieselRepository| {
                        write_then(repo, StatusCode::INTERNAL_SERVER_ERROR)
                    }),
            ),
    )
    .await;

    let req = test::TestRequest::post().uri("/write").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    drop(resp);

    let repo = DieselRepository::new(test_db.pool());
    let total = repo
        .count_expense_categories(&ExpenseCategoryListQuery::new(hub()))
        .unwrap();
    assert_eq!(total, 0);
}

#[actix_web::test]
async fn repository_without_middleware_is_not_transactional() {
    let test_db = common::TestDb::new("repository_without_middleware.db");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(test_db.pool()))
            .route(
                "/read",
                web::get().to(|repo: DieselRepository| async move {
                    if repo.in_transaction() {
                        HttpResponse::Conflict().finish()
                    } else {
                        HttpResponse::Ok().finish()
                    }
                }),
            ),
    )
    .await;

    let req = test::TestRequest::get().uri("/read").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
