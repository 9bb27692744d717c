//! Handler tests for the sale endpoints.

use actix_web::http::StatusCode;
use actix_web::test;
use pagination::Paginated;
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::json;

use crate::domain::sales::fixtures::{at, card_fields, view};
use crate::domain::sales::stats::SaleTotals;
use crate::domain::test_support::{admin_user, advisor_user};
use crate::domain::{Error, FranchiseId, ProductId, Role, SaleStatus, User};
use crate::inbound::http::test_utils::{MockPorts, api_app, json_body, session_cookie};

fn advisor() -> User {
    advisor_user("Ada Advisor")
}

#[rstest]
#[actix_web::test]
async fn list_uses_default_page_and_wraps_items() {
    let user = advisor();
    let row = view(card_fields(dec!(1500)), SaleStatus::Open, &user, at(2024, 3, 1, 9));
    let mut ports = MockPorts::default().signed_in_as(user.id, Role::Advisor);
    ports
        .sales_query
        .expect_list()
        .withf(|_, filter, page| {
            filter.status.is_none() && page.page() == 1 && page.limit() == 10
        })
        .times(1)
        .returning(move |_, _, page| Ok(Paginated::new(vec![row.clone()], page, 1)));
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/sales")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["items"][0]["requestedAmount"], json!("1500"));
    assert_eq!(body["data"]["items"][0]["creatorName"], json!("Ada Advisor"));
    assert_eq!(body["data"]["pagination"]["total"], json!(1));
}

#[rstest]
#[actix_web::test]
async fn filters_are_parsed_from_query() {
    let user = admin_user("Ana Admin");
    let mut ports = MockPorts::default().signed_in_as(user.id, Role::Admin);
    ports
        .sales_query
        .expect_total()
        .withf(|_, filter| {
            filter.product_id == Some(ProductId(3))
                && filter.status == Some(SaleStatus::InProcess)
                && filter.created_from.is_some()
                && filter.created_to.is_some()
        })
        .times(1)
        .returning(|_, _| {
            Ok(SaleTotals {
                count: 2,
                total_amount: dec!(2500.50),
            })
        });
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/sales/total?productId=3&status=in_process&startDate=2024-01-01&endDate=2024-01-31")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["data"]["count"], json!(2));
    assert_eq!(body["data"]["totalAmount"], json!("2500.50"));
}

#[rstest]
#[case("/api/v1/sales?status=pending")]
#[case("/api/v1/sales?startDate=yesterday")]
#[case("/api/v1/sales?page=0")]
#[case("/api/v1/sales?creatorUserId=nope")]
#[case("/api/v1/sales/not-a-uuid")]
#[actix_web::test]
async fn malformed_input_is_a_validation_failure(#[case] uri: &str) {
    let user = advisor();
    let ports = MockPorts::default().signed_in_as(user.id, Role::Advisor);
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri(uri).cookie(cookie).to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("validation_failure"));
}

#[rstest]
#[actix_web::test]
async fn my_sales_pins_creator_to_caller() {
    let user = admin_user("Ana Admin");
    let caller_id = user.id;
    let mut ports = MockPorts::default().signed_in_as(user.id, Role::Admin);
    ports
        .sales_query
        .expect_list()
        .withf(move |_, filter, _| filter.creator_user_id == Some(caller_id))
        .times(1)
        .returning(|_, _, page| Ok(Paginated::new(Vec::new(), page, 0)));
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let other = advisor();
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/sales/my-sales?creatorUserId={}", other.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn count_by_status_is_not_captured_as_an_id() {
    let user = advisor();
    let mut ports = MockPorts::default().signed_in_as(user.id, Role::Advisor);
    ports
        .sales_query
        .expect_count_by_status()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/sales/count-by-status")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn unauthenticated_requests_are_rejected() {
    let app = api_app(MockPorts::default().into_state()).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/sales").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(res).await;
    assert_eq!(body["error"]["code"], json!("authentication_failure"));
}

#[rstest]
#[actix_web::test]
async fn create_returns_created_view() {
    let user = advisor();
    let row = view(card_fields(dec!(900)), SaleStatus::Open, &user, at(2024, 3, 1, 9));
    let mut ports = MockPorts::default().signed_in_as(user.id, Role::Advisor);
    ports
        .sales
        .expect_create()
        .withf(|_, draft| {
            draft.fields.product_id == ProductId(3)
                && draft.fields.franchise_id == Some(FranchiseId(2))
                && draft.fields.requested_amount == dec!(900)
                && draft.status.is_none()
        })
        .times(1)
        .returning(move |_, _| Ok(row.clone()));
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/sales")
            .cookie(cookie)
            .set_json(json!({ "productId": 3, "requestedAmount": "900", "franchiseId": 2 }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_body(res).await;
    assert_eq!(body["message"], json!("Sale created"));
    assert_eq!(body["data"]["status"], json!("open"));
}

#[rstest]
#[actix_web::test]
async fn create_rejects_unknown_status_before_the_service() {
    let user = advisor();
    let mut ports = MockPorts::default().signed_in_as(user.id, Role::Advisor);
    ports.sales.expect_create().never();
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/sales")
            .cookie(cookie)
            .set_json(json!({ "productId": 1, "requestedAmount": "10", "status": "won" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["error"]["details"]["field"], json!("status"));
}

#[rstest]
#[actix_web::test]
async fn malformed_json_body_is_a_validation_failure() {
    let user = advisor();
    let ports = MockPorts::default().signed_in_as(user.id, Role::Advisor);
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/sales")
            .cookie(cookie)
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"productId\": ")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["error"]["code"], json!("validation_failure"));
}

#[rstest]
#[actix_web::test]
async fn update_distinguishes_null_from_absent() {
    let user = advisor();
    let row = view(card_fields(dec!(900)), SaleStatus::Open, &user, at(2024, 3, 1, 9));
    let sale_id = row.id;
    let mut ports = MockPorts::default().signed_in_as(user.id, Role::Advisor);
    ports
        .sales
        .expect_update()
        .withf(move |_, id, patch| {
            *id == sale_id
                && patch.franchise_id == Some(None)
                && patch.rate.is_none()
                && patch.status == Some(SaleStatus::Finished)
        })
        .times(1)
        .returning(move |_, _, _| Ok(row.clone()));
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/sales/{sale_id}"))
            .cookie(cookie)
            .set_json(json!({ "franchiseId": null, "status": "finished" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn forbidden_delete_maps_to_403() {
    let user = advisor();
    let other = advisor_user("Otto Other");
    let row = view(card_fields(dec!(10)), SaleStatus::Open, &other, at(2024, 3, 1, 9));
    let sale_id = row.id;
    let mut ports = MockPorts::default().signed_in_as(user.id, Role::Advisor);
    ports
        .sales
        .expect_delete()
        .times(1)
        .returning(|_, _| Err(Error::forbidden("sale belongs to another user")));
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/sales/{sale_id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = json_body(res).await;
    assert_eq!(body["error"]["code"], json!("authorization_failure"));
}

#[rstest]
#[actix_web::test]
async fn delete_returns_null_data() {
    let user = advisor();
    let row = view(card_fields(dec!(10)), SaleStatus::Open, &user, at(2024, 3, 1, 9));
    let mut ports = MockPorts::default().signed_in_as(user.id, Role::Advisor);
    ports.sales.expect_delete().times(1).returning(|_, _| Ok(()));
    let app = api_app(ports.into_state()).await;
    let cookie = session_cookie(&app, &user.id).await;

    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/sales/{}", row.id))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["data"], json!(null));
}
