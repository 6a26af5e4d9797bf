//! Tests for merchandise handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockMerchandiseCommand, MockMerchandiseQuery};
use crate::domain::{MerchandiseId, MerchandiseItem, Role};
use crate::inbound::http::error::configure_extractor_errors;
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{session_cookie, sign_in_route, test_session_middleware};
use crate::test_support::fixture_timestamp;

fn shirt(id: MerchandiseId) -> MerchandiseItem {
    MerchandiseCreationSchema
        .validate(&json!({ "name": "Org shirt", "description": "Navy", "price": 350 }))
        .expect("valid draft")
        .into_item(id, Vec::new(), fixture_timestamp())
}

fn app_with(
    command: MockMerchandiseCommand,
    query: MockMerchandiseQuery,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let ports = HttpStatePorts {
        merchandise: Arc::new(command),
        merchandise_query: Arc::new(query),
        ..HttpStatePorts::fixtures()
    };
    App::new()
        .app_data(web::Data::new(HttpState::new(ports)))
        .wrap(test_session_middleware())
        .configure(configure_extractor_errors)
        .configure(sign_in_route)
        .service(
            web::scope("/api/v1")
                .service(list_merchandise)
                .service(create_merchandise)
                .service(update_merchandise)
                .service(delete_merchandise),
        )
}

fn untouched() -> MockMerchandiseCommand {
    let mut command = MockMerchandiseCommand::new();
    command.expect_create().never();
    command.expect_update().never();
    command.expect_delete().never();
    command
}

#[rstest]
#[actix_web::test]
async fn list_nests_items_and_forwards_search() {
    let id = MerchandiseId::random();
    let mut query = MockMerchandiseQuery::new();
    query
        .expect_list()
        .withf(|filter| filter.search() == Some("shirt"))
        .return_once(move |_| Ok(vec![shirt(id)]));
    let app = actix_test::init_service(app_with(untouched(), query)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/merch?search=%20Shirt%20")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["merchandise"][0]["id"], id.to_string());
    assert_eq!(body["merchandise"][0]["ratings"], 0.0);
}

#[rstest]
#[case(None, StatusCode::UNAUTHORIZED)]
#[case(Some(Role::Member), StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn mutations_are_guarded_before_validation(
    #[case] role: Option<Role>,
    #[case] expected: StatusCode,
) {
    let app =
        actix_test::init_service(app_with(untouched(), MockMerchandiseQuery::new())).await;
    let cookie = match role {
        Some(role) => Some(session_cookie(&app, role).await),
        None => None,
    };

    let requests = [
        actix_test::TestRequest::post().uri("/api/v1/merch"),
        actix_test::TestRequest::patch().uri("/api/v1/merch/not-a-uuid"),
        actix_test::TestRequest::delete().uri("/api/v1/merch/not-a-uuid"),
    ];
    for request in requests {
        let mut request = request
            .insert_header(("content-type", "application/json"))
            .set_payload("{broken");
        if let Some(cookie) = cookie.clone() {
            request = request.cookie(cookie);
        }
        let res = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), expected);
    }
}

#[rstest]
#[actix_web::test]
async fn admin_create_returns_created_with_message() {
    let mut command = MockMerchandiseCommand::new();
    command
        .expect_create()
        .withf(|draft, images| draft.name() == "Org shirt" && images.is_empty())
        .return_once(|draft, _| {
            Ok(draft.into_item(MerchandiseId::random(), Vec::new(), fixture_timestamp()))
        });
    let app = actix_test::init_service(app_with(command, MockMerchandiseQuery::new())).await;
    let cookie = session_cookie(&app, Role::Admin).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/merch")
            .cookie(cookie)
            .set_json(json!({
                "name": "Org shirt",
                "description": "Navy",
                "price": 350,
                "images": "ignored",
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Org shirt has been added to the merchandise");
    assert_eq!(body["item"]["stocks"], 0);
}

#[rstest]
#[case(json!({ "description": "Navy", "price": 350 }), "name", "required")]
#[case(json!({ "name": "Shirt", "description": "Navy", "price": -1 }), "price", "out_of_range")]
#[case(json!({ "name": "Shirt", "description": "Navy", "price": "free" }), "price", "invalid_type")]
#[actix_web::test]
async fn admin_create_rejects_invalid_payload(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app =
        actix_test::init_service(app_with(untouched(), MockMerchandiseQuery::new())).await;
    let cookie = session_cookie(&app, Role::Admin).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/merch")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[case("/api/v1/merch/not-a-uuid", json!({ "price": 10 }), "id")]
#[case("/api/v1/merch/6f1d7c7e-52a4-4c4b-9a59-6d3f0f1e2a11", json!({}), "body")]
#[actix_web::test]
async fn admin_update_rejects_bad_id_and_empty_patch(
    #[case] uri: &str,
    #[case] payload: Value,
    #[case] field: &str,
) {
    let app =
        actix_test::init_service(app_with(untouched(), MockMerchandiseQuery::new())).await;
    let cookie = session_cookie(&app, Role::Admin).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(uri)
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn admin_update_passes_patch_to_command() {
    let id = MerchandiseId::random();
    let mut command = MockMerchandiseCommand::new();
    command
        .expect_update()
        .withf(move |target, patch, images| *target == id && !patch.is_empty() && images.is_empty())
        .return_once(move |_, patch, _| {
            let mut item = shirt(id);
            item.apply(patch, fixture_timestamp());
            Ok(item)
        });
    let app = actix_test::init_service(app_with(command, MockMerchandiseQuery::new())).await;
    let cookie = session_cookie(&app, Role::Admin).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/merch/{id}"))
            .cookie(cookie)
            .set_json(json!({ "stocks": 12, "discount": null }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Org shirt has been updated");
    assert_eq!(body["item"]["stocks"], 12);
}

#[rstest]
#[case(Ok(()), StatusCode::OK)]
#[case(Err(crate::domain::Error::not_found("gone")), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn admin_delete_maps_command_outcome(
    #[case] outcome: Result<(), crate::domain::Error>,
    #[case] expected: StatusCode,
) {
    let id = MerchandiseId::random();
    let mut command = MockMerchandiseCommand::new();
    command
        .expect_delete()
        .withf(move |target| *target == id)
        .return_once(move |_| outcome);
    let app = actix_test::init_service(app_with(command, MockMerchandiseQuery::new())).await;
    let cookie = session_cookie(&app, Role::Admin).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/merch/{id}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), expected);
}
