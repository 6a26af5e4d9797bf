//! Mutation flow and cached reads against a stubbed portal API.

use std::sync::Arc;
use std::time::Duration;

use portal_client::{
    FileUpload, FlowError, GENERIC_FAILURE_MESSAGE, MerchandiseForm, Notification, NotificationLog,
    PortalContext, PortalHttp, ProfileForm,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ITEM_ID: &str = "9b2f3c1e-4d5a-4b6c-8d7e-0f1a2b3c4d5e";
const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

struct Portal {
    server: MockServer,
    log: Arc<NotificationLog>,
    ctx: PortalContext,
}

#[fixture]
async fn portal() -> Portal {
    let server = MockServer::start().await;
    let log = Arc::new(NotificationLog::new());
    let http = PortalHttp::new(server.uri()).expect("client");
    let ctx = PortalContext::new(http, log.clone());
    Portal { server, log, ctx }
}

fn shirt() -> Value {
    json!({
        "id": ITEM_ID,
        "name": "Shirt",
        "description": "Blue shirt",
        "price": 150.0,
        "stocks": 0,
        "images": [],
        "size": "",
        "color": "",
        "ratings": 0.0,
        "createdAt": "2026-03-01T09:00:00Z",
        "updatedAt": "2026-03-01T09:00:00Z"
    })
}

fn profile(firstname: &str) -> Value {
    json!({
        "id": USER_ID,
        "firstname": firstname,
        "lastname": "Lovelace",
        "email": "ada@example.edu",
        "showPublic": false,
        "updatedAt": "2026-03-01T09:00:00Z"
    })
}

async fn mount_catalogue(server: &MockServer, hits: u64) {
    Mock::given(method("GET"))
        .and(path("/api/v1/merch"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"merchandise": [shirt()]}))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(hits)
        .mount(server)
        .await;
}

/// Extract the text of a named multipart field.
fn multipart_text<'a>(body: &'a str, name: &str) -> Option<&'a str> {
    let marker = format!("name=\"{name}\"\r\n\r\n");
    let start = body.find(&marker)? + marker.len();
    let rest = body.get(start..)?;
    let end = rest.find("\r\n--")?;
    rest.get(..end)
}

#[rstest]
#[tokio::test]
async fn concurrent_identical_reads_issue_one_request(#[future] portal: Portal) {
    let portal = portal.await;
    mount_catalogue(&portal.server, 1).await;

    let (first, second) = tokio::join!(
        portal.ctx.merchandise_list(None),
        portal.ctx.merchandise_list(None)
    );

    assert_eq!(first.expect("first").merchandise.len(), 1);
    assert_eq!(second.expect("second").merchandise.len(), 1);
}

#[rstest]
#[tokio::test]
async fn create_with_image_sends_multipart_and_invalidates_catalogue(#[future] portal: Portal) {
    let portal = portal.await;
    mount_catalogue(&portal.server, 2).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/merch"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Shirt has been added to the merchandise",
            "item": shirt()
        })))
        .expect(1)
        .mount(&portal.server)
        .await;

    portal.ctx.merchandise_list(None).await.expect("warm cache");
    let form = MerchandiseForm {
        size: Some("M".to_owned()),
        images: vec![FileUpload::new("shirt.png", "image/png", b"\x89PNG".to_vec())],
        ..MerchandiseForm::new("Shirt", "Blue shirt", 150.0)
    };
    let created = portal
        .ctx
        .mutations()
        .create_merchandise(form)
        .await
        .expect("created");
    assert_eq!(created.entity.name, "Shirt");
    portal.ctx.merchandise_list(None).await.expect("refetch");

    let requests = portal.server.received_requests().await.expect("recording");
    let post = requests
        .iter()
        .find(|request| request.method.as_str() == "POST")
        .expect("create request");
    let body = String::from_utf8_lossy(&post.body);
    assert_eq!(body.matches("name=\"images\"").count(), 1);
    let blob: Value =
        serde_json::from_str(multipart_text(&body, "merch").expect("merch field")).expect("json");
    assert_eq!(
        blob,
        json!({"name": "Shirt", "description": "Blue shirt", "price": 150.0, "size": "M"})
    );
    assert_eq!(
        portal.log.last(),
        Some(Notification::success("Shirt has been added to the merchandise"))
    );
}

#[rstest]
#[tokio::test]
async fn update_refreshes_current_user(#[future] portal: Portal) {
    let portal = portal.await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/current-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": profile("Ada")})))
        .up_to_n_times(1)
        .mount(&portal.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/current-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": profile("Augusta")})))
        .mount(&portal.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/v1/user/current-user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Profile updated",
            "user": profile("Augusta")
        })))
        .mount(&portal.server)
        .await;

    assert_eq!(portal.ctx.current_user().await.expect("before").firstname, "Ada");
    assert_eq!(portal.ctx.current_user().await.expect("cached").firstname, "Ada");

    let form = ProfileForm {
        firstname: Some("Augusta".to_owned()),
        ..ProfileForm::default()
    };
    portal
        .ctx
        .mutations()
        .update_current_user(form)
        .await
        .expect("updated");

    assert_eq!(portal.ctx.current_user().await.expect("after").firstname, "Augusta");
    assert_eq!(portal.log.last(), Some(Notification::success("Profile updated")));
}

#[rstest]
#[tokio::test]
async fn server_rejection_notifies_with_server_message(#[future] portal: Portal) {
    let portal = portal.await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/merch/{ITEM_ID}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "not_found",
            "message": "merchandise item not found"
        })))
        .mount(&portal.server)
        .await;

    let err = portal
        .ctx
        .mutations()
        .delete_merchandise(ITEM_ID)
        .await
        .expect_err("missing item");

    assert!(matches!(err, FlowError::Request(ref inner) if inner.status() == Some(404)));
    assert_eq!(
        portal.log.last(),
        Some(Notification::error("merchandise item not found"))
    );
}

#[rstest]
#[tokio::test]
async fn unreachable_server_notifies_generic_message() {
    let server = MockServer::start().await;
    let base = server.uri();
    drop(server);
    let log = Arc::new(NotificationLog::new());
    let ctx = PortalContext::new(PortalHttp::new(base).expect("client"), log.clone());

    let err = ctx
        .mutations()
        .delete_user(USER_ID)
        .await
        .expect_err("connection refused");

    assert!(matches!(err, FlowError::Request(_)));
    assert_eq!(log.last(), Some(Notification::error(GENERIC_FAILURE_MESSAGE)));
}

#[rstest]
#[tokio::test]
async fn invalid_form_never_reaches_the_server(#[future] portal: Portal) {
    let portal = portal.await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&portal.server)
        .await;

    let err = portal
        .ctx
        .mutations()
        .create_merchandise(MerchandiseForm::new("", "Blue shirt", 150.0))
        .await
        .expect_err("missing name");

    assert!(matches!(err, FlowError::Invalid(ref form) if form.field == "name"));
    assert_eq!(portal.log.last(), Some(Notification::error("name is required")));
}
