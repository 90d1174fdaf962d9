use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use oria_api::state::AppStateInner;
use oria_storage::{MemStorage, Storage, StorageError};
use oria_types::api::{NewContactSubmission, NewEmailSubscription, NewUser, NewVolunteerSignup};
use oria_types::models::{ContactSubmission, EmailSubscription, User, VolunteerSignup};
use oria_types::schema::MAX_FIELD_LEN;

const ADMIN_TOKEN: &str = "test-admin-token-0123456789";

fn spawn_app() -> Router {
    app_with(Arc::new(MemStorage::new()), Some(ADMIN_TOKEN))
}

fn app_with(storage: Arc<dyn Storage>, admin_token: Option<&str>) -> Router {
    oria_api::router(AppStateInner::new(storage, admin_token.map(str::to_string)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("failed to execute request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(path: &str, body: &Value) -> Request<Body> {
    Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_get(path: &str) -> Request<Body> {
    Request::get(path)
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_TOKEN}"))
        .body(Body::empty())
        .unwrap()
}

fn volunteer_payload() -> Value {
    json!({
        "fullName": "Grace Hopper",
        "email": "grace@navy.mil",
        "phoneNumber": "",
        "availability": "weekends",
        "whyInterested": "I like teaching",
        "experienceWithChildren": "Scout leader",
        "isOver18": "yes",
        "agreesBackgroundCheck": "true"
    })
}

#[tokio::test]
async fn contact_submission_shows_up_in_admin_list() {
    // arrange
    let app = spawn_app();
    let body = json!({
        "name": "Ada",
        "email": "a@x.com",
        "interest": "system-consulting",
        "message": "hi"
    });
    // act
    let (status, created) = send(&app, post_json("/api/contact", &body)).await;
    let (list_status, contacts) = send(&app, admin_get("/api/admin/contacts")).await;
    // assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["success"], true);
    let id = created["submissionId"].as_str().expect("missing submissionId");

    assert_eq!(list_status, StatusCode::OK);
    let contacts = contacts.as_array().unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["id"], id);
    assert_eq!(contacts[0]["interest"], "system-consulting");
    assert!(contacts[0]["createdAt"].is_string());
}

#[tokio::test]
async fn volunteer_signup_without_availability_is_rejected() {
    // arrange
    let app = spawn_app();
    let mut body = volunteer_payload();
    body.as_object_mut().unwrap().remove("availability");
    // act
    let (status, response) = send(&app, post_json("/api/volunteer-signup", &body)).await;
    // assert
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert_eq!(response["message"], "Invalid form data");
    let errors = response["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["field"], "availability");
}

#[tokio::test]
async fn volunteer_signup_returns_signup_id() {
    let app = spawn_app();

    let (status, response) = send(&app, post_json("/api/volunteer-signup", &volunteer_payload())).await;
    assert_eq!(status, StatusCode::OK);
    let id = response["signupId"].as_str().unwrap();
    assert!(id.parse::<Uuid>().is_ok());

    let (_, volunteers) = send(&app, admin_get("/api/admin/volunteers")).await;
    assert_eq!(volunteers[0]["id"], id);
    assert!(volunteers[0]["phoneNumber"].is_null());
    assert_eq!(volunteers[0]["agreesBackgroundCheck"], "true");
}

#[tokio::test]
async fn subscription_defaults_flags_and_first_name() {
    let app = spawn_app();

    let (status, response) = send(
        &app,
        post_json("/api/email-subscription", &json!({ "email": "reader@example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["subscriptionId"].is_string());

    let (_, subscribers) = send(&app, admin_get("/api/admin/subscribers")).await;
    assert_eq!(subscribers[0]["email"], "reader@example.org");
    assert!(subscribers[0]["firstName"].is_null());
    assert_eq!(subscribers[0]["interestedInAnalytics"], "false");
    assert_eq!(subscribers[0]["interestedInRise"], "false");
}

#[tokio::test]
async fn contact_reports_every_missing_field() {
    let app = spawn_app();
    let test_cases = vec![
        (json!({ "email": "a@x.com", "interest": "other", "message": "hi" }), vec!["name"]),
        (json!({ "name": "Ada", "interest": "other", "message": "hi" }), vec!["email"]),
        (json!({}), vec!["name", "email", "interest", "message"]),
    ];

    for (invalid_body, expected_fields) in test_cases {
        let (status, response) = send(&app, post_json("/api/contact", &invalid_body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted {invalid_body}");
        let fields: Vec<_> = response["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, expected_fields);
    }
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = spawn_app();
    let request = Request::post("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, response) = send(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert_eq!(response["errors"][0]["field"], "");
}

#[tokio::test]
async fn non_json_content_type_is_a_bad_request() {
    let app = spawn_app();
    let body = json!({ "name": "Ada", "email": "a@x.com", "interest": "other", "message": "hi" });
    let test_cases = vec![Some("text/plain"), Some("application/x-www-form-urlencoded"), None];

    for content_type in test_cases {
        let mut request = Request::post("/api/contact");
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        let request = request.body(Body::from(body.to_string())).unwrap();

        let (status, response) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "content type {content_type:?}");
        assert_eq!(response["message"], "Invalid form data");
        assert_eq!(response["errors"][0]["field"], "");
    }
}

#[tokio::test]
async fn oversized_body_is_a_bad_request() {
    let app = spawn_app();
    let mut body = volunteer_payload();
    body["whyInterested"] = json!("x".repeat(oria_api::MAX_BODY_BYTES));

    let (status, response) = send(&app, post_json("/api/volunteer-signup", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn fields_at_the_length_cap_fit_in_the_body_limit() {
    let app = spawn_app();
    let long = "😀".repeat(MAX_FIELD_LEN);
    let mut body = volunteer_payload();
    for field in ["fullName", "phoneNumber", "availability", "whyInterested", "experienceWithChildren"] {
        body[field] = json!(long);
    }
    assert!(body.to_string().len() > 64 * 1024);

    let (status, response) = send(&app, post_json("/api/volunteer-signup", &body)).await;

    assert_eq!(status, StatusCode::OK, "{response}");
    assert!(response["signupId"].is_string());
}

#[tokio::test]
async fn unknown_api_paths_are_json_404s() {
    let app = spawn_app().fallback(|| async { "<!doctype html>" });

    for path in ["/api/nope", "/api/contact/extra"] {
        let (status, response) = send(&app, Request::get(path).body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(response["success"], false, "{path}");
        assert_eq!(response["message"], "Not found", "{path}");
    }

    let response = app
        .oneshot(Request::get("/volunteer").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_routes_require_the_bearer_token() {
    let app = spawn_app();

    let missing = Request::get("/api/admin/contacts").body(Body::empty()).unwrap();
    let (status, _) = send(&app, missing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = Request::get("/api/admin/subscribers")
        .header(header::AUTHORIZATION, "Bearer not-the-token")
        .body(Body::empty())
        .unwrap();
    let (status, response) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response["message"], "Unauthorized");
}

#[tokio::test]
async fn admin_routes_are_closed_without_a_configured_token() {
    let app = app_with(Arc::new(MemStorage::new()), None);

    let (status, response) = send(&app, admin_get("/api/admin/volunteers")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["success"], false);
}

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app();
    let response = app
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

/// Backend whose store is unreachable.
struct UnreachableStorage;

fn refused<T>() -> Result<T, StorageError> {
    Err(StorageError::Unavailable(anyhow::anyhow!("connection refused (db.internal:5432)")))
}

#[async_trait]
impl Storage for UnreachableStorage {
    async fn get_user(&self, _id: Uuid) -> Result<Option<User>, StorageError> {
        refused()
    }
    async fn get_user_by_username(&self, _username: &str) -> Result<Option<User>, StorageError> {
        refused()
    }
    async fn create_user(&self, _user: NewUser) -> Result<User, StorageError> {
        refused()
    }
    async fn create_contact_submission(
        &self,
        _submission: NewContactSubmission,
    ) -> Result<ContactSubmission, StorageError> {
        refused()
    }
    async fn create_email_subscription(
        &self,
        _subscription: NewEmailSubscription,
    ) -> Result<EmailSubscription, StorageError> {
        refused()
    }
    async fn create_volunteer_signup(
        &self,
        _signup: NewVolunteerSignup,
    ) -> Result<VolunteerSignup, StorageError> {
        refused()
    }
    async fn get_all_contact_submissions(&self) -> Result<Vec<ContactSubmission>, StorageError> {
        refused()
    }
    async fn get_all_email_subscriptions(&self) -> Result<Vec<EmailSubscription>, StorageError> {
        refused()
    }
    async fn get_all_volunteer_signups(&self) -> Result<Vec<VolunteerSignup>, StorageError> {
        refused()
    }
}

#[tokio::test]
async fn storage_failures_are_generic_500s() {
    let app = app_with(Arc::new(UnreachableStorage), Some(ADMIN_TOKEN));

    let (status, response) = send(
        &app,
        post_json("/api/email-subscription", &json!({ "email": "reader@example.org" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["message"], "Internal server error");
    assert!(!response.to_string().contains("db.internal"));

    let (status, _) = send(&app, admin_get("/api/admin/contacts")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn validation_runs_before_storage() {
    let app = app_with(Arc::new(UnreachableStorage), None);

    let (status, _) = send(&app, post_json("/api/contact", &json!({ "name": "Ada" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
