pub mod admin;
pub mod contact;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod state;
pub mod subscriptions;
pub mod volunteers;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::error::ApiError;
use crate::state::AppState;

/// Fits the volunteer form's six free-text fields at `MAX_FIELD_LEN`, each
/// character escaped as `\uXXXX`.
pub const MAX_BODY_BYTES: usize = 256 * 1024;

/// All `/api` routes with their state attached. Transport layers (CORS,
/// tracing, static files) are added by the binary.
pub fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/contacts", get(admin::list_contacts))
        .route("/subscribers", get(admin::list_subscribers))
        .route("/volunteers", get(admin::list_volunteers))
        .layer(from_fn_with_state(state.clone(), middleware::require_admin));

    let api_routes = Router::new()
        .route("/contact", post(contact::submit_contact))
        .route("/email-subscription", post(subscriptions::subscribe))
        .route("/volunteer-signup", post(volunteers::sign_up))
        .route("/health", get(health))
        .nest("/admin", admin_routes)
        .fallback(not_found);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Keeps unknown `/api` paths out of the static frontend fallback.
async fn not_found() -> ApiError {
    ApiError::NotFound
}
