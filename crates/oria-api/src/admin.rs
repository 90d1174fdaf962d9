//! Read-only listings behind the admin guard. Records come back oldest first.

use axum::{Json, extract::State};
use tracing::error;

use oria_types::models::{ContactSubmission, EmailSubscription, VolunteerSignup};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/admin/contacts
pub async fn list_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactSubmission>>, ApiError> {
    let contacts = state.storage.get_all_contact_submissions().await.map_err(|e| {
        error!("Error fetching contacts: {}", e);
        ApiError::Internal
    })?;
    Ok(Json(contacts))
}

/// GET /api/admin/subscribers
pub async fn list_subscribers(
    State(state): State<AppState>,
) -> Result<Json<Vec<EmailSubscription>>, ApiError> {
    let subscribers = state.storage.get_all_email_subscriptions().await.map_err(|e| {
        error!("Error fetching subscribers: {}", e);
        ApiError::Internal
    })?;
    Ok(Json(subscribers))
}

/// GET /api/admin/volunteers
pub async fn list_volunteers(
    State(state): State<AppState>,
) -> Result<Json<Vec<VolunteerSignup>>, ApiError> {
    let volunteers = state.storage.get_all_volunteer_signups().await.map_err(|e| {
        error!("Error fetching volunteers: {}", e);
        ApiError::Internal
    })?;
    Ok(Json(volunteers))
}
