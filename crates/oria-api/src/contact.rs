use axum::{Json, extract::State};
use tracing::{error, info};

use oria_types::api::{ContactResponse, NewContactSubmission};

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(submission): ValidatedJson<NewContactSubmission>,
) -> Result<Json<ContactResponse>, ApiError> {
    let submission = state
        .storage
        .create_contact_submission(submission)
        .await
        .map_err(|e| {
            error!("Contact form submission error: {}", e);
            ApiError::Internal
        })?;

    info!("Contact submission {} received", submission.id);

    Ok(Json(ContactResponse {
        success: true,
        message: "Contact submission received successfully".to_string(),
        submission_id: submission.id,
    }))
}
