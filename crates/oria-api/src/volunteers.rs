use axum::{Json, extract::State};
use tracing::{error, info};

use oria_types::api::{NewVolunteerSignup, SignupResponse};

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// POST /api/volunteer-signup
pub async fn sign_up(
    State(state): State<AppState>,
    ValidatedJson(signup): ValidatedJson<NewVolunteerSignup>,
) -> Result<Json<SignupResponse>, ApiError> {
    let signup = state
        .storage
        .create_volunteer_signup(signup)
        .await
        .map_err(|e| {
            error!("Volunteer signup error: {}", e);
            ApiError::Internal
        })?;

    info!("Volunteer signup {} received", signup.id);

    Ok(Json(SignupResponse {
        success: true,
        message: "Volunteer signup successful".to_string(),
        signup_id: signup.id,
    }))
}
