use axum::{Json, extract::State};
use tracing::{error, info};

use oria_types::api::{NewEmailSubscription, SubscriptionResponse};

use crate::error::ApiError;
use crate::extract::ValidatedJson;
use crate::state::AppState;

/// POST /api/email-subscription
pub async fn subscribe(
    State(state): State<AppState>,
    ValidatedJson(subscription): ValidatedJson<NewEmailSubscription>,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    let subscription = state
        .storage
        .create_email_subscription(subscription)
        .await
        .map_err(|e| {
            error!("Email subscription error: {}", e);
            ApiError::Internal
        })?;

    info!("Email subscription {} created", subscription.id);

    Ok(Json(SubscriptionResponse {
        success: true,
        message: "Email subscription successful".to_string(),
        subscription_id: subscription.id,
    }))
}
