use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Answer, Flag};
use crate::schema::FieldError;

// -- Insert records --
//
// Caller-supplied fields only. The storage layer assigns `id` and `created_at`
// and fills in defaults for the optional values left as `None`.

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub interest: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEmailSubscription {
    pub email: String,
    pub first_name: Option<String>,
    pub interested_in_analytics: Option<Flag>,
    pub interested_in_rise: Option<Flag>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVolunteerSignup {
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub availability: String,
    pub why_interested: String,
    pub experience_with_children: String,
    pub is_over18: Answer,
    pub agrees_background_check: Option<Flag>,
}

// -- Responses --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub submission_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub success: bool,
    pub message: String,
    pub subscription_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub signup_id: Uuid,
}

/// Body of every 4xx/5xx answer. `errors` is only present for validation failures.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_errors(message: impl Into<String>, errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: message.into(),
            errors,
        }
    }
}
