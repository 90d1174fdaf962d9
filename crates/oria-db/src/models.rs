//! Database row types. These map directly to SQLite rows and stay distinct
//! from the oria-types models so the DB layer owns its own text encoding.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use oria_types::models::{ContactSubmission, EmailSubscription, User, VolunteerSignup};

#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug)]
pub struct ContactSubmissionRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub interest: Option<String>,
    pub message: String,
    pub created_at: String,
}

#[derive(Debug)]
pub struct EmailSubscriptionRow {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub interested_in_analytics: String,
    pub interested_in_rise: String,
    pub created_at: String,
}

#[derive(Debug)]
pub struct VolunteerSignupRow {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub availability: String,
    pub why_interested: String,
    pub experience_with_children: String,
    pub is_over_18: String,
    pub agrees_background_check: String,
    pub created_at: String,
}

impl UserRow {
    pub fn into_model(self) -> Result<User> {
        Ok(User {
            id: parse_id(&self.id)?,
            username: self.username,
            password: self.password,
        })
    }
}

impl ContactSubmissionRow {
    pub fn into_model(self) -> Result<ContactSubmission> {
        Ok(ContactSubmission {
            id: parse_id(&self.id)?,
            created_at: parse_timestamp(&self.created_at)
                .with_context(|| format!("contact submission {}", self.id))?,
            name: self.name,
            email: self.email,
            interest: self.interest,
            message: self.message,
        })
    }
}

impl EmailSubscriptionRow {
    pub fn into_model(self) -> Result<EmailSubscription> {
        Ok(EmailSubscription {
            id: parse_id(&self.id)?,
            created_at: parse_timestamp(&self.created_at)
                .with_context(|| format!("email subscription {}", self.id))?,
            interested_in_analytics: self.interested_in_analytics.parse().map_err(|e| anyhow!("{}", e))?,
            interested_in_rise: self.interested_in_rise.parse().map_err(|e| anyhow!("{}", e))?,
            email: self.email,
            first_name: self.first_name,
        })
    }
}

impl VolunteerSignupRow {
    pub fn into_model(self) -> Result<VolunteerSignup> {
        Ok(VolunteerSignup {
            id: parse_id(&self.id)?,
            created_at: parse_timestamp(&self.created_at)
                .with_context(|| format!("volunteer signup {}", self.id))?,
            is_over18: self.is_over_18.parse().map_err(|e| anyhow!("{}", e))?,
            agrees_background_check: self.agrees_background_check.parse().map_err(|e| anyhow!("{}", e))?,
            full_name: self.full_name,
            email: self.email,
            phone_number: self.phone_number,
            availability: self.availability,
            why_interested: self.why_interested,
            experience_with_children: self.experience_with_children,
        })
    }
}

fn parse_id(id: &str) -> Result<Uuid> {
    id.parse().with_context(|| format!("Corrupt id '{}'", id))
}

/// Parses the RFC 3339 text the `created_at` column defaults write.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .with_context(|| format!("Corrupt created_at '{}'", raw))
}
