//! Storage contract for submitted forms, with an in-memory and a SQLite backend.

mod database;
mod memory;

pub use database::DatabaseStorage;
pub use memory::MemStorage;

use async_trait::async_trait;
use uuid::Uuid;

use oria_types::api::{NewContactSubmission, NewEmailSubscription, NewUser, NewVolunteerSignup};
use oria_types::models::{ContactSubmission, EmailSubscription, User, VolunteerSignup};

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store could not be reached or rejected the statement.
    #[error("storage unavailable: {0:#}")]
    Unavailable(#[from] anyhow::Error),

    #[error("username already taken: {0}")]
    UsernameTaken(String),
}

/// Create/read operations over every record kind. Records are append-only:
/// there is no update or delete.
///
/// `get_all_*` return records oldest first. Lookups return `Ok(None)` on a miss.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: NewUser) -> Result<User>;

    async fn create_contact_submission(
        &self,
        submission: NewContactSubmission,
    ) -> Result<ContactSubmission>;
    async fn create_email_subscription(
        &self,
        subscription: NewEmailSubscription,
    ) -> Result<EmailSubscription>;
    async fn create_volunteer_signup(&self, signup: NewVolunteerSignup) -> Result<VolunteerSignup>;

    async fn get_all_contact_submissions(&self) -> Result<Vec<ContactSubmission>>;
    async fn get_all_email_subscriptions(&self) -> Result<Vec<EmailSubscription>>;
    async fn get_all_volunteer_signups(&self) -> Result<Vec<VolunteerSignup>>;
}
