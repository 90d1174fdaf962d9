use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::{debug, error};
use uuid::Uuid;

use oria_db::Database;
use oria_db::queries::is_unique_violation;
use oria_types::api::{NewContactSubmission, NewEmailSubscription, NewUser, NewVolunteerSignup};
use oria_types::models::{ContactSubmission, EmailSubscription, User, VolunteerSignup};

use crate::{Result, Storage, StorageError};

/// SQLite-backed store. Ids are generated here, `created_at` by the column
/// defaults; every call is a single statement run off the async runtime.
pub struct DatabaseStorage {
    db: Arc<Database>,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                StorageError::Unavailable(anyhow!("database task failed: {}", e))
            })?
            .map_err(StorageError::from)
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        self.run(move |db| {
            db.get_user_by_id(&id.to_string())?
                .map(|row| row.into_model())
                .transpose()
        })
        .await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.to_string();
        self.run(move |db| {
            db.get_user_by_username(&username)?
                .map(|row| row.into_model())
                .transpose()
        })
        .await
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let username = user.username.clone();
        let id = Uuid::new_v4().to_string();
        self.run(move |db| db.create_user(&id, &user)?.into_model())
            .await
            .map_err(|e| match e {
                StorageError::Unavailable(inner) if is_unique_violation(&inner) => {
                    StorageError::UsernameTaken(username)
                }
                other => other,
            })
    }

    async fn create_contact_submission(
        &self,
        submission: NewContactSubmission,
    ) -> Result<ContactSubmission> {
        let id = Uuid::new_v4().to_string();
        let record = self
            .run(move |db| db.insert_contact_submission(&id, &submission)?.into_model())
            .await?;
        debug!("Stored contact submission {}", record.id);
        Ok(record)
    }

    async fn create_email_subscription(
        &self,
        subscription: NewEmailSubscription,
    ) -> Result<EmailSubscription> {
        let id = Uuid::new_v4().to_string();
        let record = self
            .run(move |db| db.insert_email_subscription(&id, &subscription)?.into_model())
            .await?;
        debug!("Stored email subscription {}", record.id);
        Ok(record)
    }

    async fn create_volunteer_signup(&self, signup: NewVolunteerSignup) -> Result<VolunteerSignup> {
        let id = Uuid::new_v4().to_string();
        let record = self
            .run(move |db| db.insert_volunteer_signup(&id, &signup)?.into_model())
            .await?;
        debug!("Stored volunteer signup {}", record.id);
        Ok(record)
    }

    async fn get_all_contact_submissions(&self) -> Result<Vec<ContactSubmission>> {
        self.run(|db| {
            db.list_contact_submissions()?
                .into_iter()
                .map(|row| row.into_model())
                .collect()
        })
        .await
    }

    async fn get_all_email_subscriptions(&self) -> Result<Vec<EmailSubscription>> {
        self.run(|db| {
            db.list_email_subscriptions()?
                .into_iter()
                .map(|row| row.into_model())
                .collect()
        })
        .await
    }

    async fn get_all_volunteer_signups(&self) -> Result<Vec<VolunteerSignup>> {
        self.run(|db| {
            db.list_volunteer_signups()?
                .into_iter()
                .map(|row| row.into_model())
                .collect()
        })
        .await
    }
}
