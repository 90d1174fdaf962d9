use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use oria_types::api::{NewContactSubmission, NewEmailSubscription, NewUser, NewVolunteerSignup};
use oria_types::models::{ContactSubmission, EmailSubscription, User, VolunteerSignup};

use crate::{Result, Storage, StorageError};

/// Process-local store. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

/// A stored record plus its insertion sequence number, which orders records
/// stamped with the same instant.
struct Entry<T> {
    seq: u64,
    record: T,
}

#[derive(Default)]
struct Tables {
    next_seq: u64,
    users: HashMap<Uuid, User>,
    contact_submissions: HashMap<Uuid, Entry<ContactSubmission>>,
    email_subscriptions: HashMap<Uuid, Entry<EmailSubscription>>,
    volunteer_signups: HashMap<Uuid, Entry<VolunteerSignup>>,
}

impl Tables {
    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StorageError::Unavailable(anyhow!("memory store lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StorageError::Unavailable(anyhow!("memory store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StorageError::UsernameTaken(user.username));
        }

        let user = User {
            id: fresh_id(&tables.users),
            username: user.username,
            password: user.password,
        };
        tables.users.insert(user.id, user.clone());

        debug!("Created user {}", user.id);
        Ok(user)
    }

    async fn create_contact_submission(
        &self,
        submission: NewContactSubmission,
    ) -> Result<ContactSubmission> {
        let mut tables = self.write()?;
        let record = ContactSubmission {
            id: fresh_id(&tables.contact_submissions),
            name: submission.name,
            email: submission.email,
            interest: submission.interest,
            message: submission.message,
            created_at: Utc::now(),
        };
        let seq = tables.next_seq();
        tables.contact_submissions.insert(
            record.id,
            Entry {
                seq,
                record: record.clone(),
            },
        );

        debug!("Stored contact submission {}", record.id);
        Ok(record)
    }

    async fn create_email_subscription(
        &self,
        subscription: NewEmailSubscription,
    ) -> Result<EmailSubscription> {
        let mut tables = self.write()?;
        let record = EmailSubscription {
            id: fresh_id(&tables.email_subscriptions),
            email: subscription.email,
            first_name: subscription.first_name,
            interested_in_analytics: subscription.interested_in_analytics.unwrap_or_default(),
            interested_in_rise: subscription.interested_in_rise.unwrap_or_default(),
            created_at: Utc::now(),
        };
        let seq = tables.next_seq();
        tables.email_subscriptions.insert(
            record.id,
            Entry {
                seq,
                record: record.clone(),
            },
        );

        debug!("Stored email subscription {}", record.id);
        Ok(record)
    }

    async fn create_volunteer_signup(&self, signup: NewVolunteerSignup) -> Result<VolunteerSignup> {
        let mut tables = self.write()?;
        let record = VolunteerSignup {
            id: fresh_id(&tables.volunteer_signups),
            full_name: signup.full_name,
            email: signup.email,
            phone_number: signup.phone_number,
            availability: signup.availability,
            why_interested: signup.why_interested,
            experience_with_children: signup.experience_with_children,
            is_over18: signup.is_over18,
            agrees_background_check: signup.agrees_background_check.unwrap_or_default(),
            created_at: Utc::now(),
        };
        let seq = tables.next_seq();
        tables.volunteer_signups.insert(
            record.id,
            Entry {
                seq,
                record: record.clone(),
            },
        );

        debug!("Stored volunteer signup {}", record.id);
        Ok(record)
    }

    async fn get_all_contact_submissions(&self) -> Result<Vec<ContactSubmission>> {
        Ok(oldest_first(&self.read()?.contact_submissions, |r| r.created_at))
    }

    async fn get_all_email_subscriptions(&self) -> Result<Vec<EmailSubscription>> {
        Ok(oldest_first(&self.read()?.email_subscriptions, |r| r.created_at))
    }

    async fn get_all_volunteer_signups(&self) -> Result<Vec<VolunteerSignup>> {
        Ok(oldest_first(&self.read()?.volunteer_signups, |r| r.created_at))
    }
}

fn fresh_id<V>(existing: &HashMap<Uuid, V>) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if !existing.contains_key(&id) {
            return id;
        }
    }
}

fn oldest_first<T: Clone>(
    entries: &HashMap<Uuid, Entry<T>>,
    created_at: fn(&T) -> DateTime<Utc>,
) -> Vec<T> {
    let mut sorted: Vec<&Entry<T>> = entries.values().collect();
    sorted.sort_by_key(|entry| (created_at(&entry.record), entry.seq));
    sorted.into_iter().map(|entry| entry.record.clone()).collect()
}
