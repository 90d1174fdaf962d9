use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use oria_types::api::{NewContactSubmission, NewEmailSubscription, NewUser, NewVolunteerSignup};

use crate::Database;
use crate::models::{ContactSubmissionRow, EmailSubscriptionRow, UserRow, VolunteerSignupRow};

const CONTACT_COLUMNS: &str = "id, name, email, interest, message, created_at";
const SUBSCRIPTION_COLUMNS: &str =
    "id, email, first_name, interested_in_analytics, interested_in_rise, created_at";
const VOLUNTEER_COLUMNS: &str = "id, full_name, email, phone_number, availability, why_interested, \
     experience_with_children, is_over_18, agrees_background_check, created_at";

impl Database {
    // -- Users --

    pub fn create_user(&self, id: &str, user: &NewUser) -> Result<UserRow> {
        self.with_conn(|conn| {
            let row = conn.query_row(
                "INSERT INTO users (id, username, password) VALUES (?1, ?2, ?3)
                 RETURNING id, username, password",
                params![id, user.username, user.password],
                user_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    // -- Contact submissions --

    pub fn insert_contact_submission(
        &self,
        id: &str,
        submission: &NewContactSubmission,
    ) -> Result<ContactSubmissionRow> {
        self.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO contact_submissions (id, name, email, interest, message)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {CONTACT_COLUMNS}"
            );
            let row = conn.query_row(
                &sql,
                params![
                    id,
                    submission.name,
                    submission.email,
                    submission.interest,
                    submission.message
                ],
                contact_row,
            )?;
            Ok(row)
        })
    }

    pub fn list_contact_submissions(&self) -> Result<Vec<ContactSubmissionRow>> {
        self.with_conn(|conn| list(conn, "contact_submissions", CONTACT_COLUMNS, contact_row))
    }

    // -- Email subscriptions --

    pub fn insert_email_subscription(
        &self,
        id: &str,
        subscription: &NewEmailSubscription,
    ) -> Result<EmailSubscriptionRow> {
        self.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO email_subscriptions
                     (id, email, first_name, interested_in_analytics, interested_in_rise)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING {SUBSCRIPTION_COLUMNS}"
            );
            let row = conn.query_row(
                &sql,
                params![
                    id,
                    subscription.email,
                    subscription.first_name,
                    subscription.interested_in_analytics.unwrap_or_default().as_str(),
                    subscription.interested_in_rise.unwrap_or_default().as_str(),
                ],
                subscription_row,
            )?;
            Ok(row)
        })
    }

    pub fn list_email_subscriptions(&self) -> Result<Vec<EmailSubscriptionRow>> {
        self.with_conn(|conn| {
            list(conn, "email_subscriptions", SUBSCRIPTION_COLUMNS, subscription_row)
        })
    }

    // -- Volunteer signups --

    pub fn insert_volunteer_signup(
        &self,
        id: &str,
        signup: &NewVolunteerSignup,
    ) -> Result<VolunteerSignupRow> {
        self.with_conn(|conn| {
            let sql = format!(
                "INSERT INTO volunteer_signups
                     (id, full_name, email, phone_number, availability, why_interested,
                      experience_with_children, is_over_18, agrees_background_check)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 RETURNING {VOLUNTEER_COLUMNS}"
            );
            let row = conn.query_row(
                &sql,
                params![
                    id,
                    signup.full_name,
                    signup.email,
                    signup.phone_number,
                    signup.availability,
                    signup.why_interested,
                    signup.experience_with_children,
                    signup.is_over18.as_str(),
                    signup.agrees_background_check.unwrap_or_default().as_str(),
                ],
                volunteer_row,
            )?;
            Ok(row)
        })
    }

    pub fn list_volunteer_signups(&self) -> Result<Vec<VolunteerSignupRow>> {
        self.with_conn(|conn| list(conn, "volunteer_signups", VOLUNTEER_COLUMNS, volunteer_row))
    }
}

/// True when `err` came from a UNIQUE or PRIMARY KEY constraint failure.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation
    )
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!("SELECT id, username, password FROM users WHERE {column} = ?1");
    let mut stmt = conn.prepare(&sql)?;
    let row = stmt.query_row([value], user_row).optional()?;
    Ok(row)
}

// Oldest first; rowid breaks ties between rows stamped in the same millisecond.
fn list<T>(
    conn: &Connection,
    table: &str,
    columns: &str,
    map: fn(&Row<'_>) -> rusqlite::Result<T>,
) -> Result<Vec<T>> {
    let sql = format!("SELECT {columns} FROM {table} ORDER BY created_at ASC, rowid ASC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], map)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn user_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
    })
}

fn contact_row(row: &Row<'_>) -> rusqlite::Result<ContactSubmissionRow> {
    Ok(ContactSubmissionRow {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        interest: row.get(3)?,
        message: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn subscription_row(row: &Row<'_>) -> rusqlite::Result<EmailSubscriptionRow> {
    Ok(EmailSubscriptionRow {
        id: row.get(0)?,
        email: row.get(1)?,
        first_name: row.get(2)?,
        interested_in_analytics: row.get(3)?,
        interested_in_rise: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn volunteer_row(row: &Row<'_>) -> rusqlite::Result<VolunteerSignupRow> {
    Ok(VolunteerSignupRow {
        id: row.get(0)?,
        full_name: row.get(1)?,
        email: row.get(2)?,
        phone_number: row.get(3)?,
        availability: row.get(4)?,
        why_interested: row.get(5)?,
        experience_with_children: row.get(6)?,
        is_over_18: row.get(7)?,
        agrees_background_check: row.get(8)?,
        created_at: row.get(9)?,
    })
}
