use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        // created_at keeps millisecond precision in RFC 3339 form so rows sort
        // lexically in creation order.
        conn.execute_batch(
            "
            CREATE TABLE users (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL
            );

            CREATE TABLE contact_submissions (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                email       TEXT NOT NULL,
                interest    TEXT,
                message     TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE email_subscriptions (
                id                      TEXT PRIMARY KEY,
                email                   TEXT NOT NULL,
                first_name              TEXT,
                interested_in_analytics TEXT NOT NULL DEFAULT 'false',
                interested_in_rise      TEXT NOT NULL DEFAULT 'false',
                created_at              TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE volunteer_signups (
                id                       TEXT PRIMARY KEY,
                full_name                TEXT NOT NULL,
                email                    TEXT NOT NULL,
                phone_number             TEXT,
                availability             TEXT NOT NULL,
                why_interested           TEXT NOT NULL,
                experience_with_children TEXT NOT NULL,
                is_over_18               TEXT NOT NULL,
                agrees_background_check  TEXT NOT NULL DEFAULT 'false',
                created_at               TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX idx_contact_submissions_created ON contact_submissions(created_at);
            CREATE INDEX idx_email_subscriptions_created ON email_subscriptions(created_at);
            CREATE INDEX idx_volunteer_signups_created ON volunteer_signups(created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
