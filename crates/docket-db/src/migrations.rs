use rusqlite::Connection;
use tracing::info;

use crate::StoreError;

pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            username    TEXT NOT NULL UNIQUE,
            email       TEXT NOT NULL UNIQUE,
            mobile      TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            is_admin    INTEGER NOT NULL DEFAULT 0,
            UNIQUE(username, email, mobile)
        );

        CREATE INDEX IF NOT EXISTS idx_users_username ON users(username);
        CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);

        CREATE TABLE IF NOT EXISTS cases (
            case_id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id             INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            case_details        TEXT NOT NULL,
            status              TEXT NOT NULL DEFAULT 'Pending',
            next_hearing_date   TEXT NOT NULL,
            created_at          TEXT NOT NULL DEFAULT (date('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_cases_user ON cases(user_id);
        CREATE INDEX IF NOT EXISTS idx_cases_hearing ON cases(next_hearing_date);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
