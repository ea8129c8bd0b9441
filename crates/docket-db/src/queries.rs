use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};

use crate::Database;
use crate::error::{StoreError, map_constraint};
use crate::models::{NewCase, NewUser, UserRow};
use docket_types::models::Case;

impl Database {
    // -- Users --

    /// Insert a user. Uniqueness of username/email/mobile is enforced here
    /// authoritatively; callers may pre-check for friendlier messages but
    /// a `Duplicate` from this method is the final word.
    pub fn create_user(&self, new: &NewUser<'_>) -> Result<UserRow, StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (name, username, email, mobile, password, is_admin)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (
                    new.name,
                    new.username,
                    new.email,
                    new.mobile,
                    new.password_hash,
                    new.is_admin,
                ),
            )
            .map_err(map_constraint)?;

            Ok(UserRow {
                id: conn.last_insert_rowid(),
                name: new.name.to_string(),
                username: new.username.to_string(),
                email: new.email.to_string(),
                mobile: new.mobile.to_string(),
                password: new.password_hash.to_string(),
                is_admin: new.is_admin,
            })
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn find_user_by_mobile(&self, mobile: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| query_user(conn, "mobile", mobile))
    }

    pub fn find_user_by_id(&self, id: i64) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let row = conn
                .prepare(
                    "SELECT id, name, username, email, mobile, password, is_admin
                     FROM users WHERE id = ?1",
                )?
                .query_row([id], row_to_user)
                .optional()?;
            Ok(row)
        })
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, username, email, mobile, password, is_admin
                 FROM users ORDER BY id",
            )?;
            let rows = stmt
                .query_map([], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Delete a user by id. Returns false when no row matched. Cases owned
    /// by the user are removed by the ON DELETE CASCADE constraint.
    pub fn delete_user(&self, id: i64) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(affected > 0)
        })
    }

    // -- Cases --

    pub fn create_case(&self, new: &NewCase<'_>) -> Result<Case, StoreError> {
        let created_at = chrono::Local::now().date_naive();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO cases (user_id, case_details, status, next_hearing_date, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (
                    new.user_id,
                    new.case_details,
                    new.status,
                    new.next_hearing_date,
                    created_at,
                ),
            )
            .map_err(map_constraint)?;

            Ok(Case {
                case_id: conn.last_insert_rowid(),
                user_id: new.user_id,
                case_details: new.case_details.to_string(),
                status: new.status.to_string(),
                next_hearing_date: new.next_hearing_date,
                created_at,
            })
        })
    }

    /// Cases with a hearing date in the inclusive range [from, to], ordered
    /// by date. The notification sweep drives this with its look-ahead
    /// window; ISO-8601 text dates compare correctly as strings.
    pub fn cases_due_between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Case>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT case_id, user_id, case_details, status, next_hearing_date, created_at
                 FROM cases
                 WHERE next_hearing_date >= ?1 AND next_hearing_date <= ?2
                 ORDER BY next_hearing_date, case_id",
            )?;
            let rows = stmt
                .query_map((from, to), row_to_case)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>, StoreError> {
    // `column` is always a literal from this module, never caller input.
    let sql = format!(
        "SELECT id, name, username, email, mobile, password, is_admin
         FROM users WHERE {column} = ?1"
    );
    let row = conn.prepare(&sql)?.query_row([value], row_to_user).optional()?;
    Ok(row)
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        mobile: row.get(4)?,
        password: row.get(5)?,
        is_admin: row.get(6)?,
    })
}

fn row_to_case(row: &rusqlite::Row<'_>) -> rusqlite::Result<Case> {
    Ok(Case {
        case_id: row.get(0)?,
        user_id: row.get(1)?,
        case_details: row.get(2)?,
        status: row.get(3)?,
        next_hearing_date: row.get(4)?,
        created_at: row.get(5)?,
    })
}
