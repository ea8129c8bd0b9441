use chrono::NaiveDate;
use docket_types::models::User;

/// Full user row including the password hash. Never serialized; convert to
/// `docket_types::models::User` before anything leaves the store layer.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub is_admin: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            username: row.username,
            email: row.email,
            mobile: row.mobile,
            is_admin: row.is_admin,
        }
    }
}

#[derive(Debug)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub mobile: &'a str,
    /// Argon2id hash, never the plaintext password.
    pub password_hash: &'a str,
    pub is_admin: bool,
}

#[derive(Debug)]
pub struct NewCase<'a> {
    pub user_id: i64,
    pub case_details: &'a str,
    pub status: &'a str,
    pub next_hearing_date: NaiveDate,
}
