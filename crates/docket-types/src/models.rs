use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered advocate. The stored password hash never leaves the
/// database layer; this is the shape every API response uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Case {
    pub case_id: i64,
    pub user_id: i64,
    pub case_details: String,
    pub status: String,
    pub next_hearing_date: NaiveDate,
    pub created_at: NaiveDate,
}

/// Recommended values for `Case::status`. The column is an open string
/// for compatibility with existing data; new writers should stick to these.
pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_CLOSED: &str = "Closed";
