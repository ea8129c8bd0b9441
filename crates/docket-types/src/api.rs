use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims carried by bearer tokens. The subject is the username; the
/// auth gate resolves it back to a user record on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// -- Users --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignupRequest {
    pub name: String,
    pub username: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

// -- Cases --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCaseRequest {
    pub user_id: i64,
    pub case_details: String,
    #[serde(default)]
    pub status: Option<String>,
    pub next_hearing_date: NaiveDate,
}

// -- Misc --

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}
