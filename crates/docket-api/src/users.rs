use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};
use tracing::info;

use docket_db::models::NewUser;
use docket_types::api::{Message, SignupRequest};
use docket_types::models::User;

use crate::error::ApiError;
use crate::{AppState, gate, run_blocking};

/// Signup. Pre-checks each unique field for a friendly message; the store
/// still enforces uniqueness on insert.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = run_blocking(move || {
        if state.db.find_user_by_username(&req.username)?.is_some() {
            return Err(ApiError::Validation("Username already exists".into()));
        }
        if state.db.find_user_by_email(&req.email)?.is_some() {
            return Err(ApiError::Validation("Email already exists".into()));
        }
        if state.db.find_user_by_mobile(&req.mobile)?.is_some() {
            return Err(ApiError::Validation("Mobile already exists".into()));
        }

        let password_hash = gate::hash_password(&req.password)?;

        Ok(state.db.create_user(&NewUser {
            name: &req.name,
            username: &req.username,
            email: &req.email,
            mobile: &req.mobile,
            password_hash: &password_hash,
            is_admin: false,
        })?)
    })
    .await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn me(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<User>, ApiError> {
    let token = gate::bearer_token(&bearer)?.to_string();
    let user = run_blocking(move || gate::resolve_bearer(&state, &token)).await?;
    Ok(Json(user.into()))
}

pub async fn list_users(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let token = gate::bearer_token(&bearer)?.to_string();
    let users = run_blocking(move || {
        let caller = gate::resolve_bearer(&state, &token)?;
        gate::require_admin(&caller)?;

        Ok(state
            .db
            .list_users()?
            .into_iter()
            .map(User::from)
            .collect())
    })
    .await?;

    Ok(Json(users))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Json<Message>, ApiError> {
    let token = gate::bearer_token(&bearer)?.to_string();
    let deleted_by = run_blocking(move || {
        let caller = gate::resolve_bearer(&state, &token)?;
        gate::require_admin(&caller)?;

        if !state.db.delete_user(id)? {
            return Err(ApiError::NotFound("User not found".into()));
        }
        Ok(caller.id)
    })
    .await?;

    info!(user_id = id, deleted_by, "user deleted");
    Ok(Json(Message {
        message: "User deleted".into(),
    }))
}
