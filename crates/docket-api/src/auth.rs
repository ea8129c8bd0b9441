use axum::{Form, Json, extract::State};

use docket_types::api::{LoginRequest, TokenForm, TokenResponse};
use docket_types::models::User;

use crate::error::ApiError;
use crate::{AppState, gate, run_blocking};

/// OAuth2-style token endpoint: form-encoded username and password in,
/// bearer token out.
pub async fn token(
    State(state): State<AppState>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    let auth_state = state.clone();
    let user =
        run_blocking(move || gate::authenticate(&auth_state, &form.username, &form.password))
            .await?;

    let access_token = state
        .tokens
        .issue(&user.username)
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
    }))
}

/// JSON login returning the user record. Verifies the password against the
/// stored Argon2id hash.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>, ApiError> {
    let user =
        run_blocking(move || gate::authenticate(&state, &req.username, &req.password)).await?;
    Ok(Json(user.into()))
}
