use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};

use docket_db::models::UserRow;

use crate::AppState;
use crate::error::ApiError;

/// Hash a new password with Argon2id.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Look up a user by username and verify the password against the stored
/// Argon2id hash. The same error covers unknown usernames and bad
/// passwords, and verification is constant-time in the hash comparison.
pub fn authenticate(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<UserRow, ApiError> {
    let user = state
        .db
        .find_user_by_username(username)?
        .ok_or(ApiError::InvalidCredentials)?;

    let parsed_hash =
        PasswordHash::new(&user.password).map_err(|_| ApiError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    Ok(user)
}

/// Resolve a bearer token to its user record. Fails if the token does not
/// verify or the subject no longer exists.
pub fn resolve_bearer(state: &AppState, token: &str) -> Result<UserRow, ApiError> {
    let subject = state
        .tokens
        .verify(token)
        .map_err(|_| ApiError::Unauthenticated)?;

    state
        .db
        .find_user_by_username(&subject)?
        .ok_or(ApiError::Unauthenticated)
}

pub fn require_admin(user: &UserRow) -> Result<(), ApiError> {
    if user.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Pull the raw token out of an optional Authorization header; a missing
/// header is an authentication failure, not a malformed request.
pub fn bearer_token(header: &Option<TypedHeader<Authorization<Bearer>>>) -> Result<&str, ApiError> {
    header
        .as_ref()
        .map(|TypedHeader(auth)| auth.token())
        .ok_or(ApiError::Unauthenticated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppStateInner, token::TokenService};
    use docket_db::Database;
    use docket_db::models::NewUser;
    use std::sync::Arc;

    fn test_state() -> AppState {
        Arc::new(AppStateInner {
            db: Arc::new(Database::open_in_memory().unwrap()),
            tokens: TokenService::new("test-secret", 30),
        })
    }

    fn seed_user(state: &AppState, username: &str, password: &str, is_admin: bool) -> UserRow {
        let hash = hash_password(password).unwrap();
        state
            .db
            .create_user(&NewUser {
                name: "Alice",
                username,
                email: &format!("{username}@example.com"),
                mobile: &format!("9{:09}", username.len()),
                password_hash: &hash,
                is_admin,
            })
            .unwrap()
    }

    #[test]
    fn authenticate_accepts_correct_password() {
        let state = test_state();
        seed_user(&state, "alice", "pw123", false);

        let user = authenticate(&state, "alice", "pw123").unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn authenticate_rejects_wrong_password_and_unknown_user() {
        let state = test_state();
        seed_user(&state, "alice", "pw123", false);

        assert!(matches!(
            authenticate(&state, "alice", "wrong"),
            Err(ApiError::InvalidCredentials)
        ));
        assert!(matches!(
            authenticate(&state, "nobody", "pw123"),
            Err(ApiError::InvalidCredentials)
        ));
    }

    #[test]
    fn resolve_bearer_requires_existing_user() {
        let state = test_state();
        let user = seed_user(&state, "alice", "pw123", false);

        let token = state.tokens.issue("alice").unwrap();
        assert_eq!(resolve_bearer(&state, &token).unwrap().id, user.id);

        // Token for a user that no longer exists
        state.db.delete_user(user.id).unwrap();
        assert!(matches!(
            resolve_bearer(&state, &token),
            Err(ApiError::Unauthenticated)
        ));
    }

    #[test]
    fn require_admin_gates_on_flag() {
        let state = test_state();
        let member = seed_user(&state, "alice", "pw123", false);
        let admin = seed_user(&state, "boss", "pw456", true);

        assert!(matches!(require_admin(&member), Err(ApiError::Forbidden)));
        assert!(require_admin(&admin).is_ok());
    }
}
