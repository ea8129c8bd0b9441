pub mod auth;
pub mod cases;
pub mod error;
pub mod gate;
pub mod token;
pub mod users;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{delete, get, post},
};

use docket_db::Database;
use docket_types::api::Message;

use crate::token::TokenService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub tokens: TokenService,
}

/// Run store access and password hashing off the async runtime. The store's
/// connection mutex may be held by an in-progress notification sweep, so a
/// handler must never wait on it from a tokio worker thread.
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, error::ApiError>
where
    F: FnOnce() -> Result<T, error::ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| error::ApiError::Internal(anyhow::anyhow!("blocking task join error: {e}")))?
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/token", post(auth::token))
        .route("/login/", post(auth::login))
        .route("/users/", post(users::signup).get(users::list_users))
        .route("/users/{id}", delete(users::delete_user))
        .route("/me", get(users::me))
        .route("/cases/", post(cases::create_case))
        .with_state(state)
}

/// Liveness message, not a functional endpoint.
async fn root() -> Json<Message> {
    Json(Message {
        message: "Advocate daily case notification running".into(),
    })
}
