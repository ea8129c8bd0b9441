use axum::{Json, extract::State, http::StatusCode};

use docket_db::models::NewCase;
use docket_types::api::CreateCaseRequest;
use docket_types::models::{Case, STATUS_PENDING};

use crate::error::ApiError;
use crate::{AppState, run_blocking};

pub async fn create_case(
    State(state): State<AppState>,
    Json(req): Json<CreateCaseRequest>,
) -> Result<(StatusCode, Json<Case>), ApiError> {
    let case = run_blocking(move || {
        Ok(state.db.create_case(&NewCase {
            user_id: req.user_id,
            case_details: &req.case_details,
            status: req.status.as_deref().unwrap_or(STATUS_PENDING),
            next_hearing_date: req.next_hearing_date,
        })?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(case)))
}
