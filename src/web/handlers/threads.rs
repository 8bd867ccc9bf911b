//! Thread handlers for the board API.

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use std::sync::Arc;

use crate::board::DeleteOutcome;
use crate::web::dto::{
    CreateThreadRequest, DeleteThreadRequest, ReportThreadRequest, ThreadView, ValidatedPayload,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::BoardError;

/// POST /api/threads/:board - Start a thread and go to the board page.
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<CreateThreadRequest>,
) -> Result<Redirect, ApiError> {
    state
        .service
        .create_thread(&board, &req.text, &req.delete_password)
        .await?;

    Ok(Redirect::to(&format!("/b/{}/", board)))
}

/// GET /api/threads/:board - The 10 most recently bumped threads.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
) -> Result<Json<Vec<ThreadView>>, ApiError> {
    let threads = state.service.list_threads(&board).await?;
    Ok(Json(threads.into_iter().map(ThreadView::summary).collect()))
}

/// PUT /api/threads/:board - Report a thread.
pub async fn report_thread(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<ReportThreadRequest>,
) -> Result<&'static str, ApiError> {
    match state.service.report_thread(&board, &req.thread_id).await {
        Ok(()) => Ok("success"),
        Err(BoardError::NotFound(_) | BoardError::Validation(_)) => {
            Err(ApiError::bad_request("Failed to report"))
        }
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/threads/:board - Delete a thread with its password.
///
/// A wrong password is not an error here: it answers 200 "incorrect password".
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<DeleteThreadRequest>,
) -> Result<&'static str, ApiError> {
    let outcome = state
        .service
        .delete_thread(&board, &req.thread_id, &req.delete_password)
        .await?;

    Ok(match outcome {
        DeleteOutcome::Deleted => "success",
        DeleteOutcome::IncorrectPassword => "incorrect password",
    })
}
