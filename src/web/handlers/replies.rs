//! Reply handlers for the board API.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use std::sync::Arc;

use crate::board::DeleteOutcome;
use crate::web::dto::{
    CreateReplyRequest, DeleteReplyRequest, ReportReplyRequest, ThreadQuery, ThreadView,
    ValidatedPayload,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::BoardError;

/// POST /api/replies/:board - Reply to a thread and go to the thread page.
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<CreateReplyRequest>,
) -> Result<Redirect, ApiError> {
    let thread_id = req.thread_id.trim();
    state
        .service
        .add_reply(&board, thread_id, &req.text, &req.delete_password)
        .await?;

    Ok(Redirect::to(&format!("/b/{}/{}/", board, thread_id)))
}

/// GET /api/replies/:board?thread_id= - A thread with every reply.
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    Query(query): Query<ThreadQuery>,
) -> Result<Json<ThreadView>, ApiError> {
    let thread_id = query
        .thread_id
        .ok_or_else(|| ApiError::bad_request("invalid id"))?;

    match state.service.get_thread(&board, &thread_id).await {
        Ok(thread) => Ok(Json(ThreadView::full(thread))),
        Err(BoardError::NotFound(_) | BoardError::Validation(_)) => {
            Err(ApiError::bad_request("invalid id"))
        }
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/replies/:board - Report a reply.
pub async fn report_reply(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<ReportReplyRequest>,
) -> Result<&'static str, ApiError> {
    state
        .service
        .report_reply(&board, &req.thread_id, &req.reply_id)
        .await?;
    Ok("success")
}

/// DELETE /api/replies/:board - Tombstone a reply with its password.
pub async fn delete_reply(
    State(state): State<Arc<AppState>>,
    Path(board): Path<String>,
    ValidatedPayload(req): ValidatedPayload<DeleteReplyRequest>,
) -> Result<&'static str, ApiError> {
    let outcome = state
        .service
        .delete_reply(&board, &req.thread_id, &req.reply_id, &req.delete_password)
        .await?;

    match outcome {
        DeleteOutcome::Deleted => Ok("success"),
        DeleteOutcome::IncorrectPassword => Err(ApiError::bad_request("incorrect password")),
    }
}
