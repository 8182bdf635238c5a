//! Session control endpoints.
//!
//! Every mutating endpoint forwards a `SessionCommand` to the service
//! loop and awaits its reply, so the loop stays the single writer of
//! session state.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::error::SessionError;
use crate::session::{SessionPhase, SessionStatusHandle};
use crate::transform::StyleKind;

/// Commands the API sends to the service loop.
pub enum SessionCommand {
    Start {
        reply: oneshot::Sender<Result<SessionPhase, SessionError>>,
    },
    Pause {
        reply: oneshot::Sender<Result<SessionPhase, SessionError>>,
    },
    Resume {
        reply: oneshot::Sender<Result<SessionPhase, SessionError>>,
    },
    Stop {
        reply: oneshot::Sender<Result<SessionPhase, SessionError>>,
    },
    Transform {
        style: StyleKind,
        reply: oneshot::Sender<Result<String, SessionError>>,
    },
}

#[derive(Clone)]
pub struct SessionApiState {
    pub tx: mpsc::Sender<SessionCommand>,
    pub status: SessionStatusHandle,
}

/// Request body for the transform endpoint.
#[derive(Debug, Deserialize)]
pub struct TransformBody {
    pub style: StyleKind,
}

pub fn router(state: SessionApiState) -> Router {
    Router::new()
        .route("/start", post(start))
        .route("/pause", post(pause))
        .route("/resume", post(resume))
        .route("/stop", post(stop))
        .route("/transform", post(transform))
        .route("/status", get(status))
        .with_state(state)
}

async fn start(State(state): State<SessionApiState>) -> ApiResult<Json<Value>> {
    info!("Start command received via API");
    lifecycle(state, |reply| SessionCommand::Start { reply }).await
}

async fn pause(State(state): State<SessionApiState>) -> ApiResult<Json<Value>> {
    info!("Pause command received via API");
    lifecycle(state, |reply| SessionCommand::Pause { reply }).await
}

async fn resume(State(state): State<SessionApiState>) -> ApiResult<Json<Value>> {
    info!("Resume command received via API");
    lifecycle(state, |reply| SessionCommand::Resume { reply }).await
}

async fn stop(State(state): State<SessionApiState>) -> ApiResult<Json<Value>> {
    info!("Stop command received via API");
    lifecycle(state, |reply| SessionCommand::Stop { reply }).await
}

async fn lifecycle<F>(state: SessionApiState, command: F) -> ApiResult<Json<Value>>
where
    F: FnOnce(oneshot::Sender<Result<SessionPhase, SessionError>>) -> SessionCommand,
{
    let (reply_tx, reply_rx) = oneshot::channel();
    state
        .tx
        .send(command(reply_tx))
        .await
        .map_err(|_| ApiError::internal("Service loop is not running"))?;

    let phase = reply_rx
        .await
        .map_err(|_| ApiError::internal("Service loop dropped the reply"))??;

    Ok(Json(json!({
        "success": true,
        "phase": phase.as_str(),
    })))
}

/// Requests a transform and blocks until the pipeline resolves, returning
/// the rewritten text.
async fn transform(
    State(state): State<SessionApiState>,
    Json(body): Json<TransformBody>,
) -> ApiResult<Json<Value>> {
    info!("Transform command received via API: {} style", body.style);

    let (reply_tx, reply_rx) = oneshot::channel();
    state
        .tx
        .send(SessionCommand::Transform {
            style: body.style,
            reply: reply_tx,
        })
        .await
        .map_err(|_| ApiError::internal("Service loop is not running"))?;

    let result_text = reply_rx
        .await
        .map_err(|_| ApiError::internal("Service loop dropped the reply"))??;

    Ok(Json(json!({
        "success": true,
        "style": body.style.as_str(),
        "result_text": result_text,
    })))
}

async fn status(State(state): State<SessionApiState>) -> Json<Value> {
    let session = state.status.get().await;

    let last_transform = session.last_transform.as_ref().map(|t| {
        json!({
            "style": t.style.as_str(),
            "source_text": t.source_text,
            "result_text": t.result_text,
        })
    });

    Json(json!({
        "phase": session.phase.as_str(),
        "recording": session.phase == SessionPhase::Recording,
        "duration_seconds": session.duration_seconds(),
        "has_audio": session
            .capture
            .as_ref()
            .map(|c| c.has_audio())
            .unwrap_or(false),
        "transform_pending": session.transform_pending.map(|s| s.as_str()),
        "last_transform": last_transform,
        "last_error": session.last_error,
    }))
}
