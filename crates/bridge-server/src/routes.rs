use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{Json, Router, body::Bytes, extract::State, routing::post};
use bridge_engine::{Bridge, OpenRequest, Outcome, resolve_file_path};
use serde::Serialize;
use tokio::task;
use tracing::{error, info};

use crate::{error::ApiError, payload::OpenPayload};

/// Note returned by `/open-file`.
const OPEN_FILE_NOTE: &str = "File opened in Cursor";

/// Success body for `POST /open-file`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenFileResponse {
    status: &'static str,
    opened_workspace: Option<String>,
    opened_file: String,
    note: &'static str,
    warnings: Vec<String>,
}

/// Success body for `POST /open`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenResponse {
    status: &'static str,
    opened_workspace: Option<String>,
    opened_file: String,
    message_saved_to: Option<String>,
    auto_submitted: bool,
    note: &'static str,
    warnings: Vec<String>,
}

/// Build the router over a shared bridge.
pub fn router(bridge: Arc<Bridge>) -> Router {
    Router::new()
        .route("/open-file", post(open_file))
        .route("/open", post(open))
        .with_state(bridge)
}

async fn open_file(
    State(bridge): State<Arc<Bridge>>,
    body: Bytes,
) -> Result<Json<OpenFileResponse>, ApiError> {
    let payload = OpenPayload::parse(&body)?;
    payload.log("/open-file");
    let req = validate(&payload)?;
    let outcome = run_blocking(bridge, move |b| b.open_file(&req)).await?;

    info!("File opened: {}", outcome.opened_file.display());
    Ok(Json(OpenFileResponse {
        status: "ok",
        opened_workspace: payload.workspace_path,
        opened_file: path_string(&outcome.opened_file),
        note: OPEN_FILE_NOTE,
        warnings: outcome.warnings,
    }))
}

async fn open(
    State(bridge): State<Arc<Bridge>>,
    body: Bytes,
) -> Result<Json<OpenResponse>, ApiError> {
    let payload = OpenPayload::parse(&body)?;
    payload.log("/open");
    let req = validate(&payload)?;
    let auto_submit = req.auto_submit;
    let outcome = run_blocking(bridge, move |b| b.open_and_paste(&req)).await?;

    let note = if auto_submit {
        "Pasted and submitted"
    } else {
        "Pasted (press Enter to submit)"
    };
    info!("Request completed: {}", note);
    Ok(Json(OpenResponse {
        status: "ok",
        opened_workspace: payload.workspace_path,
        opened_file: path_string(&outcome.opened_file),
        message_saved_to: outcome.message_saved_to.as_deref().map(path_string),
        auto_submitted: auto_submit,
        note,
        warnings: outcome.warnings,
    }))
}

/// Require a file path that resolves to an existing file.
fn validate(payload: &OpenPayload) -> Result<OpenRequest, ApiError> {
    let Some(raw) = payload.file_path.as_deref() else {
        error!("Missing filePath");
        return Err(ApiError::MissingFilePath);
    };
    let file_path = resolve_file_path(raw).inspect_err(|e| error!("{}", e))?;
    Ok(OpenRequest {
        file_path,
        workspace_path: payload.workspace_path.as_ref().map(PathBuf::from),
        comment: payload.comment.clone(),
        code_snippet: payload.code_snippet.clone(),
        auto_submit: payload.auto_submit,
    })
}

/// Run a bridge flow on the blocking pool.
async fn run_blocking<F>(bridge: Arc<Bridge>, f: F) -> Result<Outcome, ApiError>
where
    F: FnOnce(&Bridge) -> bridge_engine::Result<Outcome> + Send + 'static,
{
    let joined = task::spawn_blocking(move || f(&bridge)).await;
    match joined {
        Ok(res) => res.map_err(|e| {
            error!("{}", e);
            ApiError::from(e)
        }),
        Err(e) => {
            error!("bridge worker failed: {}", e);
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

fn path_string(p: &Path) -> String {
    p.to_string_lossy().into_owned()
}
