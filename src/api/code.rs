use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::{error_body, ApiError};
use crate::models::{SnapshotFile, SnapshotMetadata};
use crate::snapshot::store::{get_snapshot_file, get_snapshot_tree, read_snapshot_metadata};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CodeQuery {
    pub project: Option<String>,
    pub branch: Option<String>,
    pub commit: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    pub project: Option<String>,
    pub branch: Option<String>,
    pub commit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetadataQuery {
    pub project: Option<String>,
    pub branch: Option<String>,
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// GET /api/code?project&branch&commit&path - One file from a snapshot
pub async fn get_code(
    State(state): State<AppState>,
    Query(q): Query<CodeQuery>,
) -> Result<Json<SnapshotFile>, ApiError> {
    let (Some(project), Some(branch), Some(commit), Some(path)) = (
        required(&q.project),
        required(&q.branch),
        required(&q.commit),
        required(&q.path),
    ) else {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Missing required parameters: project, branch, commit, path",
        ));
    };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match get_snapshot_file(&state.config.snapshots_root, project, branch, commit, &segments)
        .await?
    {
        Some(file) => Ok(Json(file)),
        None => Err(error_body(StatusCode::NOT_FOUND, "File not found")),
    }
}

/// GET /api/snapshots/tree?project&branch&commit - Snapshot directory tree
pub async fn get_tree(
    State(state): State<AppState>,
    Query(q): Query<TreeQuery>,
) -> Result<Json<Value>, ApiError> {
    let (Some(project), Some(branch), Some(commit)) = (
        required(&q.project),
        required(&q.branch),
        required(&q.commit),
    ) else {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Missing required parameters: project, branch, commit",
        ));
    };

    let tree = get_snapshot_tree(&state.config.snapshots_root, project, branch, commit).await?;
    Ok(Json(json!({ "tree": tree })))
}

/// GET /api/sync/metadata?project&branch - Snapshot sync metadata
pub async fn get_metadata(
    State(state): State<AppState>,
    Query(q): Query<MetadataQuery>,
) -> Result<Json<SnapshotMetadata>, ApiError> {
    let (Some(project), Some(branch)) = (required(&q.project), required(&q.branch)) else {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Missing required parameters: project, branch",
        ));
    };

    match read_snapshot_metadata(&state.config.snapshots_root, project, branch).await? {
        Some(metadata) => Ok(Json(metadata)),
        None => Err(error_body(StatusCode::NOT_FOUND, "Metadata not found")),
    }
}
