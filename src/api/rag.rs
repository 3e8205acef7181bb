use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::api::{error_body, ApiError};
use crate::models::{AnswerResult, AskRequest, RetrievalResult, RetrieveRequest};
use crate::registry::list_connected_projects;
use crate::state::AppState;

/// GET /api/rag/projects - Connected projects from the registry
pub async fn list_projects(State(state): State<AppState>) -> Json<Value> {
    let projects = list_connected_projects(&state.config.registry_path).await;
    Json(json!({ "projects": projects }))
}

/// POST /api/rag/ask - Retrieve evidence and answer the question
pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AnswerResult>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Missing required field: question",
        ));
    }

    let result = state.orchestrator.answer_question(req).await?;
    Ok(Json(result))
}

/// POST /api/rag/retrieve - Ranked evidence only, no model call
pub async fn retrieve(
    State(state): State<AppState>,
    Json(req): Json<RetrieveRequest>,
) -> Result<Json<RetrievalResult>, ApiError> {
    if req.question.trim().is_empty() {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Missing required field: question",
        ));
    }

    let result = state.orchestrator.retrieve(&req).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::routing::{get, post};
    use axum::Router;
    use std::sync::Arc;

    use crate::api::code;
    use crate::config::Config;
    use crate::error::Result;
    use crate::llm::{CompletionClient, CompletionRequest};

    struct Echo;

    #[async_trait]
    impl CompletionClient for Echo {
        async fn complete(&self, request: &CompletionRequest) -> Result<String> {
            Ok(request.user_prompt.clone())
        }
    }

    fn state() -> AppState {
        AppState::with_client(Config::default(), Arc::new(Echo))
    }

    #[test]
    fn test_handlers_mount_on_router() {
        let _app: Router = Router::new()
            .route("/api/rag/projects", get(list_projects))
            .route("/api/rag/ask", post(ask))
            .route("/api/rag/retrieve", post(retrieve))
            .route("/api/code", get(code::get_code))
            .route("/api/snapshots/tree", get(code::get_tree))
            .route("/api/sync/metadata", get(code::get_metadata))
            .with_state(state());
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_question() {
        let req = AskRequest {
            question: "  ".into(),
            ..AskRequest::default()
        };
        let (status, body) = ask(State(state()), Json(req)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.0["error"], "Missing required field: question");
    }
}
