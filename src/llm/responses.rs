use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::error::{RagError, Result};
use crate::llm::{CompletionClient, CompletionRequest};

/// Client for an OpenAI-compatible Responses API (`POST /v1/responses`).
#[derive(Clone)]
pub struct ResponsesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl ResponsesClient {
    pub fn new(http: reqwest::Client, config: &LlmConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    async fn send(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("OPENAI_API_KEY is not set")?;
        let url = format!("{}/v1/responses", self.base_url);

        let req = ResponsesRequest {
            model: &request.model,
            input: vec![
                InputMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                InputMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
        };

        let resp = self
            .http
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(api_key)
            .json(&req)
            .send()
            .await
            .context("Failed to call Responses API")?;

        let status = resp.status();
        let body = resp.text().await.context("Failed to read Responses API body")?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.error)
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Responses API request failed".to_string());
            anyhow::bail!("Responses API returned {status}: {message}");
        }

        let parsed: ResponsesBody =
            serde_json::from_str(&body).context("Malformed Responses API payload")?;
        Ok(extract_output_text(&parsed))
    }
}

#[async_trait]
impl CompletionClient for ResponsesClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.send(request)
            .await
            .map_err(|e| RagError::Upstream(format!("{e:#}")))
    }
}

// ─── Wire types ──────────────────────────────────────────

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsesBody {
    #[serde(default)]
    output_text: Option<String>,
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Debug, Deserialize)]
struct OutputItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Pull the answer text out of a Responses payload.
///
/// A non-blank consolidated `output_text` wins; otherwise every
/// `output_text` fragment of every `message` item is joined with newlines.
fn extract_output_text(body: &ResponsesBody) -> String {
    if let Some(text) = body.output_text.as_deref() {
        if !text.trim().is_empty() {
            return text.trim().to_string();
        }
    }

    body.output
        .iter()
        .filter(|item| item.kind == "message")
        .flat_map(|item| &item.content)
        .filter(|c| c.kind == "output_text")
        .filter_map(|c| c.text.as_deref())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
