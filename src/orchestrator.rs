//! Single-agent answer orchestration: retrieve evidence, prompt the model,
//! keep only the evidence the answer cites.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt::Write;
use std::sync::Arc;

use crate::config::Config;
use crate::error::{RagError, Result};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::models::{AnswerResult, AskRequest, EvidenceRecord, ResolvedSource, RetrievalResult, RetrieveRequest};
use crate::search::retrieve_code_context;

pub const NO_CONTEXT_ANSWER: &str =
    "I could not find relevant source context in the connected project.";
pub const NO_RESPONSE_ANSWER: &str = "I could not generate a response from the model.";

static CITATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(E\d+)\]").expect("valid citation regex"));

pub struct RagOrchestrator {
    config: Arc<Config>,
    client: Arc<dyn CompletionClient>,
}

impl RagOrchestrator {
    pub fn new(config: Arc<Config>, client: Arc<dyn CompletionClient>) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Raw retrieval, without calling the model.
    pub async fn retrieve(&self, req: &RetrieveRequest) -> Result<RetrievalResult> {
        retrieve_code_context(&self.config, req).await
    }

    /// Answer a question from retrieved evidence.
    ///
    /// Completion failures never fail the call; they become a canned answer.
    pub async fn answer_question(&self, req: AskRequest) -> Result<AnswerResult> {
        let question = req.question.trim().to_string();
        if question.is_empty() {
            return Err(RagError::validation("Missing required field: question"));
        }

        let retrieve = RetrieveRequest {
            question: question.clone(),
            max_chunks: Some(
                req.max_chunks
                    .filter(|&n| n > 0)
                    .unwrap_or(self.config.retrieval.max_chunks),
            ),
            ..RetrieveRequest::from(req)
        };
        let retrieval = self.retrieve(&retrieve).await?;

        if retrieval.evidence.is_empty() {
            tracing::info!("No evidence for question; skipping completion");
            return Ok(AnswerResult {
                answer: NO_CONTEXT_ANSWER.to_string(),
                citations: Vec::new(),
                source: retrieval.source,
                stats: retrieval.stats,
            });
        }

        let request = CompletionRequest {
            model: self.config.llm.model.clone(),
            system_prompt: build_system_prompt(),
            user_prompt: build_user_prompt(&question, &retrieval.source, &retrieval.evidence),
            temperature: self.config.llm.temperature,
        };

        let answer = match self.client.complete(&request).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("Completion returned no text");
                NO_RESPONSE_ANSWER.to_string()
            }
            Err(e) => {
                tracing::warn!("Completion failed: {e}");
                NO_RESPONSE_ANSWER.to_string()
            }
        };

        let citations = filter_citations(&answer, &retrieval.evidence);
        tracing::info!(
            "Answered with {} of {} evidence records cited",
            citations.len(),
            retrieval.evidence.len()
        );

        Ok(AnswerResult {
            answer,
            citations,
            source: retrieval.source,
            stats: retrieval.stats,
        })
    }
}

// ─── Prompt building ─────────────────────────────────────

fn build_system_prompt() -> String {
    [
        "You are a single-agent assistant for codebase Q&A.",
        "Use only the provided evidence context blocks.",
        "If the context is insufficient, explicitly say you are not sure and what is missing.",
        "Do not claim to have executed code or accessed files outside the provided context.",
        "For factual statements, add inline evidence citations like [E1] or [E2].",
        "Keep answers concise and implementation-focused.",
    ]
    .join(" ")
}

fn build_context_block(evidence: &[EvidenceRecord]) -> String {
    let mut ctx = String::new();
    for (i, entry) in evidence.iter().enumerate() {
        if i > 0 {
            ctx.push_str("\n\n");
        }
        // Writing to a String cannot fail.
        let _ = write!(
            ctx,
            "### {}\nfile: {}\nlines: {}-{}\n```\n{}\n```",
            entry.evidence_id, entry.file_path, entry.start_line, entry.end_line, entry.content
        );
    }
    ctx
}

fn build_user_prompt(question: &str, source: &ResolvedSource, evidence: &[EvidenceRecord]) -> String {
    let source_type = serde_json::to_value(source.source_type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    [
        format!("Question: {question}"),
        String::new(),
        "Context scope:".to_string(),
        format!("project: {}", source.project_id),
        format!("branch: {}", source.branch),
        format!("source_type: {source_type}"),
        format!("commit: {}", source.commit.as_deref().unwrap_or("unknown")),
        String::new(),
        "Evidence blocks:".to_string(),
        build_context_block(evidence),
        String::new(),
        "Respond with:".to_string(),
        "1) A direct answer.".to_string(),
        "2) A short confidence note if evidence is weak.".to_string(),
        "3) Keep all citations inline using [E#].".to_string(),
    ]
    .join("\n")
}

// ─── Citation filtering ──────────────────────────────────

/// Keep the evidence the answer cites as `[E#]`, in evidence order. An
/// answer with no extractable citation keeps everything.
fn filter_citations(answer: &str, evidence: &[EvidenceRecord]) -> Vec<EvidenceRecord> {
    let cited: HashSet<&str> = CITATION
        .captures_iter(answer)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    if cited.is_empty() {
        return evidence.to_vec();
    }

    evidence
        .iter()
        .filter(|e| cited.contains(e.evidence_id.as_str()))
        .cloned()
        .collect()
}
