//! Retrieval pipeline: resolve source, collect files, chunk, score, rank,
//! and build evidence. Every call re-scans the resolved tree.

pub mod evidence;
pub mod score;
pub mod tokenize;

use futures_util::stream::{self, StreamExt};
use std::path::Path;

use crate::chunking::{chunk_lines, ChunkParams};
use crate::config::{Config, ScoringWeights};
use crate::error::{RagError, Result};
use crate::models::{CandidateChunk, RetrievalResult, RetrievalStats, RetrieveRequest};
use crate::registry::list_connected_projects;
use crate::snapshot::collect::collect_files;
use crate::snapshot::resolve::resolve_source;
use evidence::build_evidence;
use score::{rank_chunks, score_chunk};
use tokenize::QueryTerms;

/// Bytes sampled when sniffing for binary content.
const BINARY_SNIFF_BYTES: usize = 1024;

/// Retrieve ranked evidence for a question without generating an answer.
pub async fn retrieve_code_context(
    config: &Config,
    req: &RetrieveRequest,
) -> Result<RetrievalResult> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(RagError::validation("Question is required for retrieval"));
    }

    let retrieval = &config.retrieval;
    let max_chunks = req.max_chunks.unwrap_or(retrieval.max_chunks);
    let max_files = req.max_files.unwrap_or(retrieval.max_files);

    let projects = list_connected_projects(&config.registry_path).await;
    let source = resolve_source(
        &projects,
        &config.snapshots_root,
        req.project_id.as_deref(),
        req.branch.as_deref(),
    )
    .await?;

    let files = collect_files(&source.root_path, max_files).await;
    let query = QueryTerms::parse(question);
    tracing::info!(
        "Scanning {} files in {}/{} ({:?}) for terms {:?}",
        files.len(),
        source.project_id,
        source.branch,
        source.source_type,
        query.terms
    );

    let params = ChunkParams {
        chunk_size: retrieval.chunk_lines,
        overlap: retrieval.chunk_overlap,
        max_chars: retrieval.max_chars_per_chunk,
    };
    let scan = FileScan {
        root: &source.root_path,
        query: &query,
        weights: &config.weights,
        params,
        max_file_bytes: retrieval.max_file_bytes,
    };

    // `buffered` yields in input order, so ranking stays deterministic.
    let per_file: Vec<Vec<CandidateChunk>> = stream::iter(files.iter().cloned())
        .map(|path| {
            let scan = &scan;
            async move { scan.scan_file(&path).await }
        })
        .buffered(retrieval.read_concurrency.max(1))
        .collect()
        .await;
    let candidates: Vec<CandidateChunk> = per_file.into_iter().flatten().collect();
    let chunks_ranked = candidates.len();

    let selected = rank_chunks(candidates, max_chunks, retrieval.zero_score_fallback);
    let evidence = build_evidence(selected, &source);

    let stats = RetrievalStats {
        files_scanned: files.len(),
        chunks_ranked,
        chunks_selected: evidence.len(),
    };
    tracing::info!(
        "Retrieved {} of {} chunks from {} files",
        stats.chunks_selected,
        stats.chunks_ranked,
        stats.files_scanned
    );

    Ok(RetrievalResult {
        source,
        stats,
        evidence,
    })
}

/// Per-query settings shared by every file read.
struct FileScan<'a> {
    root: &'a Path,
    query: &'a QueryTerms,
    weights: &'a ScoringWeights,
    params: ChunkParams,
    max_file_bytes: u64,
}

impl FileScan<'_> {
    /// Read, chunk and score one file. Oversized, binary, blank and
    /// unreadable files produce no chunks.
    async fn scan_file(&self, path: &Path) -> Vec<CandidateChunk> {
        let text = match self.read_text(path).await {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::debug!("Skipping unreadable file {}: {e}", path.display());
                return Vec::new();
            }
        };

        let relative = relative_path(self.root, path);
        let lines: Vec<&str> = text.split('\n').collect();

        chunk_lines(&lines, self.params)
            .into_iter()
            .map(|chunk| CandidateChunk {
                score: score_chunk(self.weights, self.query, &relative, &chunk.content),
                file_path: relative.clone(),
                start_line: chunk.start_line,
                end_line: chunk.end_line,
                content: chunk.content,
            })
            .collect()
    }

    async fn read_text(&self, path: &Path) -> std::io::Result<Option<String>> {
        let meta = tokio::fs::metadata(path).await?;
        if meta.len() > self.max_file_bytes {
            tracing::debug!("Skipping large file {} ({} bytes)", path.display(), meta.len());
            return Ok(None);
        }

        let bytes = tokio::fs::read(path).await?;
        if is_likely_binary(&bytes) {
            return Ok(None);
        }

        let text = String::from_utf8_lossy(&bytes).into_owned();
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(text))
    }
}

fn is_likely_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_SNIFF_BYTES).any(|&b| b == 0)
}

/// `path` relative to `root`, always `/`-separated.
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_likely_binary() {
        assert!(!is_likely_binary(b"plain text"));
        assert!(is_likely_binary(b"PNG\0\x01"));
        let mut late_nul = vec![b'a'; 2048];
        late_nul[1500] = 0;
        assert!(!is_likely_binary(&late_nul));
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/repos/demo");
        let file = root.join("src").join("auth").join("jwt.rs");
        assert_eq!(relative_path(root, &file), "src/auth/jwt.rs");
    }

    fn assert_send<T: Send>(_: T) {}

    #[test]
    fn test_retrieval_future_is_send() {
        let config = Config::default();
        let req = retrieve_request("where is auth");
        assert_send(retrieve_code_context(&config, &req));
    }

    fn retrieve_request(question: &str) -> RetrieveRequest {
        RetrieveRequest {
            question: question.into(),
            ..RetrieveRequest::default()
        }
    }

    #[tokio::test]
    async fn test_empty_question_is_validation_error() {
        let config = Config::default();
        let req = RetrieveRequest {
            question: "   ".into(),
            ..RetrieveRequest::default()
        };
        let err = retrieve_code_context(&config, &req).await.unwrap_err();
        assert!(matches!(err, RagError::Validation(_)));
    }
}
