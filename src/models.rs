use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A connected project from the registry file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRegistration {
    pub project_id: String,
    pub repo_path: PathBuf,
    pub default_branch: String,
}

/// Which on-disk tree a query was answered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Mutable `latest` snapshot, possibly with uncommitted changes
    SnapshotLatest,
    /// Snapshot pinned to the commit recorded in the branch metadata
    SnapshotCommit,
    /// The registered repository path itself
    RepoPath,
}

/// Per-branch `metadata.json` written by the snapshot sync job
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dirty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed_at: Option<String>,
    /// Anything else the sync job recorded, kept for provenance.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The concrete tree a query was run against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSource {
    pub project_id: String,
    pub branch: String,
    pub root_path: PathBuf,
    pub source_type: SourceType,
    pub commit: Option<String>,
    pub repo_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_metadata: Option<SnapshotMetadata>,
}

/// A scored line window, alive only for the duration of one query
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateChunk {
    pub score: f64,
    /// Relative to the source root, `/`-separated.
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub content: String,
}

/// A citable excerpt backing an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRecord {
    pub evidence_id: String,
    pub score: f64,
    pub file_path: String,
    pub start_line: usize,
    pub end_line: usize,
    pub content: String,
    pub viewer_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalStats {
    pub files_scanned: usize,
    pub chunks_ranked: usize,
    pub chunks_selected: usize,
}

/// Raw retrieval output, without a generated answer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResult {
    pub source: ResolvedSource,
    pub stats: RetrievalStats,
    pub evidence: Vec<EvidenceRecord>,
}

/// Final output of one question
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub answer: String,
    pub citations: Vec<EvidenceRecord>,
    pub source: ResolvedSource,
    pub stats: RetrievalStats,
}

/// Ask request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
    pub project_id: Option<String>,
    pub branch: Option<String>,
    pub max_chunks: Option<usize>,
}

/// Retrieve-only request
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveRequest {
    #[serde(default)]
    pub question: String,
    pub project_id: Option<String>,
    pub branch: Option<String>,
    pub max_chunks: Option<usize>,
    pub max_files: Option<usize>,
}

impl From<AskRequest> for RetrieveRequest {
    fn from(req: AskRequest) -> Self {
        Self {
            question: req.question,
            project_id: req.project_id,
            branch: req.branch,
            max_chunks: req.max_chunks,
            max_files: None,
        }
    }
}

/// A single file read out of a snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotFile {
    pub content: String,
    pub metadata: SnapshotFileMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotFileMetadata {
    pub project: String,
    pub branch: String,
    pub commit: String,
    /// File modification time, RFC 3339.
    pub indexed_at: String,
    pub size: u64,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNodeKind {
    Directory,
    File,
}

/// One entry of a snapshot directory listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TreeNodeKind,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeNode>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_serializes_to_snake_case() {
        let json = serde_json::to_value(SourceType::SnapshotLatest).unwrap();
        assert_eq!(json, "snapshot_latest");
        let json = serde_json::to_value(SourceType::RepoPath).unwrap();
        assert_eq!(json, "repo_path");
    }

    #[test]
    fn test_evidence_record_uses_camel_case() {
        let record = EvidenceRecord {
            evidence_id: "E1".into(),
            score: 1.5,
            file_path: "README.md".into(),
            start_line: 1,
            end_line: 3,
            content: "hello".into(),
            viewer_path: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["evidenceId"], "E1");
        assert_eq!(json["filePath"], "README.md");
        assert!(json["viewerPath"].is_null());
    }

    #[test]
    fn test_snapshot_metadata_keeps_unknown_fields() {
        let raw = r#"{"commitSha":"abc123","isDirty":true,"syncedBy":"cron"}"#;
        let meta: SnapshotMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(meta.commit_sha.as_deref(), Some("abc123"));
        assert_eq!(meta.is_dirty, Some(true));
        assert_eq!(meta.extra["syncedBy"], "cron");
    }

    #[test]
    fn test_ask_request_optional_fields() {
        let req: AskRequest = serde_json::from_str(r#"{"question":"hi","maxChunks":3}"#).unwrap();
        assert_eq!(req.question, "hi");
        assert_eq!(req.max_chunks, Some(3));
        assert!(req.project_id.is_none());
    }
}
