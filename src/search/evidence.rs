use crate::models::{CandidateChunk, EvidenceRecord, ResolvedSource};

/// Turn ranked chunks into citable evidence, `E1`.. in rank order.
///
/// A viewer link is only produced when the source carries a commit
/// (including the `latest` pseudo-commit); live repository paths get none.
pub fn build_evidence(selected: Vec<CandidateChunk>, source: &ResolvedSource) -> Vec<EvidenceRecord> {
    selected
        .into_iter()
        .enumerate()
        .map(|(index, chunk)| {
            let viewer_path = source.commit.as_deref().map(|commit| {
                format!(
                    "/viewer/{}/{}/{}/{}?lineStart={}&lineEnd={}",
                    source.project_id,
                    source.branch,
                    commit,
                    chunk.file_path,
                    chunk.start_line,
                    chunk.end_line
                )
            });

            EvidenceRecord {
                evidence_id: format!("E{}", index + 1),
                score: round3(chunk.score),
                file_path: chunk.file_path,
                start_line: chunk.start_line,
                end_line: chunk.end_line,
                content: chunk.content,
                viewer_path,
            }
        })
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceType;
    use std::path::PathBuf;

    fn source(commit: Option<&str>) -> ResolvedSource {
        ResolvedSource {
            project_id: "demo".into(),
            branch: "main".into(),
            root_path: PathBuf::from("/repos/demo"),
            source_type: if commit.is_some() {
                SourceType::SnapshotLatest
            } else {
                SourceType::RepoPath
            },
            commit: commit.map(str::to_string),
            repo_path: PathBuf::from("/repos/demo"),
            snapshot_metadata: None,
        }
    }

    fn chunks(n: usize) -> Vec<CandidateChunk> {
        (0..n)
            .map(|i| CandidateChunk {
                score: 1.23456 + i as f64,
                file_path: format!("src/f{i}.rs"),
                start_line: 1,
                end_line: 80,
                content: format!("body {i}"),
            })
            .collect()
    }

    #[test]
    fn test_evidence_ids_dense_and_ordered() {
        for k in 0..=8 {
            let evidence = build_evidence(chunks(k), &source(None));
            let ids: Vec<String> = evidence.iter().map(|e| e.evidence_id.clone()).collect();
            let expected: Vec<String> = (1..=k).map(|i| format!("E{i}")).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn test_evidence_rounds_score() {
        let evidence = build_evidence(chunks(1), &source(None));
        assert_eq!(evidence[0].score, 1.235);
    }

    #[test]
    fn test_viewer_path_with_commit() {
        let evidence = build_evidence(chunks(1), &source(Some("latest")));
        assert_eq!(
            evidence[0].viewer_path.as_deref(),
            Some("/viewer/demo/main/latest/src/f0.rs?lineStart=1&lineEnd=80")
        );
    }

    #[test]
    fn test_viewer_path_absent_for_live_repo() {
        let evidence = build_evidence(chunks(2), &source(None));
        assert!(evidence.iter().all(|e| e.viewer_path.is_none()));
    }
}
