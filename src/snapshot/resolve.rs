use std::path::Path;

use crate::error::{RagError, Result};
use crate::models::{ProjectRegistration, ResolvedSource, SourceType};
use crate::snapshot::{branch_dir, is_dir, join_within, store, validate_segment, LATEST_DIR};

/// Pick the tree to scan for a (project, branch) request.
///
/// Resolution order, first existing directory wins:
/// 1. `{snapshots_root}/{project}/{branch}/latest`
/// 2. `{snapshots_root}/{project}/{branch}/{commitSha}` from `metadata.json`
/// 3. the registered repository path
///
/// Empty `project_id` / `branch` values count as absent.
pub async fn resolve_source(
    projects: &[ProjectRegistration],
    snapshots_root: &Path,
    project_id: Option<&str>,
    branch: Option<&str>,
) -> Result<ResolvedSource> {
    let selected = select_project(projects, project_id)?;

    let branch = branch
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(selected.default_branch.as_str())
        .to_string();

    let project = validate_segment(&selected.project_id)?;
    let branch_root = branch_dir(snapshots_root, project, &branch)?;

    let latest_path = join_within(&branch_root, [LATEST_DIR])?;
    if is_dir(&latest_path).await {
        tracing::debug!("Resolved {project}/{branch} to latest snapshot");
        return Ok(ResolvedSource {
            project_id: selected.project_id.clone(),
            branch,
            root_path: latest_path,
            source_type: SourceType::SnapshotLatest,
            commit: Some(LATEST_DIR.to_string()),
            repo_path: selected.repo_path.clone(),
            snapshot_metadata: None,
        });
    }

    if let Some(metadata) = store::read_snapshot_metadata(snapshots_root, project, &branch).await? {
        if let Some(commit) = metadata.commit_sha.clone().filter(|c| !c.is_empty()) {
            let commit_path = join_within(&branch_root, [commit.as_str()])?;
            if is_dir(&commit_path).await {
                tracing::debug!("Resolved {project}/{branch} to pinned snapshot {commit}");
                return Ok(ResolvedSource {
                    project_id: selected.project_id.clone(),
                    branch,
                    root_path: commit_path,
                    source_type: SourceType::SnapshotCommit,
                    commit: Some(commit),
                    repo_path: selected.repo_path.clone(),
                    snapshot_metadata: Some(metadata),
                });
            }
        }
    }

    if is_dir(&selected.repo_path).await {
        tracing::debug!("Resolved {project}/{branch} to live repository path");
        return Ok(ResolvedSource {
            project_id: selected.project_id.clone(),
            branch,
            root_path: selected.repo_path.clone(),
            source_type: SourceType::RepoPath,
            commit: None,
            repo_path: selected.repo_path.clone(),
            snapshot_metadata: None,
        });
    }

    Err(RagError::SourceUnavailable {
        project_id: selected.project_id.clone(),
    })
}

fn select_project<'a>(
    projects: &'a [ProjectRegistration],
    project_id: Option<&str>,
) -> Result<&'a ProjectRegistration> {
    if projects.is_empty() {
        return Err(RagError::not_found(
            "No connected projects found in the project registry",
        ));
    }

    match project_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => projects
            .iter()
            .find(|p| p.project_id == id)
            .ok_or_else(|| RagError::not_found(format!("Project '{id}' is not connected"))),
        None => Ok(&projects[0]),
    }
}
