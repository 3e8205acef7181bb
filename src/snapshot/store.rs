//! Guarded reads from the snapshot storage area.
//!
//! Every path built here is validated segment by segment before the
//! filesystem is touched.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{RagError, Result};
use crate::models::{SnapshotFile, SnapshotFileMetadata, SnapshotMetadata, TreeNode, TreeNodeKind};
use crate::snapshot::{branch_dir, join_within, METADATA_FILE};

/// Entries hidden from snapshot tree listings.
const TREE_HIDDEN: &[&str] = &[".git", "node_modules", "dist", ".next", ".DS_Store"];

/// Read `{project}/{branch}/metadata.json`. Missing or unparseable metadata
/// yields `None`; only an unsafe project/branch name is an error.
pub async fn read_snapshot_metadata(
    snapshots_root: &Path,
    project: &str,
    branch: &str,
) -> Result<Option<SnapshotMetadata>> {
    let path = join_within(&branch_dir(snapshots_root, project, branch)?, [METADATA_FILE])?;

    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(_) => return Ok(None),
    };

    match serde_json::from_str::<SnapshotMetadata>(&raw) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) => {
            tracing::warn!("Ignoring malformed snapshot metadata for {project}/{branch}: {e}");
            Ok(None)
        }
    }
}

/// Read one file out of `{project}/{branch}/{commit}/{segments...}`.
///
/// Returns `Ok(None)` when the file does not exist or is not a regular file.
pub async fn get_snapshot_file(
    snapshots_root: &Path,
    project: &str,
    branch: &str,
    commit: &str,
    segments: &[&str],
) -> Result<Option<SnapshotFile>> {
    if segments.is_empty() {
        return Err(RagError::validation("File path is required"));
    }

    let full_path = join_within(
        &branch_dir(snapshots_root, project, branch)?,
        std::iter::once(commit).chain(segments.iter().copied()),
    )?;

    let meta = match tokio::fs::metadata(&full_path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if !meta.is_file() {
        return Ok(None);
    }

    let bytes = tokio::fs::read(&full_path).await?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    let indexed_at = meta
        .modified()
        .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
        .unwrap_or_default();

    Ok(Some(SnapshotFile {
        content,
        metadata: SnapshotFileMetadata {
            project: project.to_string(),
            branch: branch.to_string(),
            commit: commit.to_string(),
            indexed_at,
            size: meta.len(),
            path: segments.join("/"),
        },
    }))
}

/// List a snapshot as a nested tree: directories before files, each group
/// in name order. A missing snapshot yields an empty tree.
pub async fn get_snapshot_tree(
    snapshots_root: &Path,
    project: &str,
    branch: &str,
    commit: &str,
) -> Result<Vec<TreeNode>> {
    let dir = join_within(&branch_dir(snapshots_root, project, branch)?, [commit])?;

    tokio::task::spawn_blocking(move || build_tree(&dir))
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
}

fn build_tree(dir: &Path) -> Result<Vec<TreeNode>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    // `stack[d]` holds the nodes collected so far at depth `d + 1`.
    let mut stack: Vec<Vec<TreeNode>> = vec![Vec::new()];

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .contents_first(true)
        .sort_by(|a, b| {
            match (a.file_type().is_dir(), b.file_type().is_dir()) {
                (true, false) => Ordering::Less,
                (false, true) => Ordering::Greater,
                _ => compare_names(a.file_name(), b.file_name()),
            }
        })
        .into_iter()
        .filter_entry(|e| !TREE_HIDDEN.contains(&e.file_name().to_string_lossy().as_ref()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            e.into_io_error()
                .unwrap_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "walk loop"))
        })?;
        let depth = entry.depth();
        while stack.len() < depth {
            stack.push(Vec::new());
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .unwrap_or(entry.path())
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let name = entry.file_name().to_string_lossy().to_string();

        let node = if entry.file_type().is_dir() {
            // Contents come first, so this directory's children are complete.
            let children = if stack.len() > depth {
                stack.pop().unwrap_or_default()
            } else {
                Vec::new()
            };
            TreeNode {
                name,
                kind: TreeNodeKind::Directory,
                path: relative,
                children: Some(children),
            }
        } else {
            TreeNode {
                name,
                kind: TreeNodeKind::File,
                path: relative,
                children: None,
            }
        };
        stack[depth - 1].push(node);
    }

    Ok(stack.into_iter().next().unwrap_or_default())
}

/// Case-insensitive name order, falling back to byte order on ties.
fn compare_names(a: &OsStr, b: &OsStr) -> Ordering {
    let (a, b) = (a.to_string_lossy(), b.to_string_lossy());
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(&b))
}
