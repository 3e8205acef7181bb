//! Snapshot storage: source resolution, file collection, and guarded reads.
//!
//! Layout under the snapshots root:
//!
//! ```text
//! {project}/{branch}/metadata.json      (a branch like `feature/x` nests)
//! {project}/{branch}/latest/...
//! {project}/{branch}/{commitSha}/...
//! ```

pub mod collect;
pub mod resolve;
pub mod store;

use std::path::{Component, Path, PathBuf};

use crate::error::{RagError, Result};

/// Directory holding the most recently synced working tree.
pub const LATEST_DIR: &str = "latest";

/// Per-branch metadata file written by the sync job.
pub const METADATA_FILE: &str = "metadata.json";

/// Check that a caller-supplied name is exactly one plain path segment.
///
/// Rejects empty names, `.`/`..`, separators and NUL bytes, so joining the
/// segment onto a root can never leave it.
pub fn validate_segment(segment: &str) -> Result<&str> {
    let plain = !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', '\0']);
    if plain {
        Ok(segment)
    } else {
        Err(RagError::PathSecurity)
    }
}

/// Join validated segments onto `root` and confirm the result is still a
/// descendant of `root`.
pub fn join_within<'a, I>(root: &Path, segments: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut path = root.to_path_buf();
    for segment in segments {
        path.push(validate_segment(segment)?);
    }
    ensure_within(root, &path)?;
    Ok(path)
}

/// `{root}/{project}/{branch...}`. Branch names may contain `/`
/// (`feature/login`); each component is validated on its own.
pub fn branch_dir(root: &Path, project: &str, branch: &str) -> Result<PathBuf> {
    join_within(root, std::iter::once(project).chain(branch.split('/')))
}

/// Lexically normalize `candidate` and require it to sit under `root`.
pub fn ensure_within(root: &Path, candidate: &Path) -> Result<()> {
    let root = lexical_normalize(root);
    let candidate = lexical_normalize(candidate);
    if candidate.starts_with(&root) {
        Ok(())
    } else {
        Err(RagError::PathSecurity)
    }
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// True when `path` exists and is a directory.
pub(crate) async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_segment_accepts_plain_names() {
        assert!(validate_segment("demo").is_ok());
        assert!(validate_segment("feature-x.1").is_ok());
        assert!(validate_segment("a02e71f6659b760eb1b2a25d82cc60a74d1b22b5").is_ok());
    }

    #[test]
    fn test_validate_segment_rejects_traversal() {
        for bad in ["", ".", "..", "a/b", "..\\x", "x\0y", "/etc"] {
            assert!(
                matches!(validate_segment(bad), Err(RagError::PathSecurity)),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_join_within_stays_under_root() {
        let root = Path::new("/data/snapshots");
        let joined = join_within(root, ["demo", "main", "latest"]).unwrap();
        assert_eq!(joined, PathBuf::from("/data/snapshots/demo/main/latest"));
        assert!(join_within(root, ["demo", "..", "..", "etc"]).is_err());
    }

    #[test]
    fn test_branch_dir_nests_slashed_branches() {
        let root = Path::new("/data/snapshots");
        assert_eq!(
            branch_dir(root, "demo", "feature/login").unwrap(),
            PathBuf::from("/data/snapshots/demo/feature/login")
        );
        assert_eq!(
            branch_dir(root, "demo", "main").unwrap(),
            PathBuf::from("/data/snapshots/demo/main")
        );
        for bad in ["..", "feature/../../x", "feature//x", "/main", "main/", ""] {
            assert!(
                matches!(branch_dir(root, "demo", bad), Err(RagError::PathSecurity)),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_ensure_within_normalizes_dots() {
        let root = Path::new("/data/snapshots");
        assert!(ensure_within(root, Path::new("/data/snapshots/./demo")).is_ok());
        assert!(ensure_within(root, Path::new("/data/snapshots/demo/../../secret")).is_err());
        assert!(ensure_within(root, Path::new("/data/snapshots-evil/demo")).is_err());
    }
}
