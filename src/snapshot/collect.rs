use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Directories never descended into (anything starting with `.` is skipped too).
const IGNORED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    ".next",
    "dist",
    "build",
    "coverage",
    ".turbo",
    ".cache",
];

/// Extensions treated as scannable text.
const TEXT_EXTENSIONS: &[&str] = &[
    "js", "cjs", "mjs", "jsx", "ts", "tsx", "py", "rb", "go", "rs", "java", "kt", "swift", "php",
    "html", "css", "scss", "sass", "less", "json", "jsonl", "yaml", "yml", "toml", "ini", "env",
    "md", "mdx", "txt", "rst", "sql", "graphql", "gql", "sh", "zsh", "bash", "ps1", "dockerfile",
    "makefile", "xml", "svg",
];

/// Collect scannable files under `root`, breadth-first, stopping at `max_files`.
///
/// Entries within a directory are visited in name order. Unreadable
/// directories are skipped.
pub async fn collect_files(root: &Path, max_files: usize) -> Vec<PathBuf> {
    let mut queue = VecDeque::from([root.to_path_buf()]);
    let mut files = Vec::new();

    while files.len() < max_files {
        let Some(current) = queue.pop_front() else {
            break;
        };

        let entries = match read_dir_sorted(&current).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Skipping unreadable directory {}: {e}", current.display());
                continue;
            }
        };

        for (path, file_type) in entries {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();

            if file_type.is_dir() {
                if !should_skip_dir(&name) {
                    queue.push_back(path);
                }
                continue;
            }

            if !file_type.is_file() || !should_include_file(&name) {
                continue;
            }

            files.push(path);
            if files.len() >= max_files {
                break;
            }
        }
    }

    files
}

async fn read_dir_sorted(dir: &Path) -> std::io::Result<Vec<(PathBuf, std::fs::FileType)>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        entries.extend(typed_entry(entry.path(), entry.file_type().await));
    }
    entries.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
    Ok(entries)
}

/// An entry whose type cannot be read is dropped on its own; its siblings
/// are still visited.
fn typed_entry(
    path: PathBuf,
    file_type: std::io::Result<std::fs::FileType>,
) -> Option<(PathBuf, std::fs::FileType)> {
    match file_type {
        Ok(file_type) => Some((path, file_type)),
        Err(e) => {
            tracing::debug!("Skipping entry {}: {e}", path.display());
            None
        }
    }
}

fn should_skip_dir(name: &str) -> bool {
    IGNORED_DIRS.contains(&name) || name.starts_with('.')
}

fn should_include_file(name: &str) -> bool {
    let base = name.to_lowercase();
    if base == "dockerfile" || base == "makefile" {
        return true;
    }

    // `.env` style names have no extension, same as `Path::extension`.
    match Path::new(&base).extension() {
        Some(ext) => TEXT_EXTENSIONS.contains(&ext.to_string_lossy().as_ref()),
        None => false,
    }
}
