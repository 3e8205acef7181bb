//! Project registry: the `connectors.json` file listing connected repositories.

use serde::Deserialize;
use std::path::Path;

use crate::models::ProjectRegistration;

const DEFAULT_BRANCH: &str = "main";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConnector {
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    repo_path: Option<String>,
    #[serde(default)]
    default_branch: Option<String>,
}

/// Read the registry. A missing or malformed file yields an empty list;
/// entries without a project id or repository path are dropped.
pub async fn list_connected_projects(registry_path: &Path) -> Vec<ProjectRegistration> {
    let raw = match tokio::fs::read_to_string(registry_path).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!("Registry {} not readable: {e}", registry_path.display());
            return Vec::new();
        }
    };

    parse_registry(&raw)
}

fn parse_registry(raw: &str) -> Vec<ProjectRegistration> {
    let entries = match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Ignoring malformed project registry: {e}");
            return Vec::new();
        }
    };

    entries
        .into_iter()
        .filter_map(|value| serde_json::from_value::<RawConnector>(value).ok())
        .filter_map(|c| {
            let project_id = c.project_id.filter(|id| !id.is_empty())?;
            let repo_path = c.repo_path.filter(|p| !p.is_empty())?;
            Some(ProjectRegistration {
                project_id,
                repo_path: repo_path.into(),
                default_branch: c
                    .default_branch
                    .filter(|b| !b.is_empty())
                    .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            })
        })
        .collect()
}
