use thiserror::Error;

/// Failures surfaced by the retrieval and answer pipeline.
///
/// Only `Validation`, `NotFound`, `SourceUnavailable` and `PathSecurity` are
/// meant to reach callers; upstream and per-file I/O failures are recovered
/// inside the pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Unable to resolve code source for project '{project_id}'")]
    SourceUnavailable { project_id: String },

    /// The rejected path is deliberately not part of the message.
    #[error("Invalid path")]
    PathSecurity,

    #[error("Completion request failed: {0}")]
    Upstream(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = RagError> = std::result::Result<T, E>;

impl RagError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for errors caused by the caller's request rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound(_) | Self::SourceUnavailable { .. } | Self::PathSecurity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_security_message_is_generic() {
        assert_eq!(RagError::PathSecurity.to_string(), "Invalid path");
    }

    #[test]
    fn test_source_unavailable_names_project() {
        let err = RagError::SourceUnavailable {
            project_id: "demo".into(),
        };
        assert!(err.to_string().contains("'demo'"));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(RagError::validation("empty").is_client_error());
        assert!(RagError::PathSecurity.is_client_error());
        assert!(!RagError::Upstream("boom".into()).is_client_error());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!RagError::from(io).is_client_error());
    }
}
