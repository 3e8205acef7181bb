use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base directory for the registry file and snapshot storage
    pub data_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// Project registry file (a JSON array of connectors)
    pub registry_path: PathBuf,
    /// Root of the `{project}/{branch}/{latest|commit}` snapshot layout
    pub snapshots_root: PathBuf,
    /// Chunking and scan limits
    pub retrieval: RetrievalConfig,
    /// Lexical scoring weights
    pub weights: ScoringWeights,
    /// Completion endpoint configuration
    pub llm: LlmConfig,
}

/// Retrieval options applied to every scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Lines per chunk window.
    pub chunk_lines: usize,
    /// Lines shared between consecutive windows.
    pub chunk_overlap: usize,
    /// Character cap per chunk; longer windows are truncated.
    pub max_chars_per_chunk: usize,
    /// Hard cap on files collected per scan.
    pub max_files: usize,
    /// Evidence records selected per query when the caller does not say.
    pub max_chunks: usize,
    /// Files larger than this are skipped.
    pub max_file_bytes: u64,
    /// Files read in parallel during a scan.
    pub read_concurrency: usize,
    /// Return the top chunks even when no query term matched anything.
    pub zero_score_fallback: bool,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_lines: 80,
            chunk_overlap: 20,
            max_chars_per_chunk: 2400,
            max_files: 1200,
            max_chunks: 8,
            max_file_bytes: 256 * 1024,
            read_concurrency: 16,
            zero_score_fallback: true,
        }
    }
}

/// Weights for the lexical scorer. The defaults are empirical and have not
/// been calibrated against a relevance-judgment set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Term present anywhere in the chunk content.
    pub content_hit: f64,
    /// Added per occurrence, up to `frequency_cap` occurrences.
    pub frequency_step: f64,
    pub frequency_cap: usize,
    /// Term present in the relative file path.
    pub path_hit: f64,
    /// Term present in the file's basename (stacks with `path_hit`).
    pub basename_hit: f64,
    /// Whole normalized query found verbatim in the content.
    pub whole_query: f64,
    /// Path looks like documentation (readme, overview, architecture, guide).
    pub doc_bias: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            content_hit: 1.0,
            frequency_step: 0.2,
            frequency_cap: 6,
            path_hit: 1.5,
            basename_hit: 1.0,
            whole_query: 3.0,
            doc_bias: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the Responses API
    pub base_url: String,
    /// Model name sent with every completion request
    pub model: String,
    /// Bearer token
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4.1-mini".to_string(),
            api_key: None,
            timeout_secs: 60,
            temperature: 0.2,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = PathBuf::from(".");
        Self {
            registry_path: data_dir.join("connectors.json"),
            snapshots_root: data_dir.join("snapshots"),
            data_dir,
            bind_addr: "127.0.0.1:9000".to_string(),
            retrieval: RetrievalConfig::default(),
            weights: ScoringWeights::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Build the configuration from process environment variables.
    ///
    /// Call once at startup (after any `.env` files have been loaded) and
    /// pass the result down by reference.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("RAG_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
            config.registry_path = config.data_dir.join("connectors.json");
            config.snapshots_root = config.data_dir.join("snapshots");
        }
        if let Ok(addr) = std::env::var("RAG_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(path) = std::env::var("RAG_REGISTRY_PATH") {
            config.registry_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("RAG_SNAPSHOTS_ROOT") {
            config.snapshots_root = PathBuf::from(path);
        }

        // Retrieval limits
        if let Some(v) = parse_env("RAG_MAX_FILES") {
            config.retrieval.max_files = v;
        }
        if let Some(v) = parse_env("RAG_MAX_CHUNKS") {
            config.retrieval.max_chunks = v;
        }
        if let Some(v) = parse_env::<usize>("RAG_CHUNK_LINES") {
            config.retrieval.chunk_lines = v.max(1);
        }
        if let Some(v) = parse_env("RAG_CHUNK_OVERLAP") {
            config.retrieval.chunk_overlap = v;
        }
        if let Some(v) = parse_env("RAG_MAX_CHARS_PER_CHUNK") {
            config.retrieval.max_chars_per_chunk = v;
        }
        if let Some(v) = parse_env::<usize>("RAG_READ_CONCURRENCY") {
            config.retrieval.read_concurrency = v.max(1);
        }
        if let Some(v) = parse_env("RAG_ZERO_SCORE_FALLBACK") {
            config.retrieval.zero_score_fallback = v;
        }

        // Completion endpoint
        if let Ok(model) = std::env::var("CODEXLM_RAG_MODEL") {
            config.llm.model = model;
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            config.llm.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.llm.api_key = Some(key);
        }
        if let Some(v) = parse_env("LLM_TIMEOUT_SECS") {
            config.llm.timeout_secs = v;
        }

        config
    }
}

/// Read a non-empty environment variable and parse it, ignoring bad values.
fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .and_then(|v| v.trim().parse().ok())
}
