//! # repo-rag
//!
//! Evidence-grounded question answering over snapshots of connected code
//! repositories. Retrieval is purely lexical and re-scans the resolved tree
//! on every query; there is no persistent index.
//!
//! ## Pipeline
//!
//! ```text
//!                     ┌──────────────┐
//!                     │   Question   │
//!                     └──────┬───────┘
//!                            │ normalize + tokenize (≤ 24 terms)
//!                            ▼
//!               ┌─────────────────────────┐
//!               │     Source Resolver     │
//!               │ latest → commit → repo  │
//!               └────────────┬────────────┘
//!                            │ root path
//!                            ▼
//!               ┌─────────────────────────┐
//!               │ BFS File Collector      │
//!               │ allow-list, ≤ max_files │
//!               └────────────┬────────────┘
//!                            │ files (read in parallel, order kept)
//!                            ▼
//!               ┌─────────────────────────┐
//!               │ Line-window Chunker     │
//!               │ 80 lines, 20 overlap    │
//!               └────────────┬────────────┘
//!                            │ chunks
//!                            ▼
//!               ┌─────────────────────────┐
//!               │ Lexical Scorer + Top-K  │
//!               └────────────┬────────────┘
//!                            │ E1..EK evidence
//!                            ▼
//!               ┌─────────────────────────┐
//!               │ Answer Orchestrator     │
//!               │ prompt → model → cites  │
//!               └─────────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration, loaded once at startup
//! - [`models`] - Shared data types: registrations, sources, evidence, results
//! - [`registry`] - The `connectors.json` project registry
//! - [`snapshot`] - Source resolution, file collection and guarded snapshot reads
//! - [`chunking`] - Overlapping line-window chunker
//! - [`search`] - Tokenizer, lexical scorer, ranker, evidence assembly
//! - [`llm`] - Completion client trait and the Responses API backend
//! - [`orchestrator`] - Prompt building, completion call, citation filtering
//! - [`api`] - Axum HTTP handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod chunking;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod orchestrator;
pub mod registry;
pub mod search;
pub mod snapshot;
pub mod state;
