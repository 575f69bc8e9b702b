//! # Uplink Indexer
//!
//! Incremental, content-addressed project indexing.
//!
//! ## Pipeline
//!
//! ```text
//! Project root
//!     │
//!     ├──> File Scanner (.gitignore aware, UTF-8 only)
//!     │      └─> Source files
//!     │
//!     ├──> Chunker + SHA-256 identity
//!     │      └─> Candidate blobs
//!     │
//!     ├──> Diff against the recorded blob set
//!     │      └─> Delta to upload
//!     │
//!     └──> Batch Uploader (bounded retry)
//!            └─> JSON store (atomic replace)
//! ```
//!
//! Blob ids are content hashes, so unchanged files cost nothing on a
//! re-run and renamed or edited files upload as new blobs while their
//! stale ids drop out of the recorded set.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use uplink_backend::{BackendConfig, BatchUploader, HttpBackend, RetryPolicy};
//! use uplink_indexer::{IndexerConfig, JsonFileStore, ProjectIndexer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = Arc::new(HttpBackend::new(&BackendConfig {
//!         base_url: "https://api.example.com".to_string(),
//!         api_token: "token".to_string(),
//!         request_timeout: Duration::from_secs(30),
//!     })?);
//!     let store = Arc::new(JsonFileStore::new("/tmp/uplink/index.json"));
//!     let uploader = BatchUploader::new(backend, 64, RetryPolicy::default());
//!
//!     let indexer = ProjectIndexer::new(IndexerConfig::default(), store, uploader);
//!     let report = indexer.index_project("/path/to/project").await?;
//!
//!     println!("Indexed {} blobs, {} uploaded", report.total_blobs, report.uploaded);
//!     Ok(())
//! }
//! ```

mod error;
mod ignore_rules;
mod indexer;
mod paths;
mod report;
mod scanner;
mod store;

pub use error::{IndexerError, Result};
pub use ignore_rules::{ExcludeMatcher, IgnoreSpec};
pub use indexer::{IndexerConfig, ProjectIndexer};
pub use paths::normalize_project_path;
pub use report::{IndexReport, IndexStatus};
pub use scanner::{FileScanner, ScanOptions, ScannedFile, DEFAULT_MAX_DEPTH};
pub use store::{JsonFileStore, ProjectIndex, ProjectIndexStore};
