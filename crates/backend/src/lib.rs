//! # Uplink Backend
//!
//! Client for the remote semantic-search service.
//!
//! Two endpoints matter to this crate: blob storage (`batch-upload`) and
//! retrieval (`agents/codebase-retrieval`). Uploads go through
//! [`BatchUploader`], which partitions blobs into bounded batches and retries
//! transient failures per batch; a batch that exhausts its retries is
//! recorded and never blocks the batches after it.

mod client;
mod error;
mod retry;
mod uploader;
mod wire;

pub use uplink_chunker::Blob;

pub use client::{BackendConfig, HttpBackend, RemoteBackend};
pub use error::{RemoteError, Result};
pub use retry::{with_retry, RetryPolicy};
pub use uploader::{BatchUploader, UploadOutcome};
pub use wire::{
    BatchUploadRequest, BatchUploadResponse, BlobsEnvelope, RetrievalRequest, RetrievalResponse,
};
