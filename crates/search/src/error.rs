use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors surfaced by a search query.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The pre-query indexing pass failed outright.
    #[error("Indexing failed: {0}")]
    Index(#[from] uplink_indexer::IndexerError),

    /// The retrieval call itself failed.
    #[error("Retrieval failed: {0}")]
    Backend(#[from] uplink_backend::RemoteError),
}
