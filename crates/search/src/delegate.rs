use crate::error::Result;
use std::sync::Arc;
use uplink_backend::RemoteBackend;
use uplink_indexer::{ProjectIndexStore, ProjectIndexer};

/// Returned in place of an empty retrieval body.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Answers queries against an always-fresh index.
///
/// Every query re-runs the indexing pipeline first, then issues one
/// retrieval call carrying the project's full recorded blob set, not just
/// the delta the run uploaded. Failed upload batches do not block the
/// query; retrieval runs against whatever is recorded.
pub struct SearchDelegate {
    indexer: ProjectIndexer,
    store: Arc<dyn ProjectIndexStore>,
    backend: Arc<dyn RemoteBackend>,
}

impl SearchDelegate {
    pub fn new(
        indexer: ProjectIndexer,
        store: Arc<dyn ProjectIndexStore>,
        backend: Arc<dyn RemoteBackend>,
    ) -> Self {
        Self {
            indexer,
            store,
            backend,
        }
    }

    /// Index `project_root`, then ask the backend `text` over the recorded
    /// blob set.
    pub async fn query(&self, project_root: &str, text: &str) -> Result<String> {
        let report = self.indexer.index_project(project_root).await?;
        if !report.failed_batches.is_empty() {
            log::warn!(
                "{} upload batches failed; retrieval covers the recorded subset",
                report.failed_batches.len()
            );
        }

        let index = self.store.load().await?;
        let blob_ids: Vec<String> = index
            .get(&report.project)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        log::debug!("Querying over {} blobs", blob_ids.len());

        let formatted = self.backend.retrieve(text, &blob_ids).await?;
        if formatted.trim().is_empty() {
            Ok(NO_RESULTS_MESSAGE.to_string())
        } else {
            Ok(formatted)
        }
    }
}
