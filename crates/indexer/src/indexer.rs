use crate::error::{IndexerError, Result};
use crate::paths::normalize_project_path;
use crate::report::{IndexReport, IndexStatus};
use crate::scanner::{FileScanner, ScanOptions};
use crate::store::ProjectIndexStore;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;
use uplink_backend::{BatchUploader, UploadOutcome};
use uplink_chunker::{split_into_blobs, Blob, ChunkerConfig};

/// Tuning for one indexer instance.
#[derive(Debug, Clone, Default)]
pub struct IndexerConfig {
    pub chunker: ChunkerConfig,
    pub scan: ScanOptions,
}

/// Runs one indexing pass over a project: scan, chunk and hash, diff
/// against the recorded set, upload the delta in batches, persist.
///
/// Collaborators are injected at construction, so the whole pipeline runs
/// against in-memory fakes in tests.
pub struct ProjectIndexer {
    config: IndexerConfig,
    store: Arc<dyn ProjectIndexStore>,
    uploader: BatchUploader,
}

impl ProjectIndexer {
    pub fn new(
        config: IndexerConfig,
        store: Arc<dyn ProjectIndexStore>,
        uploader: BatchUploader,
    ) -> Self {
        Self {
            config,
            store,
            uploader,
        }
    }

    /// Index one project tree and record what the backend accepted.
    ///
    /// File-level problems (unreadable, undecodable) and failed upload
    /// batches are contained and reported; only a bad root, an empty scan,
    /// or a persistence failure abort the run.
    pub async fn index_project(&self, raw_root: &str) -> Result<IndexReport> {
        let started = Instant::now();
        let project = normalize_project_path(raw_root)?;
        log::info!("Indexing project {project}");

        // 1. Scan for candidate files.
        let scanner = FileScanner::new(raw_root.trim(), self.config.scan.clone());
        let files = tokio::task::spawn_blocking(move || scanner.scan())
            .await
            .map_err(|err| IndexerError::Other(format!("scan task failed: {err}")))??;
        if files.is_empty() {
            return Err(IndexerError::NoFilesFound(project));
        }
        log::debug!("Scanned {} files", files.len());

        // 2. Chunk and hash into upload candidates. Inserting by id makes
        //    duplicate ids collapse into a single candidate.
        let mut candidates: BTreeMap<String, Blob> = BTreeMap::new();
        for file in &files {
            for blob in split_into_blobs(&file.relative_path, &file.content, &self.config.chunker)
            {
                candidates.insert(blob.id(), blob);
            }
        }
        let total_blobs = candidates.len();

        // 3. Diff against the recorded blob set.
        let mut index = self.store.load().await?;
        let recorded = index.get(&project).cloned().unwrap_or_default();

        let mut already_present: BTreeSet<String> = BTreeSet::new();
        let mut new_blobs: Vec<Blob> = Vec::new();
        for (id, blob) in candidates {
            if recorded.contains(&id) {
                already_present.insert(id);
            } else {
                new_blobs.push(blob);
            }
        }
        log::info!(
            "{} of {total_blobs} blobs already present, {} to upload",
            already_present.len(),
            new_blobs.len()
        );

        // 4. Upload the delta in batches.
        let outcome = if new_blobs.is_empty() {
            UploadOutcome::default()
        } else {
            self.uploader.upload(&new_blobs).await
        };
        let UploadOutcome {
            uploaded_ids,
            failed_batches,
        } = outcome;

        // 5. Persist: present plus what the backend just accepted. Ids from
        //    failed batches stay out until a later run uploads them.
        let uploaded = uploaded_ids.len();
        let already = already_present.len();
        let mut next = already_present;
        next.extend(uploaded_ids);
        index.insert(project.clone(), next);
        self.store.save(&index).await?;

        let status = if failed_batches.is_empty() {
            IndexStatus::Success
        } else {
            IndexStatus::PartialSuccess
        };

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = started.elapsed().as_millis() as u64;

        let report = IndexReport {
            status,
            project,
            total_blobs,
            already_present: already,
            uploaded,
            failed_batches,
            duration_ms,
        };
        log::info!("Indexing completed: {report:?}");
        Ok(report)
    }
}
