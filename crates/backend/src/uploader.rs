use crate::client::RemoteBackend;
use crate::error::RemoteError;
use crate::retry::{with_retry, RetryPolicy};
use std::sync::Arc;
use uplink_chunker::Blob;

/// Outcome of one multi-batch upload. `failed_batches` holds 1-based batch
/// numbers that exhausted their retries; their blobs must not be recorded
/// as present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOutcome {
    pub uploaded_ids: Vec<String>,
    pub failed_batches: Vec<usize>,
}

impl UploadOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed_batches.is_empty()
    }
}

/// Uploads blobs to the remote store in bounded batches, sequentially.
///
/// Each batch is retried independently under the configured policy. A batch
/// that ultimately fails is recorded by number and processing moves on, so
/// one bad batch never blocks the rest of the upload.
pub struct BatchUploader {
    backend: Arc<dyn RemoteBackend>,
    batch_size: usize,
    retry: RetryPolicy,
}

impl BatchUploader {
    pub fn new(backend: Arc<dyn RemoteBackend>, batch_size: usize, retry: RetryPolicy) -> Self {
        Self {
            backend,
            batch_size,
            retry,
        }
    }

    /// Upload `blobs` in consecutive batches of at most `batch_size`.
    ///
    /// `uploaded_ids` accumulates the ids each successful batch's response
    /// echoed back, not the ids that were requested; the backend decides
    /// what counts as stored.
    pub async fn upload(&self, blobs: &[Blob]) -> UploadOutcome {
        let batch_size = self.batch_size.max(1);
        let total_batches = blobs.len().div_ceil(batch_size);
        let mut outcome = UploadOutcome::default();

        for (index, batch) in blobs.chunks(batch_size).enumerate() {
            let batch_number = index + 1;
            log::debug!(
                "Uploading batch {batch_number}/{total_batches} ({} blobs)",
                batch.len()
            );

            let result = with_retry(&self.retry, RemoteError::is_retryable, || {
                self.backend.store_blobs(batch)
            })
            .await;

            match result {
                Ok(blob_names) => {
                    outcome.uploaded_ids.extend(blob_names);
                }
                Err(err) => {
                    log::warn!("Batch {batch_number}/{total_batches} failed: {err}");
                    outcome.failed_batches.push(batch_number);
                }
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Echoes every blob's id back; fails any batch containing a blob whose
    /// path carries the given marker.
    struct ScriptedBackend {
        fail_marker: Option<&'static str>,
        fail_with: fn() -> RemoteError,
        calls: AtomicU32,
        batch_sizes: Mutex<Vec<usize>>,
    }

    impl ScriptedBackend {
        fn accepting() -> Self {
            Self {
                fail_marker: None,
                fail_with: || RemoteError::from_status(500, "unused".into()),
                calls: AtomicU32::new(0),
                batch_sizes: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(marker: &'static str, fail_with: fn() -> RemoteError) -> Self {
            Self {
                fail_marker: Some(marker),
                fail_with,
                calls: AtomicU32::new(0),
                batch_sizes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RemoteBackend for ScriptedBackend {
        async fn store_blobs(&self, blobs: &[Blob]) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.batch_sizes.lock().unwrap().push(blobs.len());

            if let Some(marker) = self.fail_marker {
                if blobs.iter().any(|b| b.path.contains(marker)) {
                    return Err((self.fail_with)());
                }
            }
            Ok(blobs.iter().map(Blob::id).collect())
        }

        async fn retrieve(&self, _request: &str, _blob_ids: &[String]) -> Result<String> {
            unreachable!("uploader never queries");
        }
    }

    fn blobs(count: usize) -> Vec<Blob> {
        (1..=count)
            .map(|i| Blob::new(format!("file{i}.rs"), format!("content {i}\n")))
            .collect()
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_all_batches_succeed() {
        let backend = Arc::new(ScriptedBackend::accepting());
        let uploader = BatchUploader::new(backend.clone(), 2, fast_retry());

        let input = blobs(5);
        let outcome = uploader.upload(&input).await;

        assert!(outcome.is_complete());
        assert_eq!(outcome.failed_batches, Vec::<usize>::new());
        assert_eq!(
            outcome.uploaded_ids,
            input.iter().map(Blob::id).collect::<Vec<_>>()
        );
        assert_eq!(*backend.batch_sizes.lock().unwrap(), vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_empty_input_uploads_nothing() {
        let backend = Arc::new(ScriptedBackend::accepting());
        let uploader = BatchUploader::new(backend.clone(), 4, fast_retry());

        let outcome = uploader.upload(&[]).await;

        assert_eq!(outcome, UploadOutcome::default());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_batch_does_not_abort_siblings() {
        // file3/file4 land in batch 2 of [2, 2, 1]; that batch always 400s.
        let backend = Arc::new(ScriptedBackend::failing_on("file3", || {
            RemoteError::from_status(400, "rejected".into())
        }));
        let uploader = BatchUploader::new(backend.clone(), 2, fast_retry());

        let input = blobs(5);
        let outcome = uploader.upload(&input).await;

        assert_eq!(outcome.failed_batches, vec![2]);
        let expected: Vec<String> = [&input[0], &input[1], &input[4]]
            .iter()
            .map(|b| b.id())
            .collect();
        assert_eq!(outcome.uploaded_ids, expected);
        // Non-retryable failure burns exactly one attempt for batch 2.
        assert_eq!(backend.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retryable_batch_failure_exhausts_attempts() {
        let backend = Arc::new(ScriptedBackend::failing_on("file1", || {
            RemoteError::from_status(503, "unavailable".into())
        }));
        let uploader = BatchUploader::new(backend.clone(), 2, fast_retry());

        let input = blobs(3);
        let outcome = uploader.upload(&input).await;

        assert_eq!(outcome.failed_batches, vec![1]);
        assert_eq!(outcome.uploaded_ids, vec![input[2].id()]);
        // Batch 1 tried three times, batch 2 once.
        assert_eq!(backend.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_batch_size_floor_is_one() {
        let backend = Arc::new(ScriptedBackend::accepting());
        let uploader = BatchUploader::new(backend.clone(), 0, fast_retry());

        let outcome = uploader.upload(&blobs(2)).await;

        assert!(outcome.is_complete());
        assert_eq!(*backend.batch_sizes.lock().unwrap(), vec![1, 1]);
    }
}
