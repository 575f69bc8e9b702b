use crate::error::{IndexerError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Recorded membership: canonical project path to the blob ids believed to
/// be present in the remote backend. Ordered maps keep serialization stable
/// across runs.
pub type ProjectIndex = BTreeMap<String, BTreeSet<String>>;

/// Durable record of what each project already has remotely.
///
/// Single-writer assumption: implementations do not lock their backing
/// storage, so two concurrent indexing runs over the same store can race
/// and the last save wins. Callers needing stronger guarantees must
/// serialize access themselves.
#[async_trait]
pub trait ProjectIndexStore: Send + Sync {
    /// Load the full mapping. Missing or corrupt state loads as empty; a
    /// fresh install has no prior state and that is not an error.
    async fn load(&self) -> Result<ProjectIndex>;

    /// Replace the full mapping durably.
    async fn save(&self, index: &ProjectIndex) -> Result<()>;
}

/// JSON-file-backed store. Saves write a sibling temp file and rename it
/// into place, so a crash mid-write can never leave a truncated file where
/// the next load would find it.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist_error(&self, source: std::io::Error) -> IndexerError {
        IndexerError::Persist {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl ProjectIndexStore for JsonFileStore {
    async fn load(&self) -> Result<ProjectIndex> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No index state at {}; starting empty", self.path.display());
                return Ok(ProjectIndex::new());
            }
            Err(err) => {
                log::warn!(
                    "Failed to read {}: {err}; starting empty",
                    self.path.display()
                );
                return Ok(ProjectIndex::new());
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(index) => Ok(index),
            Err(err) => {
                log::warn!(
                    "Corrupt index state at {}: {err}; starting empty",
                    self.path.display()
                );
                Ok(ProjectIndex::new())
            }
        }
    }

    async fn save(&self, index: &ProjectIndex) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| self.persist_error(err))?;
        }

        let bytes = serde_json::to_vec_pretty(index)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|err| self.persist_error(err))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| self.persist_error(err))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_index() -> ProjectIndex {
        let mut index = ProjectIndex::new();
        index.insert(
            "/home/dev/app".to_string(),
            BTreeSet::from(["aaa".to_string(), "bbb".to_string()]),
        );
        index.insert(
            "c:/work/tool".to_string(),
            BTreeSet::from(["ccc".to_string()]),
        );
        index
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("index.json"));

        let index = store.load().await.unwrap();
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("index.json"));

        let index = sample_index();
        store.save(&index).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, index);
    }

    #[tokio::test]
    async fn test_load_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let store = JsonFileStore::new(&path);
        let index = store.load().await.unwrap();

        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/state/index.json");

        let store = JsonFileStore::new(&path);
        store.save(&sample_index()).await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");

        let store = JsonFileStore::new(&path);
        store.save(&sample_index()).await.unwrap();

        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_replaces_previous_state() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("index.json"));

        store.save(&sample_index()).await.unwrap();

        let mut next = ProjectIndex::new();
        next.insert(
            "/home/dev/app".to_string(),
            BTreeSet::from(["zzz".to_string()]),
        );
        store.save(&next).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, next);
    }

    #[tokio::test]
    async fn test_persisted_shape_is_path_to_id_list() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.json");

        let store = JsonFileStore::new(&path);
        store.save(&sample_index()).await.unwrap();

        let raw = tokio::fs::read_to_string(&path).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "/home/dev/app": ["aaa", "bbb"],
                "c:/work/tool": ["ccc"]
            })
        );
    }
}
