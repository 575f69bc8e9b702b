use serde::{Deserialize, Serialize};

/// Outcome class of one indexing run. Fatal failures (bad root, nothing to
/// index, persistence) surface as errors instead of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexStatus {
    Success,
    PartialSuccess,
}

/// What one indexing run did. Transient; returned to the caller and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexReport {
    pub status: IndexStatus,
    /// Canonical project key the run was recorded under.
    pub project: String,
    pub total_blobs: usize,
    pub already_present: usize,
    pub uploaded: usize,
    /// 1-based numbers of batches that exhausted their retries.
    pub failed_batches: Vec<usize>,
    pub duration_ms: u64,
}

impl IndexReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.status, IndexStatus::Success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&IndexStatus::PartialSuccess).unwrap();
        assert_eq!(json, "\"partial_success\"");
    }

    #[test]
    fn test_is_success() {
        let report = IndexReport {
            status: IndexStatus::Success,
            project: "/p".to_string(),
            total_blobs: 1,
            already_present: 1,
            uploaded: 0,
            failed_batches: Vec::new(),
            duration_ms: 3,
        };
        assert!(report.is_success());
    }
}
