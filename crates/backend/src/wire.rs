use serde::{Deserialize, Serialize};
use uplink_chunker::Blob;

/// Body of `POST {base_url}/batch-upload`.
#[derive(Debug, Serialize)]
pub struct BatchUploadRequest<'a> {
    pub blobs: &'a [Blob],
}

/// Response to a batch upload. `blob_names` is the authoritative list of
/// blob ids the backend actually stored for this batch.
#[derive(Debug, Deserialize)]
pub struct BatchUploadResponse {
    pub blob_names: Vec<String>,
}

/// The blob-set envelope inside a retrieval request. `checkpoint_id` is
/// always null and `deleted_blobs` always empty in this client; the full
/// current blob set travels in `added_blobs` on every call.
#[derive(Debug, Serialize)]
pub struct BlobsEnvelope {
    pub checkpoint_id: Option<String>,
    pub added_blobs: Vec<String>,
    pub deleted_blobs: Vec<String>,
}

/// Body of `POST {base_url}/agents/codebase-retrieval`.
#[derive(Debug, Serialize)]
pub struct RetrievalRequest {
    pub information_request: String,
    pub blobs: BlobsEnvelope,
    pub dialog: Vec<serde_json::Value>,
    pub max_output_length: u32,
    pub disable_codebase_retrieval: bool,
    pub enable_commit_retrieval: bool,
}

impl RetrievalRequest {
    #[must_use]
    pub fn new(information_request: impl Into<String>, added_blobs: Vec<String>) -> Self {
        Self {
            information_request: information_request.into(),
            blobs: BlobsEnvelope {
                checkpoint_id: None,
                added_blobs,
                deleted_blobs: Vec::new(),
            },
            dialog: Vec::new(),
            max_output_length: 0,
            disable_codebase_retrieval: false,
            enable_commit_retrieval: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RetrievalResponse {
    /// Empty or absent means the search succeeded but matched nothing.
    #[serde(default)]
    pub formatted_retrieval: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_batch_upload_request_shape() {
        let blobs = vec![Blob::new("src/a.rs", "fn a() {}\n")];
        let request = BatchUploadRequest { blobs: &blobs };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "blobs": [{ "path": "src/a.rs", "content": "fn a() {}\n" }]
            })
        );
    }

    #[test]
    fn test_retrieval_request_shape() {
        let request = RetrievalRequest::new("where is auth handled", vec!["abc".into()]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "information_request": "where is auth handled",
                "blobs": {
                    "checkpoint_id": null,
                    "added_blobs": ["abc"],
                    "deleted_blobs": []
                },
                "dialog": [],
                "max_output_length": 0,
                "disable_codebase_retrieval": false,
                "enable_commit_retrieval": false
            })
        );
    }

    #[test]
    fn test_batch_upload_response_parses() {
        let response: BatchUploadResponse =
            serde_json::from_str(r#"{ "blob_names": ["a", "b"] }"#).unwrap();
        assert_eq!(response.blob_names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_retrieval_response_tolerates_missing_field() {
        let response: RetrievalResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.formatted_retrieval, "");
    }
}
