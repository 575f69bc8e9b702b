use crate::error::{RemoteError, Result};
use crate::wire::{BatchUploadRequest, BatchUploadResponse, RetrievalRequest, RetrievalResponse};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use uplink_chunker::Blob;

/// Connection settings for the remote service.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_token: String,
    /// Per-request ceiling; one retry attempt may block for up to this long.
    pub request_timeout: Duration,
}

/// Single-attempt remote operations. Retry policy lives above this seam in
/// [`crate::BatchUploader`], so implementations make exactly one try per call.
#[async_trait]
pub trait RemoteBackend: Send + Sync {
    /// Store one batch of blobs. Returns the blob ids the backend reports
    /// as stored, which is the authoritative record of what was accepted.
    async fn store_blobs(&self, blobs: &[Blob]) -> Result<Vec<String>>;

    /// Run one semantic query against the given blob set.
    async fn retrieve(&self, information_request: &str, blob_ids: &[String]) -> Result<String>;
}

/// HTTP implementation speaking JSON with bearer-token authentication.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    async fn post_json<B, R>(&self, endpoint: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint_url(endpoint);
        log::debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RemoteError::from_status(status.as_u16(), message));
        }

        response.json::<R>().await.map_err(|err| {
            if err.is_decode() {
                RemoteError::InvalidResponse(err.to_string())
            } else {
                RemoteError::Network(err)
            }
        })
    }
}

#[async_trait]
impl RemoteBackend for HttpBackend {
    async fn store_blobs(&self, blobs: &[Blob]) -> Result<Vec<String>> {
        let request = BatchUploadRequest { blobs };
        let response: BatchUploadResponse = self.post_json("batch-upload", &request).await?;
        Ok(response.blob_names)
    }

    async fn retrieve(&self, information_request: &str, blob_ids: &[String]) -> Result<String> {
        let request = RetrievalRequest::new(information_request, blob_ids.to_vec());
        let response: RetrievalResponse =
            self.post_json("agents/codebase-retrieval", &request).await?;
        Ok(response.formatted_retrieval)
    }
}
