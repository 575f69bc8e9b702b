use thiserror::Error;

pub type Result<T> = std::result::Result<T, RemoteError>;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Client error ({status}): {message}")]
    Client { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Classify a non-success HTTP status. 5xx means the server had a
    /// transient problem; anything else is a request we should not repeat.
    #[must_use]
    pub fn from_status(status: u16, message: String) -> Self {
        if (500..600).contains(&status) {
            Self::Server { status, message }
        } else {
            Self::Client { status, message }
        }
    }

    /// Whether a retry could plausibly succeed. Connection failures,
    /// timeouts, and 5xx responses are retryable; 4xx responses and
    /// undecodable bodies are not.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Server { .. } => true,
            Self::Client { .. } | Self::InvalidResponse(_) => false,
        }
    }
}
