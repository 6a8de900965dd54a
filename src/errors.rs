use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrafficError {
    /// A timestamp that cannot be reduced to a `YYYY-MM-DDTHH` key.
    #[error("malformed record timestamp: {timestamp:?}")]
    MalformedRecord { timestamp: String },

    #[error("traffic request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The traffic API answered with a non-success status.
    #[error("traffic API returned {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl TrafficError {
    pub fn malformed(timestamp: impl Into<String>) -> Self {
        Self::MalformedRecord {
            timestamp: timestamp.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Errors that only spoil a single repository's block.
    pub fn is_repository_local(&self) -> bool {
        matches!(
            self,
            Self::MalformedRecord { .. } | Self::Http(_) | Self::Upstream { .. } | Self::Json(_)
        )
    }
}
