use axum::http::StatusCode;
use thiserror::Error;

/// Failures talking to Solr or interpreting what it sent back.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Solr request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Solr returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed Solr response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Document {0} not found")]
    NotFound(String),

    #[error("Invalid document id: {0}")]
    InvalidId(String),
}

impl SearchError {
    /// Status the web layer answers with for this failure.
    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::NotFound(_) => StatusCode::NOT_FOUND,
            SearchError::InvalidId(_) => StatusCode::BAD_REQUEST,
            SearchError::Transport(_) | SearchError::Status { .. } | SearchError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}
