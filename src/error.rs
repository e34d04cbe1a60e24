/// Errors raised while driving a generate or edit flow.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// A local precondition was not met; no request was sent.
    #[error("{0}")]
    Precondition(String),

    /// The submitted form values are not acceptable.
    #[error("{0}")]
    InvalidRequest(String),

    /// The flow already has a request in flight.
    #[error("{0} is already in progress")]
    Busy(&'static str),

    /// The image API answered with a non-success status.
    #[error("API error: {status}{}", detail_suffix(.detail))]
    Api { status: u16, detail: Option<String> },

    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode a base64 image payload.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// The task running a request panicked or was cancelled.
    #[error("request task failed: {0}")]
    Task(String),

    /// Invalid runtime configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error (e.g. binding the server socket).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Text shown next to the form that triggered the failure.
    ///
    /// Remote failures use the server-provided detail when there is one and
    /// `fallback` otherwise. Local failures carry their own wording.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => detail.clone(),
            Self::Api { .. } | Self::Network(_) | Self::Json(_) | Self::Decode(_) | Self::Task(_) => {
                fallback.to_string()
            }
            Self::Precondition(msg) | Self::InvalidRequest(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Returns true when the failure happened before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Precondition(_) | Self::InvalidRequest(_) | Self::Busy(_)
        )
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(" - {detail}"),
        None => String::new(),
    }
}

/// Result type alias for studio operations.
pub type Result<T> = std::result::Result<T, StudioError>;
