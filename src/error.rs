// Typed errors with thiserror. Surface meaningful messages to JS.

use thiserror::Error;

/// Widget error types.
#[derive(Error, Debug)]
pub enum WidgetError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Unexpected response status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Page rendering failed: {0}")]
    Render(String),

    #[error("Unparseable timestamp: {0}")]
    Timestamp(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for WidgetError {
    fn from(err: serde_json::Error) -> Self {
        WidgetError::Serialization(err.to_string())
    }
}
