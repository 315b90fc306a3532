//! Structured error types for yarnview.
//!
//! The color path never surfaces these to the UI; they are logged and
//! degrade to a fallback color. The store and inventory paths return them.

/// All errors that can occur in yarnview lookups and storage.
#[derive(Debug, thiserror::Error)]
pub enum YarnviewError {
    /// Non-success HTTP status from the color lookup service.
    #[error("HTTP status {status}")]
    Http { status: u16 },

    /// The request itself failed (DNS, connection, CORS, aborted fetch).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Response body was not valid JSON.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Lookup base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Document store failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Rejected user input.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, YarnviewError>;

impl YarnviewError {
    /// Whether a lookup that failed with this error is worth retrying.
    ///
    /// Rate limiting and transport failures are transient; every other
    /// status is treated as permanent.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status } => *status == 429,
            Self::Transport(_) => true,
            _ => false,
        }
    }
}

impl From<String> for YarnviewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for YarnviewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<YarnviewError> for wasm_bindgen::JsValue {
    fn from(e: YarnviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(YarnviewError::Http { status: 429 }.is_transient());
        assert!(YarnviewError::Transport("reset".into()).is_transient());
        assert!(!YarnviewError::Http { status: 500 }.is_transient());
        assert!(!YarnviewError::Http { status: 404 }.is_transient());
        assert!(!YarnviewError::Store("gone".into()).is_transient());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            YarnviewError::Http { status: 503 }.to_string(),
            "HTTP status 503"
        );
        assert_eq!(YarnviewError::from("boom").to_string(), "boom");
    }
}
