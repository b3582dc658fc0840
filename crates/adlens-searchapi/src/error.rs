use thiserror::Error;

/// Errors returned by the SearchAPI client.
#[derive(Debug, Error)]
pub enum SearchApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// SearchAPI answered with a non-2xx status.
    #[error("SearchAPI error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid SearchAPI base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("SEARCHAPI_KEY not configured")]
    MissingApiKey,
}
