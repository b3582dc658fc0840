use thiserror::Error;

/// Errors returned by the Apify REST client.
#[derive(Debug, Error)]
pub enum ApifyError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Apify answered with a non-2xx status.
    #[error("Apify API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid Apify base URL '{0}'")]
    InvalidBaseUrl(String),
}
