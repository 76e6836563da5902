use thiserror::Error;

/// Errors returned by the distance-matrix client.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Network or TLS failure, or a non-2xx HTTP status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a top-level status other than `"OK"`
    /// (e.g. `REQUEST_DENIED`, `OVER_QUERY_LIMIT`, `MAX_ELEMENTS_EXCEEDED`).
    #[error(
        "distance matrix API returned {status}: {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    ApiStatus {
        status: String,
        message: Option<String>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
