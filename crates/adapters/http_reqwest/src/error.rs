//! Errors raised while setting up the HTTP client.

/// The chunk fetcher could not be built.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The catalog base URL is malformed.
    #[error("invalid catalog url")]
    InvalidUrl(#[from] url::ParseError),

    /// The catalog base URL cannot carry a path (`mailto:`, `data:`…).
    #[error("catalog url `{0}` cannot be a base")]
    NotABase(String),

    /// The underlying HTTP client failed to initialize.
    #[error("http client error")]
    Client(#[from] reqwest::Error),
}
