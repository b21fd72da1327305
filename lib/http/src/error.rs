use std::error::Error;

/// An error raised while building an [`HttpStoreService`](crate::HttpStoreService).
#[derive(Debug, thiserror::Error)]
pub enum HttpConfigError {
    #[error("Invalid repository URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: Box<dyn Error + Send + Sync + 'static>,
    },
    #[error("The repository URL '{0}' cannot be a base URL")]
    CannotBeABase(String),
    /// The HTTP client could not be initialized, for example because no TLS backend is available.
    #[error("Unable to build the HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
