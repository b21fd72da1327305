use std::time::Duration;

/// How long a single request may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Holds the configuration of an [`HttpStoreService`](crate::HttpStoreService).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpStoreConfig {
    /// The URL of the repository, for example `http://localhost:8080/repositories/test`.
    pub repository_url: String,
    /// The timeout of each request.
    pub timeout: Duration,
    /// Credentials for HTTP basic authentication.
    pub credentials: Option<Credentials>,
}

impl HttpStoreConfig {
    pub fn new(repository_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            timeout: DEFAULT_TIMEOUT,
            credentials: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }
}

/// A user name and password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
