use rdf_relay_common::StoreError;
use rdf_relay_model::ModelError;
use std::io;

/// An error raised by a [`Connection`](crate::Connection) operation.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The arguments of the call do not make sense together, for example a range in a write.
    #[error("{0}")]
    InvalidArgument(String),
    /// The format of a file could not be determined.
    #[error("Failed to determine the RDF format of '{0}', use a .nt, .rdf or .owl file or pass a format explicitly")]
    UnsupportedFormat(String),
    /// The store service failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A term could not be normalized.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// A row returned by the store service is not a valid statement.
    #[error("Invalid statement returned by the store service ({row}): {error}")]
    Decode {
        /// The row, in N-Quads like syntax.
        row: String,
        #[source]
        error: ModelError,
    },
}

impl RepositoryError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

impl From<RepositoryError> for io::Error {
    #[inline]
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::Store(error) => error.into(),
            RepositoryError::InvalidArgument(_) | RepositoryError::UnsupportedFormat(_) => {
                Self::new(io::ErrorKind::InvalidInput, error)
            }
            RepositoryError::Model(_) | RepositoryError::Decode { .. } => {
                Self::new(io::ErrorKind::InvalidData, error)
            }
        }
    }
}

/// An error raised while exporting statements to an [`RdfHandler`](crate::RdfHandler).
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The handler failed.
    #[error(transparent)]
    Handler(#[from] io::Error),
    /// Reading the statements failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<StoreError> for ExportError {
    #[inline]
    fn from(error: StoreError) -> Self {
        Self::Repository(error.into())
    }
}

impl From<ExportError> for io::Error {
    #[inline]
    fn from(error: ExportError) -> Self {
        match error {
            ExportError::Handler(error) => error,
            ExportError::Repository(error) => error.into(),
        }
    }
}
