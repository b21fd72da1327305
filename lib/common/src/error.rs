use std::error::Error;
use std::io;

/// An error raised by a store service.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Error from the OS I/O layer, for example while reading a file to upload.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// The store answered with a non-success status.
    #[error("Server returned {status}: {message}")]
    Remote { status: u16, message: String },
    /// The store answered with something that does not follow the protocol.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl StoreError {
    /// Builds a [`StoreError::Remote`] from a status code and a response body.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Wraps any other error, typically the transport's.
    pub fn other(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Other(error.into())
    }
}

impl From<StoreError> for io::Error {
    #[inline]
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Io(error) => error,
            StoreError::Protocol(error) => error.into(),
            StoreError::Remote { .. } | StoreError::Other(_) => Self::other(error),
        }
    }
}

/// An error returned if the store service sent a malformed response.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ProtocolError(#[from] ProtocolErrorKind);

#[derive(Debug, thiserror::Error)]
enum ProtocolErrorKind {
    #[error("{0}")]
    Msg(String),
    #[error("{0}")]
    Other(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl ProtocolError {
    /// Builds an error from the underlying decoding error.
    #[inline]
    pub fn new(error: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self(ProtocolErrorKind::Other(error.into()))
    }

    /// Builds an error from a printable error message.
    #[inline]
    pub fn msg(msg: impl Into<String>) -> Self {
        Self(ProtocolErrorKind::Msg(msg.into()))
    }
}

impl From<ProtocolError> for io::Error {
    #[inline]
    fn from(error: ProtocolError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error)
    }
}
