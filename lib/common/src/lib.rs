pub mod error;
mod load;
mod store_service;
mod wire;

pub use error::{ProtocolError, StoreError};
pub use load::{LoadRequest, LoadSource, RdfFileFormat};
pub use store_service::StoreService;
pub use wire::{Page, StatementPattern, TriplePattern, WireQuad, WireTriple};

pub type StoreResult<T> = Result<T, StoreError>;
