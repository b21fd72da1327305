#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

mod connection;
mod cursor;
pub mod error;
mod handler;
mod namespaces;
mod query;

pub use connection::{Addition, Connection, FileLoad, Removal, DEFAULT_PAGE_SIZE};
pub use cursor::StatementCursor;
pub use error::{ExportError, RepositoryError};
pub use handler::{RdfHandler, SerializerHandler};
pub use namespaces::NamespaceTable;
pub use query::{Dataset, Query, QueryKind, QueryLanguage, UnknownQueryLanguage};

pub mod io {
    pub use oxrdfio::{RdfFormat, RdfSerializer};
}

pub mod model {
    pub use rdf_relay_model::*;
}

pub mod service {
    pub use rdf_relay_common::*;
}
