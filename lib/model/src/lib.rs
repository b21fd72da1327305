mod context;
mod error;
pub mod normalize;
mod statement;
mod term;
mod value_factory;
pub mod vocab;
mod xsd;

pub use context::*;
pub use error::*;
pub use normalize::WireObject;
pub use statement::*;
pub use term::*;
pub use value_factory::*;
pub use xsd::*;

// Re-export some oxrdf types.
pub use oxiri::{Iri, IriParseError};
pub use oxrdf::{
    BlankNode, BlankNodeRef, GraphName, GraphNameRef, Literal, LiteralRef, NamedNode, NamedNodeRef,
    NamedOrBlankNode, NamedOrBlankNodeRef, Quad, QuadRef, Subject, SubjectRef, Term, TermParseError,
    TermRef, Triple, TripleRef,
};
pub use oxsdatatypes::{Date, DateTime};
