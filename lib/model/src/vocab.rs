//! Common vocabularies and their namespaces.

pub use oxrdf::vocab::{rdf, rdfs, xsd};

/// `rdf:` namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// `rdfs:` namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// `xsd:` namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// `owl:` namespace.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";

/// The prefixes every new namespace table starts with.
pub const WELL_KNOWN_PREFIXES: [(&str, &str); 4] =
    [("rdf", RDF), ("rdfs", RDFS), ("xsd", XSD), ("owl", OWL)];
