use crate::{LoadRequest, Page, StatementPattern, StoreError, TriplePattern, WireQuad, WireTriple};
use rdf_relay_model::{WireContexts, WireTerm};

/// The remote triple store as seen by a connection.
///
/// Every argument is already normalized: terms are canonical wire strings and contexts have been
/// resolved into [`WireContexts`]. Implementations only move these values over their transport
/// and must not reinterpret them.
pub trait StoreService: Send + Sync {
    /// Returns the total number of statements, without any context restriction.
    fn size(&self) -> Result<u64, StoreError>;

    /// Returns the statements matching `pattern`.
    ///
    /// If `page` is set, only that window of the result is returned. Results are returned in a
    /// stable order so that consecutive pages do not overlap.
    fn get_statements(
        &self,
        pattern: &StatementPattern,
        infer: bool,
        page: Option<Page>,
    ) -> Result<Vec<WireQuad>, StoreError>;

    /// Adds a triple to each of the given contexts.
    ///
    /// [`WireContexts::All`] has no meaning for writes and is sent as "no context restriction",
    /// which stores accept as the null context.
    fn add_statement(&self, triple: &WireTriple, contexts: &WireContexts) -> Result<(), StoreError>;

    /// Deletes every statement matching `pattern` in the given contexts.
    fn delete_matching_statements(
        &self,
        pattern: &TriplePattern,
        contexts: &WireContexts,
    ) -> Result<(), StoreError>;

    /// Loads an RDF document.
    fn load_file(&self, request: &LoadRequest) -> Result<(), StoreError>;

    /// Returns the contexts that hold at least one statement.
    fn list_contexts(&self) -> Result<Vec<WireTerm>, StoreError>;

    /// Returns whether the repository accepts writes.
    fn is_writable(&self) -> Result<bool, StoreError>;
}

impl<S: StoreService + ?Sized> StoreService for Box<S> {
    fn size(&self) -> Result<u64, StoreError> {
        (**self).size()
    }

    fn get_statements(
        &self,
        pattern: &StatementPattern,
        infer: bool,
        page: Option<Page>,
    ) -> Result<Vec<WireQuad>, StoreError> {
        (**self).get_statements(pattern, infer, page)
    }

    fn add_statement(&self, triple: &WireTriple, contexts: &WireContexts) -> Result<(), StoreError> {
        (**self).add_statement(triple, contexts)
    }

    fn delete_matching_statements(
        &self,
        pattern: &TriplePattern,
        contexts: &WireContexts,
    ) -> Result<(), StoreError> {
        (**self).delete_matching_statements(pattern, contexts)
    }

    fn load_file(&self, request: &LoadRequest) -> Result<(), StoreError> {
        (**self).load_file(request)
    }

    fn list_contexts(&self) -> Result<Vec<WireTerm>, StoreError> {
        (**self).list_contexts()
    }

    fn is_writable(&self) -> Result<bool, StoreError> {
        (**self).is_writable()
    }
}
