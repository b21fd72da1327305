use crate::error::ExportError;
use crate::{
    NamespaceTable, Query, QueryKind, QueryLanguage, RdfHandler, RepositoryError, StatementCursor,
};
use oxiri::Iri;
use rdf_relay_common::{
    LoadRequest, LoadSource, RdfFileFormat, StatementPattern, StoreService, TriplePattern,
    WireTriple,
};
use rdf_relay_model::normalize::{
    context_to_wire, contexts_to_wire, object_term_to_wire, term_to_wire,
};
use rdf_relay_model::{
    ContextSelector, ModelError, NamedOrBlankNode, ObjectArg, Quad, Statement, Term, TermArg,
    Triple, ValueFactory, WireContext, WireContexts, WireObject, WireTerm,
};
use std::path::{self, Path, PathBuf};
use tracing::{debug, warn};

/// The number of statements a [`StatementCursor`] asks for at once.
pub const DEFAULT_PAGE_SIZE: usize = 5000;

/// What to add with [`Connection::add`].
pub enum Addition<'a> {
    /// A single triple. The object may be a raw value that the value factory turns into a literal.
    Triple {
        subject: TermArg,
        predicate: TermArg,
        object: ObjectArg,
    },
    Statement(Statement),
    /// Statements added one by one. A failure leaves the previous ones in the store.
    Statements(Box<dyn Iterator<Item = Statement> + 'a>),
    File(FileLoad),
}

impl From<Statement> for Addition<'_> {
    fn from(statement: Statement) -> Self {
        Self::Statement(statement)
    }
}

impl From<Quad> for Addition<'_> {
    fn from(quad: Quad) -> Self {
        Self::Statement(quad.into())
    }
}

impl From<Triple> for Addition<'_> {
    fn from(triple: Triple) -> Self {
        Self::Statement(triple.into())
    }
}

impl From<FileLoad> for Addition<'_> {
    fn from(file: FileLoad) -> Self {
        Self::File(file)
    }
}

impl<'a> From<Vec<Statement>> for Addition<'a> {
    fn from(statements: Vec<Statement>) -> Self {
        Self::Statements(Box::new(statements.into_iter()))
    }
}

/// A file to load with [`Connection::add`].
///
/// ```
/// use rdf_relay::FileLoad;
/// use rdf_relay::service::RdfFileFormat;
///
/// let load = FileLoad::new("http://example.com/data")
///     .with_format(RdfFileFormat::RdfXml)
///     .with_base_iri("http://example.com/");
/// assert_eq!(load.format(), Some(RdfFileFormat::RdfXml));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileLoad {
    source: String,
    format: Option<RdfFileFormat>,
    base_iri: Option<String>,
    server_side: bool,
}

impl FileLoad {
    /// A local path, or an `http:`/`https:` URL that the server fetches itself.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            format: None,
            base_iri: None,
            server_side: false,
        }
    }

    /// Sets the format instead of guessing it from the file extension.
    #[must_use]
    pub fn with_format(mut self, format: RdfFileFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the IRI relative IRIs are resolved against. Only RDF/XML documents use it.
    #[must_use]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    /// Asks the server to read the file from its own file system.
    #[must_use]
    pub fn server_side(mut self) -> Self {
        self.server_side = true;
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn format(&self) -> Option<RdfFileFormat> {
        self.format
    }
}

/// What to remove with [`Connection::remove`].
pub enum Removal<'a> {
    /// Every statement matching the pattern. Absent positions match anything.
    Pattern {
        subject: Option<TermArg>,
        predicate: Option<TermArg>,
        object: Option<ObjectArg>,
    },
    Statement(Statement),
    Statements(Box<dyn Iterator<Item = Statement> + 'a>),
}

impl Removal<'_> {
    /// The pattern matching every statement.
    pub fn all() -> Self {
        Self::Pattern {
            subject: None,
            predicate: None,
            object: None,
        }
    }
}

impl From<Statement> for Removal<'_> {
    fn from(statement: Statement) -> Self {
        Self::Statement(statement)
    }
}

impl From<Quad> for Removal<'_> {
    fn from(quad: Quad) -> Self {
        Self::Statement(quad.into())
    }
}

impl<'a> From<Vec<Statement>> for Removal<'a> {
    fn from(statements: Vec<Statement>) -> Self {
        Self::Statements(Box::new(statements.into_iter()))
    }
}

/// A connection to a repository behind a [`StoreService`].
///
/// Every operation normalizes its terms and contexts into wire form and forwards them to the
/// store service. There is no transaction: each call is applied by the store as soon as it is
/// made, which makes [`commit`](Connection::commit) and [`rollback`](Connection::rollback)
/// no-ops.
///
/// Contexts are given as an optional [`ContextSelector`]. Leaving it out means every context
/// when reading, removing or counting, and the null context when adding.
///
/// ```
/// use rdf_relay::model::*;
/// use rdf_relay::Connection;
/// use rdf_relay_storage::MemStoreService;
///
/// let connection = Connection::new(MemStoreService::new());
/// let ex = NamedNode::new("http://example.com/ex")?;
/// let g = NamedNode::new("http://example.com/g")?;
/// connection.add_triple(ex.clone(), ex.clone(), 42_i64, Some(&g.clone().into()))?;
/// connection.add_triple(ex.clone(), ex.clone(), 43_i64, None)?;
///
/// assert_eq!(connection.size(None)?, 2);
/// assert_eq!(connection.size(Some(&ContextSelector::Null))?, 1);
///
/// let statements = connection
///     .get_statements(None, None, None, Some(&g.into()), false)?
///     .collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(statements[0].object(), &Term::from(Literal::from(42_i64)));
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug)]
pub struct Connection<S: StoreService> {
    service: S,
    value_factory: ValueFactory,
    namespaces: NamespaceTable,
    page_size: usize,
}

impl<S: StoreService> Connection<S> {
    /// Opens a connection with the well-known namespaces and the default page size.
    pub fn new(service: S) -> Self {
        Self {
            service,
            value_factory: ValueFactory::default(),
            namespaces: NamespaceTable::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_namespaces(mut self, namespaces: NamespaceTable) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Sets how many statements a cursor fetches per request. Zero is treated as one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn with_value_factory(mut self, value_factory: ValueFactory) -> Self {
        self.value_factory = value_factory;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn value_factory(&self) -> &ValueFactory {
        &self.value_factory
    }

    pub fn value_factory_mut(&mut self) -> &mut ValueFactory {
        &mut self.value_factory
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the statements matching a pattern.
    ///
    /// Absent positions are wildcards. A range object matches every literal between its
    /// bounds, both included. The statements are fetched lazily, page by page.
    pub fn get_statements(
        &self,
        subject: Option<&TermArg>,
        predicate: Option<&TermArg>,
        object: Option<&ObjectArg>,
        contexts: Option<&ContextSelector>,
        include_inferred: bool,
    ) -> Result<StatementCursor<'_, S>, RepositoryError> {
        let pattern = StatementPattern {
            triple: self.triple_pattern(subject, predicate, object)?,
            contexts: contexts_to_wire(contexts, false),
        };
        debug!(?pattern, include_inferred, "preparing a statement cursor");
        Ok(StatementCursor::new(
            &self.service,
            pattern,
            include_inferred,
            self.page_size,
        ))
    }

    /// Adds statements, or a whole file, to the repository.
    ///
    /// Without contexts a triple goes into the null context and a statement into its own
    /// context. Explicit contexts always win. A file is loaded into at most one context.
    pub fn add<'a>(
        &self,
        addition: impl Into<Addition<'a>>,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        match addition.into() {
            Addition::Triple {
                subject,
                predicate,
                object,
            } => {
                let triple = self.wire_triple(&subject, &predicate, &object)?;
                self.insert(&triple, &contexts_to_wire(contexts, true))
            }
            Addition::Statement(statement) => self.add_one(&statement, contexts),
            Addition::Statements(statements) => {
                for statement in statements {
                    self.add_one(&statement, contexts)?;
                }
                Ok(())
            }
            Addition::File(file) => self.load(file, contexts),
        }
    }

    /// Adds one triple. Without contexts it goes into the null context.
    pub fn add_triple(
        &self,
        subject: impl Into<TermArg>,
        predicate: impl Into<TermArg>,
        object: impl Into<ObjectArg>,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        self.add(
            Addition::Triple {
                subject: subject.into(),
                predicate: predicate.into(),
                object: object.into(),
            },
            contexts,
        )
    }

    pub fn add_statement(
        &self,
        statement: &Statement,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        self.add_one(statement, contexts)
    }

    pub fn add_statements(
        &self,
        statements: impl IntoIterator<Item = Statement>,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        self.add(
            Addition::Statements(Box::new(statements.into_iter())),
            contexts,
        )
    }

    pub fn add_file(
        &self,
        file: FileLoad,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        self.load(file, contexts)
    }

    /// Removes statements from the repository.
    ///
    /// Without contexts a pattern applies to every context and a statement to its own context,
    /// or to every context if it has none.
    pub fn remove<'a>(
        &self,
        removal: impl Into<Removal<'a>>,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        match removal.into() {
            Removal::Pattern {
                subject,
                predicate,
                object,
            } => {
                if object.as_ref().is_some_and(ObjectArg::is_range) {
                    return Err(RepositoryError::invalid_argument(
                        "Statements cannot be removed with a range object",
                    ));
                }
                let pattern =
                    self.triple_pattern(subject.as_ref(), predicate.as_ref(), object.as_ref())?;
                self.delete(&pattern, &contexts_to_wire(contexts, false))
            }
            Removal::Statement(statement) => self.remove_one(&statement, contexts),
            Removal::Statements(statements) => {
                for statement in statements {
                    self.remove_one(&statement, contexts)?;
                }
                Ok(())
            }
        }
    }

    pub fn remove_triple(
        &self,
        subject: Option<&TermArg>,
        predicate: Option<&TermArg>,
        object: Option<&ObjectArg>,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        self.remove(
            Removal::Pattern {
                subject: subject.cloned(),
                predicate: predicate.cloned(),
                object: object.cloned(),
            },
            contexts,
        )
    }

    pub fn remove_statement(
        &self,
        statement: &Statement,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        self.remove_one(statement, contexts)
    }

    pub fn remove_statements(
        &self,
        statements: impl IntoIterator<Item = Statement>,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        self.remove(
            Removal::Statements(Box::new(statements.into_iter())),
            contexts,
        )
    }

    /// Removes every statement of the given contexts, or of the whole repository.
    pub fn clear(&self, contexts: Option<&ContextSelector>) -> Result<(), RepositoryError> {
        self.remove(Removal::all(), contexts)
    }

    /// Counts the statements in the given contexts.
    ///
    /// Counting every context is a single cheap request. Counting some contexts only reads all
    /// their statements, which can be very slow on large repositories.
    pub fn size(&self, contexts: Option<&ContextSelector>) -> Result<u64, RepositoryError> {
        if let WireContexts::All = contexts_to_wire(contexts, false) {
            debug!("counting statements");
            return Ok(self.service.size()?);
        }
        warn!(
            ?contexts,
            "counting the statements of some contexts reads all of them, this may be slow"
        );
        self.get_statements(None, None, None, contexts, false)?
            .count_statements()
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.size(None)? == 0)
    }

    /// Sends the namespaces of this connection and then the matching statements to `handler`.
    pub fn export_statements(
        &self,
        subject: Option<&TermArg>,
        predicate: Option<&TermArg>,
        object: Option<&ObjectArg>,
        include_inferred: bool,
        mut handler: impl RdfHandler,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), ExportError> {
        let statements =
            self.get_statements(subject, predicate, object, contexts, include_inferred)?;
        handler.start_rdf()?;
        for (prefix, namespace) in self.namespaces.iter() {
            handler.handle_namespace(prefix, namespace)?;
        }
        let mut count = 0_u64;
        for statement in statements {
            handler.handle_statement(&statement?)?;
            count += 1;
        }
        handler.end_rdf()?;
        debug!(count, "exported statements");
        Ok(())
    }

    /// Exports every statement of the given contexts.
    pub fn export(
        &self,
        handler: impl RdfHandler,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), ExportError> {
        self.export_statements(None, None, None, false, handler, contexts)
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix)
    }

    /// Defines a prefix on this connection only. The server never sees it.
    pub fn set_namespace(&mut self, prefix: &str, namespace: impl Into<String>) -> Option<String> {
        self.namespaces.set(prefix, namespace)
    }

    pub fn remove_namespace(&mut self, prefix: &str) -> Option<String> {
        self.namespaces.remove(prefix)
    }

    pub fn clear_namespaces(&mut self) {
        self.namespaces.clear();
    }

    /// Prepares a query. Nothing is sent to the store.
    pub fn prepare_query(
        &self,
        language: QueryLanguage,
        query: impl Into<String>,
        base_iri: Option<&str>,
    ) -> Result<Query<'_, S>, RepositoryError> {
        self.prepare(QueryKind::Generic, language, query.into(), base_iri)
    }

    pub fn prepare_tuple_query(
        &self,
        language: QueryLanguage,
        query: impl Into<String>,
        base_iri: Option<&str>,
    ) -> Result<Query<'_, S>, RepositoryError> {
        self.prepare(QueryKind::Tuple, language, query.into(), base_iri)
    }

    pub fn prepare_graph_query(
        &self,
        language: QueryLanguage,
        query: impl Into<String>,
        base_iri: Option<&str>,
    ) -> Result<Query<'_, S>, RepositoryError> {
        self.prepare(QueryKind::Graph, language, query.into(), base_iri)
    }

    pub fn prepare_boolean_query(
        &self,
        language: QueryLanguage,
        query: impl Into<String>,
        base_iri: Option<&str>,
    ) -> Result<Query<'_, S>, RepositoryError> {
        self.prepare(QueryKind::Boolean, language, query.into(), base_iri)
    }

    /// Does nothing: every operation is already applied by the store.
    pub fn commit(&self) -> Result<(), RepositoryError> {
        debug!("commit requested, the store applies every operation immediately");
        Ok(())
    }

    /// Does nothing: operations that already happened cannot be undone.
    pub fn rollback(&self) -> Result<(), RepositoryError> {
        debug!("rollback requested, the store applies every operation immediately");
        Ok(())
    }

    /// Lists the named contexts the repository holds statements in.
    pub fn contexts(&self) -> Result<Vec<NamedOrBlankNode>, RepositoryError> {
        debug!("listing contexts");
        self.service
            .list_contexts()?
            .into_iter()
            .map(|wire| decode_context(&wire))
            .collect()
    }

    pub fn is_writable(&self) -> Result<bool, RepositoryError> {
        Ok(self.service.is_writable()?)
    }

    fn prepare(
        &self,
        kind: QueryKind,
        language: QueryLanguage,
        query: String,
        base_iri: Option<&str>,
    ) -> Result<Query<'_, S>, RepositoryError> {
        let base_iri = base_iri
            .map(|iri| {
                Iri::parse(iri.to_owned()).map_err(|e| {
                    RepositoryError::invalid_argument(format!("Invalid base IRI '{iri}': {e}"))
                })
            })
            .transpose()?;
        debug!(%language, ?kind, "preparing a query");
        Ok(Query::new(self, language, kind, query, base_iri))
    }

    fn triple_pattern(
        &self,
        subject: Option<&TermArg>,
        predicate: Option<&TermArg>,
        object: Option<&ObjectArg>,
    ) -> Result<TriplePattern, RepositoryError> {
        Ok(TriplePattern {
            subject: term_to_wire(subject),
            predicate: term_to_wire(predicate),
            object: object_term_to_wire(object, predicate, &self.value_factory)?,
        })
    }

    fn wire_triple(
        &self,
        subject: &TermArg,
        predicate: &TermArg,
        object: &ObjectArg,
    ) -> Result<WireTriple, RepositoryError> {
        let Some(WireObject::Term(object)) =
            object_term_to_wire(Some(object), Some(predicate), &self.value_factory)?
        else {
            return Err(RepositoryError::invalid_argument(
                "A range cannot be stored as the object of a statement",
            ));
        };
        Ok(WireTriple {
            subject: subject.to_wire(),
            predicate: predicate.to_wire(),
            object,
        })
    }

    fn statement_triple(&self, statement: &Statement) -> Result<WireTriple, RepositoryError> {
        self.wire_triple(
            &statement.subject().clone().into(),
            &statement.predicate().clone().into(),
            &statement.object().clone().into(),
        )
    }

    fn add_one(
        &self,
        statement: &Statement,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        let triple = self.statement_triple(statement)?;
        let contexts = match explicit(contexts) {
            Some(contexts) => contexts_to_wire(Some(contexts), true),
            None => WireContexts::Only(vec![statement_context(statement)]),
        };
        self.insert(&triple, &contexts)
    }

    fn remove_one(
        &self,
        statement: &Statement,
        contexts: Option<&ContextSelector>,
    ) -> Result<(), RepositoryError> {
        let triple = self.statement_triple(statement)?;
        let pattern = TriplePattern {
            subject: Some(triple.subject),
            predicate: Some(triple.predicate),
            object: Some(WireObject::Term(triple.object)),
        };
        let contexts = match (explicit(contexts), statement.context()) {
            (Some(contexts), _) => contexts_to_wire(Some(contexts), false),
            (None, Some(_)) => WireContexts::Only(vec![statement_context(statement)]),
            (None, None) => WireContexts::All,
        };
        self.delete(&pattern, &contexts)
    }

    fn insert(&self, triple: &WireTriple, contexts: &WireContexts) -> Result<(), RepositoryError> {
        debug!(
            subject = %triple.subject,
            predicate = %triple.predicate,
            object = %triple.object,
            ?contexts,
            "adding a statement"
        );
        Ok(self.service.add_statement(triple, contexts)?)
    }

    fn delete(&self, pattern: &TriplePattern, contexts: &WireContexts) -> Result<(), RepositoryError> {
        debug!(?pattern, ?contexts, "removing statements");
        Ok(self.service.delete_matching_statements(pattern, contexts)?)
    }

    fn load(&self, file: FileLoad, contexts: Option<&ContextSelector>) -> Result<(), RepositoryError> {
        let context = match contexts {
            None | Some(ContextSelector::All | ContextSelector::Null) => WireContext::Null,
            Some(ContextSelector::Single(context)) => context_to_wire(context),
            Some(ContextSelector::Set(contexts)) => match contexts.as_slice() {
                [] => WireContext::Null,
                [context] => context_to_wire(context),
                _ => {
                    return Err(RepositoryError::invalid_argument(format!(
                        "A file can only be loaded into one context, got {}",
                        contexts.len()
                    )))
                }
            },
        };
        let format = file
            .format
            .or_else(|| RdfFileFormat::from_path(&file.source))
            .ok_or_else(|| RepositoryError::UnsupportedFormat(file.source.clone()))?;
        let source = if is_remote(&file.source) {
            LoadSource::ServerSide(file.source)
        } else {
            let path = local_path(&file.source);
            if file.server_side {
                LoadSource::ServerSide(path.to_string_lossy().into_owned())
            } else {
                LoadSource::Upload(path)
            }
        };
        debug!(?source, %format, %context, "loading a file");
        Ok(self.service.load_file(&LoadRequest {
            source,
            format,
            context,
            base_iri: file.base_iri,
        })?)
    }
}

/// Returns the selector if it names contexts. `All` and empty sets name none.
fn explicit(contexts: Option<&ContextSelector>) -> Option<&ContextSelector> {
    contexts.filter(|contexts| {
        !matches!(contexts, ContextSelector::All)
            && !matches!(contexts, ContextSelector::Set(set) if set.is_empty())
    })
}

fn statement_context(statement: &Statement) -> WireContext {
    match statement.context() {
        Some(context) => WireContext::Term(TermArg::from(context.clone()).to_wire()),
        None => WireContext::Null,
    }
}

fn decode_context(wire: &WireTerm) -> Result<NamedOrBlankNode, RepositoryError> {
    let decode_error = |error| RepositoryError::Decode {
        row: wire.to_string(),
        error,
    };
    match wire.decode().map_err(decode_error)? {
        Term::NamedNode(node) => Ok(node.into()),
        Term::BlankNode(node) => Ok(node.into()),
        other => Err(decode_error(ModelError::UnexpectedTerm {
            expected: "an IRI or blank node context",
            found: other.to_string(),
        })),
    }
}

fn is_remote(source: &str) -> bool {
    let lowercase = source.to_ascii_lowercase();
    lowercase.starts_with("http:") || lowercase.starts_with("https:")
}

/// Makes relative paths absolute when they exist locally.
fn local_path(source: &str) -> PathBuf {
    let path = Path::new(source);
    if path.is_relative() && path.exists() {
        if let Ok(absolute) = path::absolute(path) {
            return absolute;
        }
    }
    path.to_path_buf()
}
