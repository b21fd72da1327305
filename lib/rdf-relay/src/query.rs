use crate::Connection;
use oxiri::Iri;
use rdf_relay_common::StoreService;
use rdf_relay_model::normalize::contexts_to_wire;
use rdf_relay_model::{ContextSelector, WireContexts};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// The languages a query can be written in.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum QueryLanguage {
    Sparql,
    Prolog,
}

impl QueryLanguage {
    /// The name the store uses for the language.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sparql => "SPARQL",
            Self::Prolog => "PROLOG",
        }
    }
}

impl fmt::Display for QueryLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QueryLanguage {
    type Err = UnknownQueryLanguage;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name.eq_ignore_ascii_case("sparql") {
            Ok(Self::Sparql)
        } else if name.eq_ignore_ascii_case("prolog") {
            Ok(Self::Prolog)
        } else {
            Err(UnknownQueryLanguage(name.to_owned()))
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown query language '{0}', expected SPARQL or PROLOG")]
pub struct UnknownQueryLanguage(String);

/// The shape of the results a prepared query is expected to produce.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum QueryKind {
    /// Whatever the query text asks for.
    Generic,
    /// Variable bindings.
    Tuple,
    /// Statements.
    Graph,
    /// A single boolean.
    Boolean,
}

/// The contexts a query runs against.
///
/// Both selectors default to [`ContextSelector::All`]. The default contexts form the default
/// graph of the query while the named contexts are reachable with `GRAPH`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    default_contexts: ContextSelector,
    named_contexts: ContextSelector,
}

impl Dataset {
    #[must_use]
    pub fn with_default_contexts(mut self, contexts: impl Into<ContextSelector>) -> Self {
        self.default_contexts = contexts.into();
        self
    }

    #[must_use]
    pub fn with_named_contexts(mut self, contexts: impl Into<ContextSelector>) -> Self {
        self.named_contexts = contexts.into();
        self
    }

    pub fn default_contexts(&self) -> &ContextSelector {
        &self.default_contexts
    }

    pub fn named_contexts(&self) -> &ContextSelector {
        &self.named_contexts
    }

    /// The default contexts in wire form. An empty selection means every context.
    pub fn default_contexts_to_wire(&self) -> WireContexts {
        contexts_to_wire(Some(&self.default_contexts), false)
    }

    pub fn named_contexts_to_wire(&self) -> WireContexts {
        contexts_to_wire(Some(&self.named_contexts), false)
    }
}

/// A query prepared on a [`Connection`].
///
/// Preparing a query never contacts the store. The query keeps a reference to its connection
/// so that it sees the namespaces defined there.
///
/// ```
/// use rdf_relay::{Connection, QueryLanguage};
/// use rdf_relay_storage::MemStoreService;
///
/// let mut connection = Connection::new(MemStoreService::new());
/// connection.set_namespace("ex", "http://example.com/");
/// let query = connection.prepare_tuple_query(
///     QueryLanguage::Sparql,
///     "SELECT ?s WHERE { ?s a ex:Thing }",
///     None,
/// )?;
/// assert_eq!(
///     query.query_text_with_prefixes(),
///     "PREFIX ex: <http://example.com/> SELECT ?s WHERE { ?s a ex:Thing }"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub struct Query<'a, S: StoreService> {
    connection: &'a Connection<S>,
    language: QueryLanguage,
    kind: QueryKind,
    text: String,
    base_iri: Option<Iri<String>>,
    include_inferred: bool,
    dataset: Dataset,
}

impl<'a, S: StoreService> Query<'a, S> {
    pub(crate) fn new(
        connection: &'a Connection<S>,
        language: QueryLanguage,
        kind: QueryKind,
        text: String,
        base_iri: Option<Iri<String>>,
    ) -> Self {
        Self {
            connection,
            language,
            kind,
            text,
            base_iri,
            include_inferred: false,
            dataset: Dataset::default(),
        }
    }

    pub fn connection(&self) -> &'a Connection<S> {
        self.connection
    }

    pub fn language(&self) -> QueryLanguage {
        self.language
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// The query text as it was given.
    pub fn query_text(&self) -> &str {
        &self.text
    }

    pub fn base_iri(&self) -> Option<&str> {
        self.base_iri.as_ref().map(Iri::as_str)
    }

    pub fn include_inferred(&self) -> bool {
        self.include_inferred
    }

    pub fn set_include_inferred(&mut self, include_inferred: bool) {
        self.include_inferred = include_inferred;
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.dataset = dataset;
    }

    /// Returns the SPARQL text with a `PREFIX` declaration for every namespace of the
    /// connection that the query uses without declaring it.
    ///
    /// Prefixes are matched case-insensitively. Prolog queries are returned unchanged.
    pub fn query_text_with_prefixes(&self) -> Cow<'_, str> {
        if self.language != QueryLanguage::Sparql {
            return Cow::Borrowed(&self.text);
        }
        let lowercase = self.text.to_lowercase();
        let declarations = self
            .connection
            .namespaces()
            .iter()
            .filter(|(prefix, _)| {
                lowercase.contains(&format!("{prefix}:"))
                    && !lowercase.contains(&format!("prefix {prefix}:"))
            })
            .map(|(prefix, namespace)| format!("PREFIX {prefix}: <{namespace}> "))
            .collect::<String>();
        if declarations.is_empty() {
            Cow::Borrowed(&self.text)
        } else {
            Cow::Owned(declarations + &self.text)
        }
    }
}

impl<S: StoreService> fmt::Debug for Query<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("language", &self.language)
            .field("kind", &self.kind)
            .field("text", &self.text)
            .field("base_iri", &self.base_iri())
            .field("include_inferred", &self.include_inferred)
            .field("dataset", &self.dataset)
            .finish_non_exhaustive()
    }
}
