use oxrdfio::{RdfFormat, RdfParseError, RdfParser};
use rdf_relay_common::{
    LoadRequest, LoadSource, Page, RdfFileFormat, StatementPattern, StoreError, StoreService,
    TriplePattern, WireQuad, WireTriple,
};
use rdf_relay_model::{
    compare_typed_values, GraphName, Quad, Term, TermRef, WireContext, WireContexts, WireTerm,
};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// A store service that keeps its statements in memory.
///
/// Statements are kept as canonical wire quads, so the answers are exactly what a remote store
/// would send. Results come back in the lexicographic order of their wire strings, which keeps
/// paging stable.
///
/// ```
/// use rdf_relay_common::{StatementPattern, StoreService, WireTriple};
/// use rdf_relay_model::{WireContexts, WireTerm};
/// use rdf_relay_storage::MemStoreService;
///
/// let store = MemStoreService::new();
/// let triple = WireTriple {
///     subject: WireTerm::new_unchecked("<http://example.com/s>"),
///     predicate: WireTerm::new_unchecked("<http://example.com/p>"),
///     object: WireTerm::new_unchecked("\"o\""),
/// };
/// store.add_statement(&triple, &WireContexts::All)?;
/// assert_eq!(store.size()?, 1);
/// assert_eq!(store.get_statements(&StatementPattern::any(), false, None)?.len(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default)]
pub struct MemStoreService {
    quads: RwLock<BTreeSet<WireQuad>>,
    read_only: bool,
}

impl MemStoreService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `quads`. Default graph quads have no context.
    pub fn with_quads(quads: impl IntoIterator<Item = Quad>) -> Self {
        Self {
            quads: RwLock::new(quads.into_iter().map(encode_quad).collect()),
            read_only: false,
        }
    }

    /// Makes every write fail like a read-only remote repository.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeSet<WireQuad>>, StoreError> {
        self.quads
            .read()
            .map_err(|_| StoreError::other("The in-memory store lock is poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeSet<WireQuad>>, StoreError> {
        if self.read_only {
            return Err(StoreError::remote(403, "The repository is read-only"));
        }
        self.quads
            .write()
            .map_err(|_| StoreError::other("The in-memory store lock is poisoned"))
    }
}

impl StoreService for MemStoreService {
    fn size(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.len() as u64)
    }

    fn get_statements(
        &self,
        pattern: &StatementPattern,
        infer: bool,
        page: Option<Page>,
    ) -> Result<Vec<WireQuad>, StoreError> {
        if infer {
            debug!("The in-memory store has no reasoner, returning explicit statements only");
        }
        let quads = self.read()?;
        let matching = quads
            .iter()
            .filter(|quad| pattern.matches(quad, in_range))
            .cloned();
        Ok(match page {
            Some(page) => matching.skip(page.offset).take(page.limit).collect(),
            None => matching.collect(),
        })
    }

    fn add_statement(&self, triple: &WireTriple, contexts: &WireContexts) -> Result<(), StoreError> {
        let mut quads = self.write()?;
        match contexts {
            WireContexts::All => {
                quads.insert(WireQuad::from_triple(triple.clone(), &WireContext::Null));
            }
            WireContexts::Only(contexts) => {
                for context in contexts {
                    quads.insert(WireQuad::from_triple(triple.clone(), context));
                }
            }
        }
        Ok(())
    }

    fn delete_matching_statements(
        &self,
        pattern: &TriplePattern,
        contexts: &WireContexts,
    ) -> Result<(), StoreError> {
        let pattern = StatementPattern {
            triple: pattern.clone(),
            contexts: contexts.clone(),
        };
        let mut quads = self.write()?;
        let before = quads.len();
        quads.retain(|quad| !pattern.matches(quad, in_range));
        debug!("Deleted {} statements", before - quads.len());
        Ok(())
    }

    fn load_file(&self, request: &LoadRequest) -> Result<(), StoreError> {
        let loaded = parse_document(request)?;
        debug!("Loading {} {} statements", loaded.len(), request.format);
        self.write()?.extend(loaded);
        Ok(())
    }

    fn list_contexts(&self) -> Result<Vec<WireTerm>, StoreError> {
        let contexts = self
            .read()?
            .iter()
            .filter_map(|quad| quad.context.clone())
            .collect::<BTreeSet<_>>();
        Ok(contexts.into_iter().collect())
    }

    fn is_writable(&self) -> Result<bool, StoreError> {
        Ok(!self.read_only)
    }
}

fn parse_document(request: &LoadRequest) -> Result<Vec<WireQuad>, StoreError> {
    let path = match &request.source {
        LoadSource::Upload(path) => path.clone(),
        LoadSource::ServerSide(source) if is_remote_source(source) => {
            return Err(StoreError::remote(
                400,
                format!("Cannot fetch remote document {source}"),
            ));
        }
        LoadSource::ServerSide(source) => source.into(),
    };
    let mut parser = RdfParser::from_format(match request.format {
        RdfFileFormat::NTriples => RdfFormat::NTriples,
        RdfFileFormat::RdfXml => RdfFormat::RdfXml,
    });
    if let Some(base_iri) = &request.base_iri {
        parser = parser
            .with_base_iri(base_iri)
            .map_err(|e| StoreError::remote(400, e.to_string()))?;
    }
    let reader = BufReader::new(File::open(path)?);
    parser
        .rename_blank_nodes()
        .for_reader(reader)
        .map(|quad| -> Result<WireQuad, StoreError> {
            let quad = quad.map_err(|e| match e {
                RdfParseError::Io(e) => StoreError::Io(e),
                RdfParseError::Syntax(e) => StoreError::remote(400, e.to_string()),
            })?;
            let mut quad = encode_quad(quad);
            quad.context = match &request.context {
                WireContext::Null => None,
                WireContext::Term(context) => Some(context.clone()),
            };
            Ok(quad)
        })
        .collect()
}

fn encode_quad(quad: Quad) -> WireQuad {
    let context = match quad.graph_name {
        GraphName::NamedNode(node) => Some(WireTerm::from(node.as_ref())),
        GraphName::BlankNode(node) => Some(WireTerm::from(TermRef::from(node.as_ref()))),
        GraphName::DefaultGraph => None,
    };
    WireQuad {
        subject: WireTerm::from(&Term::from(quad.subject)),
        predicate: WireTerm::from(quad.predicate.as_ref()),
        object: WireTerm::from(&quad.object),
        context,
    }
}

fn is_remote_source(source: &str) -> bool {
    let source = source.to_ascii_lowercase();
    source.starts_with("http:") || source.starts_with("https:")
}

/// Checks that `object` lies in the inclusive range `[lower, upper]`.
///
/// Only literals have an order. Numbers compare by value across datatypes, dates on their
/// timeline.
fn in_range(object: &WireTerm, lower: &WireTerm, upper: &WireTerm) -> bool {
    let (Ok(Term::Literal(object)), Ok(Term::Literal(lower)), Ok(Term::Literal(upper))) =
        (object.decode(), lower.decode(), upper.decode())
    else {
        return false;
    };
    let value = (object.value(), object.datatype());
    let at_least_lower = compare_typed_values((lower.value(), lower.datatype()), value);
    let at_most_upper = compare_typed_values(value, (upper.value(), upper.datatype()));
    matches!(at_least_lower, Some(Ordering::Less | Ordering::Equal))
        && matches!(at_most_upper, Some(Ordering::Less | Ordering::Equal))
}
