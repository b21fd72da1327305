use crate::{TermArg, WireTerm};
use oxrdf::{BlankNode, GraphName, NamedNode, NamedNodeRef, NamedOrBlankNode};
use std::fmt;

/// The sentinel the store service uses for "statements without a context".
pub const NULL_CONTEXT_TOKEN: &str = "null";

/// A single context a caller may name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Context {
    /// The context of statements that have no context.
    Null,
    /// A named context (an IRI or a blank node).
    Named(TermArg),
}

impl From<NamedNode> for Context {
    fn from(node: NamedNode) -> Self {
        Self::Named(node.into())
    }
}

impl From<NamedNodeRef<'_>> for Context {
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self::Named(node.into())
    }
}

impl From<BlankNode> for Context {
    fn from(node: BlankNode) -> Self {
        Self::Named(node.into())
    }
}

impl From<NamedOrBlankNode> for Context {
    fn from(node: NamedOrBlankNode) -> Self {
        Self::Named(node.into())
    }
}

impl From<WireTerm> for Context {
    fn from(wire: WireTerm) -> Self {
        Self::Named(wire.into())
    }
}

impl From<TermArg> for Context {
    fn from(term: TermArg) -> Self {
        Self::Named(term)
    }
}

impl From<GraphName> for Context {
    fn from(graph_name: GraphName) -> Self {
        match graph_name {
            GraphName::NamedNode(node) => node.into(),
            GraphName::BlankNode(node) => node.into(),
            GraphName::DefaultGraph => Self::Null,
        }
    }
}

impl From<Option<NamedOrBlankNode>> for Context {
    fn from(node: Option<NamedOrBlankNode>) -> Self {
        node.map_or(Self::Null, Self::from)
    }
}

/// Selects the contexts an operation applies to.
///
/// [`ContextSelector::All`] and [`ContextSelector::Null`] are different things: the former
/// ignores contexts entirely while the latter only matches statements without a context.
///
/// ```
/// use rdf_relay_model::{ContextSelector, NamedNode};
///
/// // every context
/// let all = ContextSelector::default();
/// // only the statements without context
/// let null = ContextSelector::Null;
/// // a specific named context
/// let named = ContextSelector::from(NamedNode::new("http://example.com/g")?);
/// assert_ne!(all, null);
/// assert_ne!(null, named);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContextSelector {
    /// No context restriction.
    #[default]
    All,
    /// Only statements that have no context.
    Null,
    Single(Context),
    Set(Vec<Context>),
}

impl ContextSelector {
    /// Builds a selector from any number of contexts.
    pub fn set(contexts: impl IntoIterator<Item = impl Into<Context>>) -> Self {
        Self::Set(contexts.into_iter().map(Into::into).collect())
    }

    /// Returns the number of explicitly named contexts, if the selector names any.
    pub fn explicit_len(&self) -> Option<usize> {
        match self {
            ContextSelector::All => None,
            ContextSelector::Null | ContextSelector::Single(_) => Some(1),
            ContextSelector::Set(contexts) => Some(contexts.len()),
        }
    }
}

impl From<Context> for ContextSelector {
    fn from(context: Context) -> Self {
        Self::Single(context)
    }
}

impl From<Vec<Context>> for ContextSelector {
    fn from(contexts: Vec<Context>) -> Self {
        Self::Set(contexts)
    }
}

impl From<NamedNode> for ContextSelector {
    fn from(node: NamedNode) -> Self {
        Self::Single(node.into())
    }
}

impl From<NamedNodeRef<'_>> for ContextSelector {
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self::Single(node.into())
    }
}

impl From<NamedOrBlankNode> for ContextSelector {
    fn from(node: NamedOrBlankNode) -> Self {
        Self::Single(node.into())
    }
}

impl From<WireTerm> for ContextSelector {
    fn from(wire: WireTerm) -> Self {
        Self::Single(wire.into())
    }
}

/// A single context in wire form.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WireContext {
    /// The null context marker, sent as [`NULL_CONTEXT_TOKEN`].
    Null,
    Term(WireTerm),
}

impl WireContext {
    pub fn as_str(&self) -> &str {
        match self {
            WireContext::Null => NULL_CONTEXT_TOKEN,
            WireContext::Term(term) => term.as_str(),
        }
    }
}

impl fmt::Display for WireContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A context restriction in wire form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WireContexts {
    /// No restriction, nothing is transmitted.
    All,
    /// Only the listed contexts (possibly including the null marker).
    Only(Vec<WireContext>),
}

impl WireContexts {
    #[inline]
    pub fn is_all(&self) -> bool {
        matches!(self, WireContexts::All)
    }

    /// Checks whether a statement stored in `context` is selected.
    pub fn matches(&self, context: Option<&WireTerm>) -> bool {
        match self {
            WireContexts::All => true,
            WireContexts::Only(contexts) => contexts.iter().any(|c| match (c, context) {
                (WireContext::Null, None) => true,
                (WireContext::Term(expected), Some(actual)) => expected == actual,
                _ => false,
            }),
        }
    }
}
