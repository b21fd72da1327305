use crate::ModelError;
use oxrdf::{GraphName, NamedNode, NamedOrBlankNode, Quad, Subject, Term, Triple};
use std::fmt;

/// A statement: a triple with an optional context.
///
/// A statement is immutable once built. Use [`Statement::in_context`] to obtain a copy placed
/// in another context.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Statement {
    subject: Subject,
    predicate: NamedNode,
    object: Term,
    context: Option<NamedOrBlankNode>,
}

impl Statement {
    /// Builds a statement without context.
    pub fn new(
        subject: impl Into<Subject>,
        predicate: impl Into<NamedNode>,
        object: impl Into<Term>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            context: None,
        }
    }

    /// Returns a copy of this statement placed in `context`.
    #[must_use]
    pub fn in_context(self, context: impl Into<NamedOrBlankNode>) -> Self {
        Self {
            context: Some(context.into()),
            ..self
        }
    }

    /// Builds a statement from decoded terms, checking that each one fits its position.
    pub fn try_from_terms(
        subject: Term,
        predicate: Term,
        object: Term,
        context: Option<Term>,
    ) -> Result<Self, ModelError> {
        let subject = match subject {
            Term::NamedNode(node) => Subject::NamedNode(node),
            Term::BlankNode(node) => Subject::BlankNode(node),
            other => return Err(ModelError::unexpected_term("an IRI or blank node subject", other)),
        };
        let Term::NamedNode(predicate) = predicate else {
            return Err(ModelError::unexpected_term("an IRI predicate", predicate));
        };
        let context = match context {
            None => None,
            Some(Term::NamedNode(node)) => Some(NamedOrBlankNode::NamedNode(node)),
            Some(Term::BlankNode(node)) => Some(NamedOrBlankNode::BlankNode(node)),
            Some(other) => {
                return Err(ModelError::unexpected_term("an IRI or blank node context", other))
            }
        };
        Ok(Self {
            subject,
            predicate,
            object,
            context,
        })
    }

    #[inline]
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    #[inline]
    pub fn predicate(&self) -> &NamedNode {
        &self.predicate
    }

    #[inline]
    pub fn object(&self) -> &Term {
        &self.object
    }

    #[inline]
    pub fn context(&self) -> Option<&NamedOrBlankNode> {
        self.context.as_ref()
    }

    /// Returns the statement without its context.
    pub fn to_triple(&self) -> Triple {
        Triple::new(
            self.subject.clone(),
            self.predicate.clone(),
            self.object.clone(),
        )
    }

    /// Returns the statement as a quad, mapping "no context" to the default graph.
    pub fn to_quad(&self) -> Quad {
        Quad::new(
            self.subject.clone(),
            self.predicate.clone(),
            self.object.clone(),
            self.graph_name(),
        )
    }

    fn graph_name(&self) -> GraphName {
        match &self.context {
            Some(NamedOrBlankNode::NamedNode(node)) => GraphName::NamedNode(node.clone()),
            Some(NamedOrBlankNode::BlankNode(node)) => GraphName::BlankNode(node.clone()),
            None => GraphName::DefaultGraph,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(context) = &self.context {
            write!(f, " {context}")?;
        }
        f.write_str(" .")
    }
}

impl From<Triple> for Statement {
    fn from(triple: Triple) -> Self {
        Self {
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
            context: None,
        }
    }
}

impl From<Quad> for Statement {
    fn from(quad: Quad) -> Self {
        let context = match quad.graph_name {
            GraphName::NamedNode(node) => Some(NamedOrBlankNode::NamedNode(node)),
            GraphName::BlankNode(node) => Some(NamedOrBlankNode::BlankNode(node)),
            GraphName::DefaultGraph => None,
        };
        Self {
            subject: quad.subject,
            predicate: quad.predicate,
            object: quad.object,
            context,
        }
    }
}

impl From<Statement> for Quad {
    fn from(statement: Statement) -> Self {
        let graph_name = statement.graph_name();
        Quad::new(
            statement.subject,
            statement.predicate,
            statement.object,
            graph_name,
        )
    }
}
