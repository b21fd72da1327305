use crate::{ProtocolError, StoreError};
use rdf_relay_model::normalize::WireObject;
use rdf_relay_model::{
    ModelError, Statement, WireContext, WireContexts, WireTerm, NULL_CONTEXT_TOKEN,
};

/// A triple pattern in wire form. Absent positions are wildcards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TriplePattern {
    pub subject: Option<WireTerm>,
    pub predicate: Option<WireTerm>,
    pub object: Option<WireObject>,
}

/// A triple pattern restricted to some contexts.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StatementPattern {
    pub triple: TriplePattern,
    pub contexts: WireContexts,
}

impl StatementPattern {
    /// A pattern that matches every statement.
    pub fn any() -> Self {
        Self {
            triple: TriplePattern::default(),
            contexts: WireContexts::All,
        }
    }

    /// Checks whether a stored quad matches.
    ///
    /// `in_range(object, lower, upper)` decides range objects, whose ordering depends on the
    /// datatypes involved.
    pub fn matches(
        &self,
        quad: &WireQuad,
        in_range: impl FnOnce(&WireTerm, &WireTerm, &WireTerm) -> bool,
    ) -> bool {
        let triple = &self.triple;
        if triple.subject.as_ref().is_some_and(|s| *s != quad.subject)
            || triple.predicate.as_ref().is_some_and(|p| *p != quad.predicate)
        {
            return false;
        }
        let object_matches = match &triple.object {
            None => true,
            Some(WireObject::Term(object)) => *object == quad.object,
            Some(WireObject::Range { lower, upper }) => in_range(&quad.object, lower, upper),
        };
        object_matches && self.contexts.matches(quad.context.as_ref())
    }
}

/// A triple to write, in wire form.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WireTriple {
    pub subject: WireTerm,
    pub predicate: WireTerm,
    pub object: WireTerm,
}

/// A stored statement as returned by the store service.
///
/// A missing context means the statement has no context.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireQuad {
    pub subject: WireTerm,
    pub predicate: WireTerm,
    pub object: WireTerm,
    pub context: Option<WireTerm>,
}

impl WireQuad {
    /// Builds a quad from a result row of three or four strings.
    ///
    /// A missing fourth column, a JSON `null` and the null context token all mean "no context".
    pub fn from_row(row: Vec<Option<String>>) -> Result<Self, StoreError> {
        let len = row.len();
        if !(3..=4).contains(&len) {
            return Err(ProtocolError::msg(format!(
                "Expected a statement row of 3 or 4 columns, found {len}"
            ))
            .into());
        }
        let mut columns = row.into_iter();
        let mut next_term = |name: &str| -> Result<WireTerm, StoreError> {
            columns
                .next()
                .flatten()
                .map(WireTerm::new_unchecked)
                .ok_or_else(|| ProtocolError::msg(format!("The {name} of a row is null")).into())
        };
        let subject = next_term("subject")?;
        let predicate = next_term("predicate")?;
        let object = next_term("object")?;
        let context = columns
            .next()
            .flatten()
            .filter(|c| c != NULL_CONTEXT_TOKEN)
            .map(WireTerm::new_unchecked);
        Ok(Self {
            subject,
            predicate,
            object,
            context,
        })
    }

    /// Places a triple in a context.
    pub fn from_triple(triple: WireTriple, context: &WireContext) -> Self {
        Self {
            subject: triple.subject,
            predicate: triple.predicate,
            object: triple.object,
            context: match context {
                WireContext::Null => None,
                WireContext::Term(term) => Some(term.clone()),
            },
        }
    }

    /// Parses the row into a statement.
    pub fn decode(&self) -> Result<Statement, ModelError> {
        Statement::try_from_terms(
            self.subject.decode()?,
            self.predicate.decode()?,
            self.object.decode()?,
            self.context.as_ref().map(WireTerm::decode).transpose()?,
        )
    }
}

/// A window over a result, for servers that page long answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub fn first(limit: usize) -> Self {
        Self { offset: 0, limit }
    }

    /// The page after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }
}
