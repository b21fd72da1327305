use oxrdf::{NamedNode, TermParseError};
use thiserror::Error;

/// An error raised while building or normalizing terms.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A string passed as a wire term is not valid N-Triples term syntax.
    #[error("Invalid wire term '{value}': {error}")]
    InvalidWireTerm {
        /// The offending string.
        value: String,
        /// The parsing error.
        #[source]
        error: TermParseError,
    },
    /// A value could not be typed with the datatype required by the value factory.
    #[error("'{value}' is not a valid lexical form for {datatype}")]
    InvalidLexicalForm {
        /// The lexical form.
        value: String,
        /// The target datatype.
        datatype: NamedNode,
    },
    /// A term of the wrong kind was found, for example a literal in subject position.
    #[error("Expected {expected}, found {found}")]
    UnexpectedTerm {
        /// What the position accepts.
        expected: &'static str,
        /// The canonical rendering of the term.
        found: String,
    },
}

impl ModelError {
    pub(crate) fn unexpected_term(expected: &'static str, found: impl ToString) -> Self {
        Self::UnexpectedTerm {
            expected,
            found: found.to_string(),
        }
    }
}
