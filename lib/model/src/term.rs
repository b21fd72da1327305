use crate::ModelError;
use oxrdf::vocab::xsd;
use oxrdf::{
    BlankNode, Literal, NamedNode, NamedNodeRef, NamedOrBlankNode, Subject, Term, TermRef,
};
use oxsdatatypes::{Date, DateTime};
use std::fmt;
use std::str::FromStr;

/// A term rendered in canonical [N-Triples](https://www.w3.org/TR/n-triples/) syntax.
///
/// This is the only representation of terms the store service understands. Converting a
/// [`WireTerm`] to its wire form is a no-op.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WireTerm(String);

impl WireTerm {
    /// Parses `value` as an N-Triples term and keeps its canonical rendering.
    ///
    /// ```
    /// use rdf_relay_model::WireTerm;
    ///
    /// let term = WireTerm::parse("<http://example.com/s>")?;
    /// assert_eq!(term.as_str(), "<http://example.com/s>");
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        let term = Term::from_str(value).map_err(|error| ModelError::InvalidWireTerm {
            value: value.to_owned(),
            error,
        })?;
        Ok(Self::from(term.as_ref()))
    }

    /// Wraps `value` without checking that it is valid N-Triples.
    ///
    /// Strings received from the store service are already canonical and use this constructor.
    #[inline]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Parses the wire string back into an RDF term.
    pub fn decode(&self) -> Result<Term, ModelError> {
        Term::from_str(&self.0).map_err(|error| ModelError::InvalidWireTerm {
            value: self.0.clone(),
            error,
        })
    }
}

impl fmt::Display for WireTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TermRef<'_>> for WireTerm {
    #[inline]
    fn from(term: TermRef<'_>) -> Self {
        Self(term.to_string())
    }
}

impl From<&Term> for WireTerm {
    #[inline]
    fn from(term: &Term) -> Self {
        Self(term.to_string())
    }
}

impl From<NamedNodeRef<'_>> for WireTerm {
    #[inline]
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self(node.to_string())
    }
}

/// A term passed by the caller in subject, predicate, object or context position.
///
/// Either a regular RDF term or a string that is already in canonical wire syntax.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TermArg {
    Term(Term),
    Wire(WireTerm),
}

impl TermArg {
    /// Renders the term in canonical wire syntax.
    ///
    /// Wire strings are returned unchanged, which makes the conversion idempotent.
    pub fn to_wire(&self) -> WireTerm {
        match self {
            TermArg::Term(term) => WireTerm::from(term),
            TermArg::Wire(wire) => wire.clone(),
        }
    }

    /// Returns the RDF term, parsing wire strings if needed.
    pub fn decode(&self) -> Result<Term, ModelError> {
        match self {
            TermArg::Term(term) => Ok(term.clone()),
            TermArg::Wire(wire) => wire.decode(),
        }
    }

    /// Returns the IRI if this term is (or renders to) a named node.
    pub fn as_named_node(&self) -> Option<NamedNode> {
        match self.decode() {
            Ok(Term::NamedNode(node)) => Some(node),
            _ => None,
        }
    }
}

impl fmt::Display for TermArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermArg::Term(term) => term.fmt(f),
            TermArg::Wire(wire) => wire.fmt(f),
        }
    }
}

impl From<Term> for TermArg {
    #[inline]
    fn from(term: Term) -> Self {
        Self::Term(term)
    }
}

impl From<NamedNode> for TermArg {
    #[inline]
    fn from(node: NamedNode) -> Self {
        Self::Term(node.into())
    }
}

impl From<NamedNodeRef<'_>> for TermArg {
    #[inline]
    fn from(node: NamedNodeRef<'_>) -> Self {
        Self::Term(node.into_owned().into())
    }
}

impl From<BlankNode> for TermArg {
    #[inline]
    fn from(node: BlankNode) -> Self {
        Self::Term(node.into())
    }
}

impl From<Literal> for TermArg {
    #[inline]
    fn from(literal: Literal) -> Self {
        Self::Term(literal.into())
    }
}

impl From<Subject> for TermArg {
    #[inline]
    fn from(subject: Subject) -> Self {
        Self::Term(subject.into())
    }
}

impl From<NamedOrBlankNode> for TermArg {
    #[inline]
    fn from(node: NamedOrBlankNode) -> Self {
        match node {
            NamedOrBlankNode::NamedNode(node) => node.into(),
            NamedOrBlankNode::BlankNode(node) => node.into(),
        }
    }
}

impl From<WireTerm> for TermArg {
    #[inline]
    fn from(wire: WireTerm) -> Self {
        Self::Wire(wire)
    }
}

/// A language-native value in object position that still needs a datatype.
///
/// The [`ValueFactory`](crate::ValueFactory) turns raw values into literals.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Date(Date),
    DateTime(DateTime),
}

impl RawValue {
    /// Builds the literal this value stands for when no inlined datatype applies.
    pub fn to_literal(&self) -> Literal {
        match self {
            RawValue::String(value) => Literal::new_simple_literal(value),
            RawValue::Integer(value) => Literal::from(*value),
            RawValue::Double(value) => Literal::from(*value),
            RawValue::Boolean(value) => Literal::from(*value),
            RawValue::Date(value) => Literal::new_typed_literal(value.to_string(), xsd::DATE),
            RawValue::DateTime(value) => {
                Literal::new_typed_literal(value.to_string(), xsd::DATE_TIME)
            }
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Date> for RawValue {
    fn from(value: Date) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime> for RawValue {
    fn from(value: DateTime) -> Self {
        Self::DateTime(value)
    }
}

/// A single value in object position: a term or a raw value.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectValue {
    Term(TermArg),
    Raw(RawValue),
}

/// An inclusive range over object values, used as a range filter when reading statements.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeTerm {
    lower: ObjectValue,
    upper: ObjectValue,
}

impl RangeTerm {
    pub fn new(lower: impl Into<ObjectValue>, upper: impl Into<ObjectValue>) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
        }
    }

    #[inline]
    pub fn lower(&self) -> &ObjectValue {
        &self.lower
    }

    #[inline]
    pub fn upper(&self) -> &ObjectValue {
        &self.upper
    }
}

/// What the caller may pass in object position: a value or a range of values.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectArg {
    Value(ObjectValue),
    Range(RangeTerm),
}

impl ObjectArg {
    #[inline]
    pub fn is_range(&self) -> bool {
        matches!(self, ObjectArg::Range(_))
    }
}

impl From<ObjectValue> for ObjectArg {
    fn from(value: ObjectValue) -> Self {
        Self::Value(value)
    }
}

impl From<RangeTerm> for ObjectArg {
    fn from(range: RangeTerm) -> Self {
        Self::Range(range)
    }
}

impl<L: Into<ObjectValue>, U: Into<ObjectValue>> From<(L, U)> for ObjectArg {
    fn from((lower, upper): (L, U)) -> Self {
        Self::Range(RangeTerm::new(lower, upper))
    }
}

macro_rules! implement_object_from_term {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ObjectValue {
                fn from(value: $t) -> Self {
                    Self::Term(value.into())
                }
            }

            impl From<$t> for ObjectArg {
                fn from(value: $t) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

macro_rules! implement_object_from_raw {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ObjectValue {
                fn from(value: $t) -> Self {
                    Self::Raw(value.into())
                }
            }

            impl From<$t> for ObjectArg {
                fn from(value: $t) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

implement_object_from_term!(
    TermArg,
    Term,
    NamedNode,
    NamedNodeRef<'_>,
    BlankNode,
    Literal,
    WireTerm
);
implement_object_from_raw!(RawValue, &str, String, i64, i32, f64, bool, Date, DateTime);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_term_parse_is_canonical() {
        let term = WireTerm::parse("\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>").unwrap();
        assert_eq!(
            term.as_str(),
            "\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(WireTerm::parse(term.as_str()).unwrap(), term);
    }

    #[test]
    fn wire_term_parse_rejects_garbage() {
        assert!(matches!(
            WireTerm::parse("not a term"),
            Err(ModelError::InvalidWireTerm { .. })
        ));
    }

    #[test]
    fn term_arg_to_wire_is_idempotent() {
        let args = [
            TermArg::from(NamedNode::new_unchecked("http://example.com/s")),
            TermArg::from(Literal::new_language_tagged_literal_unchecked("chat", "fr")),
            TermArg::from(Literal::from(12)),
            TermArg::from(BlankNode::new_unchecked("b1")),
        ];
        for arg in args {
            let once = arg.to_wire();
            let twice = TermArg::from(once.clone()).to_wire();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn raw_values_become_xsd_literals() {
        assert_eq!(RawValue::from(42).to_literal(), Literal::from(42_i64));
        assert_eq!(
            RawValue::from("abc").to_literal(),
            Literal::new_simple_literal("abc")
        );
        assert_eq!(
            RawValue::from(true).to_literal().datatype(),
            xsd::BOOLEAN
        );
        let date = Date::from_str("2008-01-01").unwrap();
        assert_eq!(RawValue::from(date).to_literal().datatype(), xsd::DATE);
    }

    #[test]
    fn pair_converts_to_range() {
        let object = ObjectArg::from((1, 10));
        assert!(object.is_range());
        assert!(!ObjectArg::from(1).is_range());
    }
}
