use crate::{is_valid_lexical_form, ModelError, ObjectValue, TermArg};
use oxrdf::vocab::rdf;
use oxrdf::{Literal, NamedNode, Term};
use rustc_hash::FxHashMap;

/// Turns raw object values into literals and applies the repository's inlined datatypes.
///
/// Some stores store the objects of certain predicates (or of certain datatypes) with a fixed
/// datatype. A raw `"42"` used with such a predicate must be sent as a literal of the
/// registered datatype, otherwise it does not match what the store holds.
///
/// ```
/// use rdf_relay_model::{NamedNode, ObjectValue, TermArg, ValueFactory};
/// use rdf_relay_model::vocab::xsd;
///
/// let age = NamedNode::new("http://example.com/age")?;
/// let mut factory = ValueFactory::default();
/// factory.register_inlined_predicate(age.clone(), xsd::INTEGER.into_owned());
///
/// let term = factory.object_position_term(&ObjectValue::from("42"), Some(&TermArg::from(age)))?;
/// assert_eq!(
///     term.to_wire().as_str(),
///     "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
/// );
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ValueFactory {
    inlined_predicates: FxHashMap<NamedNode, NamedNode>,
    inlined_datatypes: FxHashMap<NamedNode, NamedNode>,
}

impl ValueFactory {
    /// Registers that the objects of `predicate` are stored with `datatype`.
    ///
    /// Returns the previously registered datatype, if any.
    pub fn register_inlined_predicate(
        &mut self,
        predicate: NamedNode,
        datatype: NamedNode,
    ) -> Option<NamedNode> {
        self.inlined_predicates.insert(predicate, datatype)
    }

    /// Registers that literals of datatype `from` are stored with datatype `to`.
    pub fn register_inlined_datatype(&mut self, from: NamedNode, to: NamedNode) -> Option<NamedNode> {
        self.inlined_datatypes.insert(from, to)
    }

    pub fn inlined_predicate(&self, predicate: &NamedNode) -> Option<&NamedNode> {
        self.inlined_predicates.get(predicate)
    }

    pub fn inlined_datatype(&self, datatype: &NamedNode) -> Option<&NamedNode> {
        self.inlined_datatypes.get(datatype)
    }

    /// Resolves a value in object position into a term.
    ///
    /// Wire strings are trusted and passed through, IRIs and blank nodes are returned unchanged,
    /// raw values become literals, and literals are re-typed if `predicate` (or the literal's own
    /// datatype) has an inlined datatype.
    pub fn object_position_term(
        &self,
        value: &ObjectValue,
        predicate: Option<&TermArg>,
    ) -> Result<TermArg, ModelError> {
        match value {
            ObjectValue::Term(TermArg::Term(Term::Literal(literal))) => {
                Ok(self.inline_literal(literal.clone(), predicate)?.into())
            }
            ObjectValue::Term(term) => Ok(term.clone()),
            ObjectValue::Raw(raw) => Ok(self.inline_literal(raw.to_literal(), predicate)?.into()),
        }
    }

    fn inline_literal(
        &self,
        literal: Literal,
        predicate: Option<&TermArg>,
    ) -> Result<Literal, ModelError> {
        if literal.language().is_some() {
            return Ok(literal);
        }
        let by_predicate = predicate
            .and_then(TermArg::as_named_node)
            .and_then(|predicate| self.inlined_predicates.get(&predicate).cloned());
        let target = by_predicate.or_else(|| {
            self.inlined_datatypes
                .get(&literal.datatype().into_owned())
                .cloned()
        });
        let Some(target) = target else {
            return Ok(literal);
        };
        if literal.datatype() == target.as_ref() || target.as_ref() == rdf::LANG_STRING {
            return Ok(literal);
        }
        if !is_valid_lexical_form(literal.value(), target.as_ref()) {
            return Err(ModelError::InvalidLexicalForm {
                value: literal.value().to_owned(),
                datatype: target,
            });
        }
        Ok(Literal::new_typed_literal(literal.value(), target))
    }
}
