//! Conversion of caller-supplied terms and context selectors into their wire form.
//!
//! Every request sent to a store service goes through these functions, which makes them the
//! single place where the four context cases are told apart:
//!
//! | Selector                   | `null_if_absent` | Wire form            |
//! |----------------------------|------------------|----------------------|
//! | `None`                     | `false`          | [`WireContexts::All`] |
//! | `None`                     | `true`           | `Only([Null])`       |
//! | `Some(All)`                | any              | [`WireContexts::All`] |
//! | `Some(Null)`               | any              | `Only([Null])`       |
//! | `Some(Single)`/`Some(Set)` | any              | `Only(..)`           |

use crate::{
    Context, ContextSelector, ModelError, ObjectArg, TermArg, ValueFactory, WireContext,
    WireContexts, WireTerm,
};
use std::fmt;

/// An object position in wire form: a single term or an inclusive range.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WireObject {
    Term(WireTerm),
    Range { lower: WireTerm, upper: WireTerm },
}

impl WireObject {
    /// The term or the lower bound of the range.
    pub fn start(&self) -> &WireTerm {
        match self {
            WireObject::Term(term) => term,
            WireObject::Range { lower, .. } => lower,
        }
    }

    /// The upper bound, only present for ranges.
    pub fn end(&self) -> Option<&WireTerm> {
        match self {
            WireObject::Term(_) => None,
            WireObject::Range { upper, .. } => Some(upper),
        }
    }
}

impl fmt::Display for WireObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireObject::Term(term) => term.fmt(f),
            WireObject::Range { lower, upper } => write!(f, "[{lower}, {upper}]"),
        }
    }
}

/// Renders a term in wire syntax. Absent terms stay absent and act as wildcards.
pub fn term_to_wire(term: Option<&TermArg>) -> Option<WireTerm> {
    term.map(TermArg::to_wire)
}

/// Renders an object, coercing values through the predicate-aware `factory`.
///
/// Range bounds are coerced independently and without the predicate.
pub fn object_term_to_wire(
    object: Option<&ObjectArg>,
    predicate: Option<&TermArg>,
    factory: &ValueFactory,
) -> Result<Option<WireObject>, ModelError> {
    let Some(object) = object else {
        return Ok(None);
    };
    Ok(Some(match object {
        ObjectArg::Value(value) => {
            WireObject::Term(factory.object_position_term(value, predicate)?.to_wire())
        }
        ObjectArg::Range(range) => WireObject::Range {
            lower: factory.object_position_term(range.lower(), None)?.to_wire(),
            upper: factory.object_position_term(range.upper(), None)?.to_wire(),
        },
    }))
}

/// Renders a single context, mapping [`Context::Null`] to the null marker.
pub fn context_to_wire(context: &Context) -> WireContext {
    match context {
        Context::Null => WireContext::Null,
        Context::Named(term) => WireContext::Term(term.to_wire()),
    }
}

/// Renders a context selector.
///
/// `null_if_absent` decides what a missing selector means: the null marker for writes that
/// default to "no context", every context otherwise. An empty set counts as a missing selector.
pub fn contexts_to_wire(contexts: Option<&ContextSelector>, null_if_absent: bool) -> WireContexts {
    let absent = || {
        if null_if_absent {
            WireContexts::Only(vec![WireContext::Null])
        } else {
            WireContexts::All
        }
    };
    match contexts {
        None => absent(),
        Some(ContextSelector::All) => WireContexts::All,
        Some(ContextSelector::Null) => WireContexts::Only(vec![WireContext::Null]),
        Some(ContextSelector::Single(context)) => WireContexts::Only(vec![context_to_wire(context)]),
        Some(ContextSelector::Set(contexts)) if contexts.is_empty() => absent(),
        Some(ContextSelector::Set(contexts)) => {
            WireContexts::Only(contexts.iter().map(context_to_wire).collect())
        }
    }
}
