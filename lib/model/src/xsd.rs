use oxrdf::vocab::xsd;
use oxrdf::NamedNodeRef;
use oxsdatatypes::{Boolean, Date, DateTime, Decimal, Double, Float, Integer};
use std::cmp::Ordering;
use std::str::FromStr;

/// Checks if the datatype is derived from `xsd:integer`.
pub fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    static INTEGER_DATATYPES: &[NamedNodeRef<'_>; 13] = &[
        xsd::INTEGER,
        xsd::BYTE,
        xsd::SHORT,
        xsd::INT,
        xsd::LONG,
        xsd::UNSIGNED_BYTE,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_LONG,
        xsd::POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::NON_NEGATIVE_INTEGER,
    ];
    INTEGER_DATATYPES.contains(&datatype)
}

/// Checks if the datatype is one of the numeric XSD datatypes.
pub fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
    is_integer_datatype(datatype)
        || datatype == xsd::DECIMAL
        || datatype == xsd::DOUBLE
        || datatype == xsd::FLOAT
}

fn is_exact_datatype(datatype: NamedNodeRef<'_>) -> bool {
    is_integer_datatype(datatype) || datatype == xsd::DECIMAL
}

/// Checks that `value` is a valid lexical form of `datatype`.
///
/// Only the datatypes the value factory produces are checked, every other datatype is accepted.
pub fn is_valid_lexical_form(value: &str, datatype: NamedNodeRef<'_>) -> bool {
    if is_integer_datatype(datatype) {
        Integer::from_str(value).is_ok()
    } else if datatype == xsd::DECIMAL {
        Decimal::from_str(value).is_ok()
    } else if datatype == xsd::DOUBLE {
        Double::from_str(value).is_ok()
    } else if datatype == xsd::FLOAT {
        Float::from_str(value).is_ok()
    } else if datatype == xsd::BOOLEAN {
        Boolean::from_str(value).is_ok()
    } else if datatype == xsd::DATE_TIME {
        DateTime::from_str(value).is_ok()
    } else if datatype == xsd::DATE {
        Date::from_str(value).is_ok()
    } else {
        true
    }
}

/// Compares two typed values.
///
/// Numbers are compared by value across the numeric datatypes. Integers and decimals compare
/// exactly, a float or double on either side makes it a double comparison. Dates and date-times
/// compare by their timeline position, and any other pair of equal datatypes by lexical form.
/// Returns [`None`] for incomparable values.
pub fn compare_typed_values(
    (a, a_type): (&str, NamedNodeRef<'_>),
    (b, b_type): (&str, NamedNodeRef<'_>),
) -> Option<Ordering> {
    if is_numeric_datatype(a_type) && is_numeric_datatype(b_type) {
        if is_exact_datatype(a_type) && is_exact_datatype(b_type) {
            if let (Ok(a), Ok(b)) = (Decimal::from_str(a), Decimal::from_str(b)) {
                return a.partial_cmp(&b);
            }
        }
        let a = Double::from_str(a).ok()?;
        let b = Double::from_str(b).ok()?;
        return a.partial_cmp(&b);
    }
    if a_type != b_type {
        return None;
    }
    if a_type == xsd::DATE_TIME {
        DateTime::from_str(a)
            .ok()?
            .partial_cmp(&DateTime::from_str(b).ok()?)
    } else if a_type == xsd::DATE {
        Date::from_str(a).ok()?.partial_cmp(&Date::from_str(b).ok()?)
    } else {
        Some(a.cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_across_datatypes() {
        assert_eq!(
            compare_typed_values(("2", xsd::INTEGER), ("10.5", xsd::DECIMAL)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_typed_values(("1e1", xsd::DOUBLE), ("10", xsd::INT)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn large_integers_compare_exactly() {
        assert_eq!(
            compare_typed_values(
                ("9007199254740993", xsd::INTEGER),
                ("9007199254740992", xsd::LONG)
            ),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_typed_values(
                ("9007199254740993", xsd::INTEGER),
                ("9007199254740993.0", xsd::DECIMAL)
            ),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn mixed_kinds_are_incomparable() {
        assert_eq!(
            compare_typed_values(("2", xsd::INTEGER), ("2", xsd::STRING)),
            None
        );
    }

    #[test]
    fn dates_compare_on_the_timeline() {
        assert_eq!(
            compare_typed_values(("2008-01-02", xsd::DATE), ("2008-01-10", xsd::DATE)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn lexical_forms_are_checked() {
        assert!(is_valid_lexical_form("42", xsd::INTEGER));
        assert!(!is_valid_lexical_form("forty-two", xsd::INTEGER));
        assert!(is_valid_lexical_form("anything", xsd::STRING));
    }
}
