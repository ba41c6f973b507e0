//! The single stringly-typed equality used for diffing.
//!
//! Field values are coerced to strings before comparison; an absent row, an
//! absent value, and an empty string all collapse to one blank class. Every
//! equality decision in the comparison engine goes through here, so the
//! documented quirks of that coercion stay patchable in one place.

use crate::model::FieldValue;

/// Coerce a field value to its comparison string.
///
/// Absent values render as `""`. Floats render without a trailing `.0`
/// (a quantity of `2.0` compares equal to a re-entered `2`).
#[must_use]
pub fn normalized(value: Option<FieldValue<'_>>) -> String {
    match value {
        None | Some(FieldValue::Text(None) | FieldValue::Float(None)) => String::new(),
        Some(FieldValue::Text(Some(text))) => text.to_string(),
        Some(FieldValue::Float(Some(number))) => format_number(number),
    }
}

/// Structural equality after string coercion.
#[must_use]
pub fn normalized_eq(a: Option<FieldValue<'_>>, b: Option<FieldValue<'_>>) -> bool {
    normalized(a) == normalized(b)
}

/// Whether a value coerces to the blank class.
#[must_use]
pub fn is_blank(value: Option<FieldValue<'_>>) -> bool {
    normalized(value).is_empty()
}

fn format_number(number: f64) -> String {
    // f64 Display already drops a zero fraction: 2.0 -> "2", 2.5 -> "2.5"
    format!("{number}")
}

#[cfg(test)]
mod tests {
    use super::{is_blank, normalized, normalized_eq};
    use crate::model::FieldValue;

    #[test]
    fn blank_class_collapses() {
        assert_eq!(normalized(None), "");
        assert_eq!(normalized(Some(FieldValue::Text(None))), "");
        assert_eq!(normalized(Some(FieldValue::Float(None))), "");
        assert_eq!(normalized(Some(FieldValue::Text(Some("")))), "");

        assert!(normalized_eq(None, Some(FieldValue::Text(Some("")))));
        assert!(normalized_eq(
            Some(FieldValue::Float(None)),
            Some(FieldValue::Text(None))
        ));
    }

    #[test]
    fn numbers_render_like_display() {
        assert_eq!(normalized(Some(FieldValue::Float(Some(2.0)))), "2");
        assert_eq!(normalized(Some(FieldValue::Float(Some(2.5)))), "2.5");
        assert_eq!(normalized(Some(FieldValue::Float(Some(0.0)))), "0");
        assert_eq!(normalized(Some(FieldValue::Float(Some(-1.25)))), "-1.25");
    }

    #[test]
    fn text_and_number_compare_across_kinds() {
        // a quantity stored as text in one version still matches
        assert!(normalized_eq(
            Some(FieldValue::Text(Some("2"))),
            Some(FieldValue::Float(Some(2.0)))
        ));
        assert!(!normalized_eq(
            Some(FieldValue::Text(Some("白色"))),
            Some(FieldValue::Text(Some("黑色")))
        ));
    }

    #[test]
    fn zero_is_not_blank() {
        assert!(!is_blank(Some(FieldValue::Float(Some(0.0)))));
        assert!(is_blank(Some(FieldValue::Text(Some("")))));
        assert!(is_blank(None));
    }
}
