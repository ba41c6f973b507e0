//! Line-item validation applied at the `submit` transition.
//!
//! Comparison never validates: malformed rows are diffed as-is. Only the
//! lifecycle refuses to submit an incomplete quotation.

use crate::error::LifecycleError;
use crate::model::LineItem;

/// Check that every line item carries both category levels and a positive
/// quantity.
///
/// # Errors
///
/// Returns [`LifecycleError::Validation`] naming the first offending row.
pub fn validate_line_items(items: &[LineItem]) -> Result<(), LifecycleError> {
    for (index, item) in items.iter().enumerate() {
        if item.level1_category_id == 0 || item.level2_category_id == 0 {
            return Err(LifecycleError::Validation(format!(
                "line item {} is missing its category pair",
                index + 1
            )));
        }
        if item.quantity <= 0.0 {
            return Err(LifecycleError::Validation(format!(
                "line item {} needs a positive quantity",
                index + 1
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_line_items;
    use crate::error::LifecycleError;
    use crate::model::LineItem;

    fn valid_item() -> LineItem {
        LineItem {
            level1_category_id: 1,
            level2_category_id: 2,
            quantity: 1.0,
            ..LineItem::default()
        }
    }

    #[test]
    fn accepts_complete_items() {
        assert!(validate_line_items(&[valid_item(), valid_item()]).is_ok());
        assert!(validate_line_items(&[]).is_ok());
    }

    #[test]
    fn rejects_missing_category_pair() {
        let mut item = valid_item();
        item.level2_category_id = 0;
        let err = validate_line_items(&[valid_item(), item]).unwrap_err();
        assert!(matches!(err, LifecycleError::Validation(msg) if msg.contains("line item 2")));
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let mut item = valid_item();
        item.quantity = 0.0;
        assert!(validate_line_items(&[item]).is_err());

        let mut negative = valid_item();
        negative.quantity = -3.0;
        assert!(validate_line_items(&[negative]).is_err());
    }
}
