//! Change attribution: which of the three versions last touched a field.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalize::{is_blank, normalized_eq};
use crate::model::{Field, LineItem};

/// Classification of one field of one aligned row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeSource {
    /// Untouched across all present versions.
    None,
    /// Added or changed during the revision (clerk edit between `submitted`
    /// and `revision` capture).
    Revision,
    /// Added or changed after the revision baseline (the live edit).
    Current,
    /// Both of the above.
    Both,
}

impl ChangeSource {
    const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Revision => "revision",
            Self::Current => "current",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for ChangeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribute one field of one logical row to the version(s) that changed it.
///
/// Row arguments are the (optional) projections of the same logical key out
/// of each version; `None` means the row did not exist in that version.
///
/// The two flags intentionally mirror each other one step apart:
///
/// 1. *revision-modified* — the row was added during revision (`submitted`
///    absent, `revision` present with a non-blank value) or its value changed
///    between `submitted` and `revision`.
/// 2. *current-modified* — the row was added after the revision baseline
///    (`revision` absent, `current` present with a non-blank value) or its
///    value changed between `revision` and `current`.
///
/// When no revision snapshot was ever captured, flag 2 therefore reads every
/// non-blank current value as freshly edited, first-time submissions
/// included. The viewer depends on that reading; keep it.
#[must_use]
pub fn attribute(
    field: Field,
    submitted: Option<&LineItem>,
    revision: Option<&LineItem>,
    current: Option<&LineItem>,
) -> ChangeSource {
    let submitted_val = submitted.map(|row| row.field(field));
    let revision_val = revision.map(|row| row.field(field));
    let current_val = current.map(|row| row.field(field));

    let revision_added = submitted.is_none() && revision.is_some() && !is_blank(revision_val);
    let revision_changed =
        submitted.is_some() && revision.is_some() && !normalized_eq(submitted_val, revision_val);

    let current_added = revision.is_none() && current.is_some() && !is_blank(current_val);
    let current_changed =
        revision.is_some() && current.is_some() && !normalized_eq(revision_val, current_val);

    let revision_modified = revision_added || revision_changed;
    let current_modified = current_added || current_changed;

    match (revision_modified, current_modified) {
        (true, true) => ChangeSource::Both,
        (true, false) => ChangeSource::Revision,
        (false, true) => ChangeSource::Current,
        (false, false) => ChangeSource::None,
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeSource, attribute};
    use crate::model::{Field, LineItem};

    fn item_with_color(color: &str) -> LineItem {
        LineItem {
            color_name: Some(color.to_string()),
            ..LineItem::default()
        }
    }

    fn item_with_height(height: f64) -> LineItem {
        LineItem {
            height: Some(height),
            ..LineItem::default()
        }
    }

    #[test]
    fn all_absent_is_none() {
        assert_eq!(
            attribute(Field::ColorName, None, None, None),
            ChangeSource::None
        );
    }

    #[test]
    fn unchanged_through_all_versions_is_none() {
        let row = item_with_color("白色");
        assert_eq!(
            attribute(Field::ColorName, Some(&row), Some(&row), Some(&row)),
            ChangeSource::None
        );
    }

    #[test]
    fn revision_change_carried_into_current_is_revision() {
        // submitted qty 2, revision qty 5, current qty 5
        let submitted = LineItem {
            quantity: 2.0,
            ..LineItem::default()
        };
        let revised = LineItem {
            quantity: 5.0,
            ..LineItem::default()
        };
        assert_eq!(
            attribute(Field::Quantity, Some(&submitted), Some(&revised), Some(&revised)),
            ChangeSource::Revision
        );
    }

    #[test]
    fn added_in_revision_then_edited_is_both() {
        // no submitted row; clerk added 白 during revision; designer now has 黑
        let revised = item_with_color("白");
        let current = item_with_color("黑");
        assert_eq!(
            attribute(Field::ColorName, None, Some(&revised), Some(&current)),
            ChangeSource::Both
        );
    }

    #[test]
    fn edit_after_revision_baseline_is_current() {
        let baseline = item_with_height(100.0);
        let edited = item_with_height(150.0);
        assert_eq!(
            attribute(
                Field::Height,
                Some(&baseline),
                Some(&baseline),
                Some(&edited)
            ),
            ChangeSource::Current
        );
    }

    #[test]
    fn absent_revision_reads_non_blank_current_as_current() {
        // never pulled back for revision: every populated field reads as a
        // live edit, even when it matches the submitted value
        let row = item_with_height(100.0);
        assert_eq!(
            attribute(Field::Height, Some(&row), None, Some(&row)),
            ChangeSource::Current
        );
    }

    #[test]
    fn absent_revision_blank_current_field_is_none() {
        let row = LineItem::default();
        assert_eq!(
            attribute(Field::Remark, Some(&row), None, Some(&row)),
            ChangeSource::None
        );
    }

    #[test]
    fn blank_added_row_does_not_register() {
        // a revision row exists but the field itself is blank
        let blank = LineItem::default();
        assert_eq!(
            attribute(Field::ColorName, None, Some(&blank), None),
            ChangeSource::None
        );
    }

    #[test]
    fn row_deleted_after_revision_is_none_per_field() {
        // deletion is reported at row level, not via field attribution
        let row = item_with_color("白色");
        assert_eq!(
            attribute(Field::ColorName, Some(&row), Some(&row), None),
            ChangeSource::None
        );
    }

    #[test]
    fn totality_over_presence_combinations() {
        let row = item_with_color("白色");
        for submitted in [None, Some(&row)] {
            for revision in [None, Some(&row)] {
                for current in [None, Some(&row)] {
                    for field in crate::model::Field::ALL {
                        // must classify, never panic
                        let _ = attribute(field, submitted, revision, current);
                    }
                }
            }
        }
    }
}
