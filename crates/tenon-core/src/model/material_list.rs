use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::line_item::{LineItem, Project};

/// The five lifecycle states of a material list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NotStarted,
    InProgress,
    Revision,
    Submitted,
    Completed,
}

impl Status {
    const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Revision => "revision",
            Self::Submitted => "submitted",
            Self::Completed => "completed",
        }
    }

    /// Whether the designer may edit projects/line items in this state.
    ///
    /// `submitted` is read-only for the designer; the clerk may still quote
    /// prices there (see [`crate::lifecycle::plan_quote`]). `completed` is
    /// terminal.
    #[must_use]
    pub const fn is_editable(self) -> bool {
        matches!(self, Self::NotStarted | Self::InProgress | Self::Revision)
    }

    /// Validate whether a transition from self to `target` is allowed.
    ///
    /// Valid transitions:
    /// - `not_started -> in_progress` (first save)
    /// - `in_progress -> submitted` (submit)
    /// - `submitted -> revision` (clerk pulls back for revision)
    /// - `revision -> submitted` (resubmit)
    /// - `submitted -> completed` (quotation done, terminal)
    pub fn can_transition_to(&self, target: Self) -> Result<(), InvalidTransition> {
        if *self == target {
            return Err(InvalidTransition {
                from: *self,
                to: target,
                reason: "no-op transition is not allowed",
            });
        }

        let allowed = matches!(
            (*self, target),
            (Self::NotStarted, Self::InProgress)
                | (Self::InProgress, Self::Submitted)
                | (Self::Submitted, Self::Revision)
                | (Self::Revision, Self::Submitted)
                | (Self::Submitted, Self::Completed)
        );

        if allowed {
            Ok(())
        } else {
            Err(InvalidTransition {
                from: *self,
                to: target,
                reason: "transition not allowed by lifecycle rules",
            })
        }
    }
}

/// Which price column the clerk quotes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotationType {
    Dealer,
    Owner,
}

impl QuotationType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Dealer => "dealer",
            Self::Owner => "owner",
        }
    }
}

/// The two snapshot roles a material list can own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    /// State captured at the most recent `submit` transition.
    Submitted,
    /// State captured at the most recent `revise` transition (the baseline
    /// just before post-submission edits).
    Revision,
}

impl SnapshotKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Revision => "revision",
        }
    }
}

/// An immutable copy of a material list's projects and line items, captured
/// as a side effect of a lifecycle transition. Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub categories: Vec<LineItem>,
}

/// The quotation document attached to a design order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialList {
    pub id: i64,
    pub order_number: String,
    pub status: Status,
    pub quotation_type: Option<QuotationType>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Error returned when a status transition is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: Status,
    pub to: Status,
    pub reason: &'static str,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid transition {} -> {}: {}",
            self.from, self.to, self.reason
        )
    }
}

impl std::error::Error for InvalidTransition {}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for QuotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for Status {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "revision" => Ok(Self::Revision),
            "submitted" => Ok(Self::Submitted),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                expected: "status",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for QuotationType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "dealer" => Ok(Self::Dealer),
            "owner" => Ok(Self::Owner),
            _ => Err(ParseEnumError {
                expected: "quotation type",
                got: s.to_string(),
            }),
        }
    }
}

impl FromStr for SnapshotKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "submitted" => Ok(Self::Submitted),
            "revision" => Ok(Self::Revision),
            _ => Err(ParseEnumError {
                expected: "snapshot kind",
                got: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidTransition, QuotationType, SnapshotKind, Status};
    use std::str::FromStr;

    #[test]
    fn enum_json_roundtrips() {
        assert_eq!(
            serde_json::to_string(&Status::NotStarted).unwrap(),
            "\"not_started\""
        );
        assert_eq!(
            serde_json::to_string(&QuotationType::Dealer).unwrap(),
            "\"dealer\""
        );
        assert_eq!(
            serde_json::to_string(&SnapshotKind::Revision).unwrap(),
            "\"revision\""
        );

        assert_eq!(
            serde_json::from_str::<Status>("\"in_progress\"").unwrap(),
            Status::InProgress
        );
        assert_eq!(
            serde_json::from_str::<QuotationType>("\"owner\"").unwrap(),
            QuotationType::Owner
        );
        assert_eq!(
            serde_json::from_str::<SnapshotKind>("\"submitted\"").unwrap(),
            SnapshotKind::Submitted
        );
    }

    #[test]
    fn display_parse_roundtrips() {
        for value in [
            Status::NotStarted,
            Status::InProgress,
            Status::Revision,
            Status::Submitted,
            Status::Completed,
        ] {
            let rendered = value.to_string();
            let reparsed = Status::from_str(&rendered).unwrap();
            assert_eq!(value, reparsed);
        }

        for value in [QuotationType::Dealer, QuotationType::Owner] {
            let rendered = value.to_string();
            let reparsed = QuotationType::from_str(&rendered).unwrap();
            assert_eq!(value, reparsed);
        }
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert!(Status::from_str("draft").is_err());
        assert!(QuotationType::from_str("retail").is_err());
        assert!(SnapshotKind::from_str("archived").is_err());
    }

    #[test]
    fn status_transition_rules() {
        assert!(Status::NotStarted
            .can_transition_to(Status::InProgress)
            .is_ok());
        assert!(Status::InProgress
            .can_transition_to(Status::Submitted)
            .is_ok());
        assert!(Status::Submitted
            .can_transition_to(Status::Revision)
            .is_ok());
        assert!(Status::Revision
            .can_transition_to(Status::Submitted)
            .is_ok());
        assert!(Status::Submitted
            .can_transition_to(Status::Completed)
            .is_ok());

        // completed is terminal
        for target in [
            Status::NotStarted,
            Status::InProgress,
            Status::Revision,
            Status::Submitted,
        ] {
            assert!(Status::Completed.can_transition_to(target).is_err());
        }

        assert!(matches!(
            Status::NotStarted.can_transition_to(Status::Revision),
            Err(InvalidTransition {
                from: Status::NotStarted,
                to: Status::Revision,
                ..
            })
        ));

        // no-op transitions are rejected
        assert!(Status::InProgress
            .can_transition_to(Status::InProgress)
            .is_err());
    }

    #[test]
    fn editable_states() {
        assert!(Status::NotStarted.is_editable());
        assert!(Status::InProgress.is_editable());
        assert!(Status::Revision.is_editable());
        assert!(!Status::Submitted.is_editable());
        assert!(!Status::Completed.is_editable());
    }
}
