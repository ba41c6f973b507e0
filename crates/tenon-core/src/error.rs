use thiserror::Error;

use crate::model::{SnapshotKind, Status};

/// Machine-readable error codes for UI and agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    MaterialListNotFound,
    InvalidStatusTransition,
    MissingRequiredField,
    MissingSubmittedSnapshot,
    InvalidEnumValue,
    StaleWrite,
    StoreWriteFailed,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::MaterialListNotFound => "E2001",
            Self::InvalidStatusTransition => "E2002",
            Self::MissingRequiredField => "E2003",
            Self::MissingSubmittedSnapshot => "E2004",
            Self::InvalidEnumValue => "E2005",
            Self::StaleWrite => "E3001",
            Self::StoreWriteFailed => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Workspace not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::MaterialListNotFound => "Material list not found",
            Self::InvalidStatusTransition => "Invalid status transition",
            Self::MissingRequiredField => "Missing required line-item field",
            Self::MissingSubmittedSnapshot => "No submitted snapshot",
            Self::InvalidEnumValue => "Invalid status/type value",
            Self::StaleWrite => "Material list changed underneath this write",
            Self::StoreWriteFailed => "Store write failed",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `tn init` to initialize this workspace."),
            Self::ConfigParseError => Some("Fix syntax in .tenon/config.toml and retry."),
            Self::MaterialListNotFound => None,
            Self::InvalidStatusTransition => Some(
                "Follow valid transitions: not_started -> in_progress -> submitted -> revision -> submitted -> completed.",
            ),
            Self::MissingRequiredField => {
                Some("Every line item needs both category levels and a positive quantity.")
            }
            Self::MissingSubmittedSnapshot => {
                Some("Submit the material list before revising or completing it.")
            }
            Self::InvalidEnumValue => Some("Use one of the documented status/type values."),
            Self::StaleWrite => Some("Reload the material list and retry the transition."),
            Self::StoreWriteFailed => Some("Check disk space and write permissions."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors surfaced by lifecycle transitions.
///
/// Comparison and attribution are total functions and never produce these;
/// malformed line items are diffed as-is.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("material list '{0}' not found")]
    NotFound(String),

    #[error("invalid transition {from} -> {to}")]
    InvalidTransition { from: Status, to: Status },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("no {0} snapshot exists for this material list")]
    MissingSnapshot(SnapshotKind),

    #[error("material list was modified by another actor")]
    Conflict,

    #[error("store error: {0}")]
    Store(String),
}

impl LifecycleError {
    /// Map onto the stable machine-readable code table.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::MaterialListNotFound,
            Self::InvalidTransition { .. } => ErrorCode::InvalidStatusTransition,
            Self::Validation(_) => ErrorCode::MissingRequiredField,
            Self::MissingSnapshot(_) => ErrorCode::MissingSubmittedSnapshot,
            Self::Conflict => ErrorCode::StaleWrite,
            Self::Store(_) => ErrorCode::StoreWriteFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorCode, LifecycleError};
    use crate::model::{SnapshotKind, Status};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::NotInitialized,
            ErrorCode::ConfigParseError,
            ErrorCode::MaterialListNotFound,
            ErrorCode::InvalidStatusTransition,
            ErrorCode::MissingRequiredField,
            ErrorCode::MissingSubmittedSnapshot,
            ErrorCode::InvalidEnumValue,
            ErrorCode::StaleWrite,
            ErrorCode::StoreWriteFailed,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::StaleWrite.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn lifecycle_errors_map_to_codes() {
        assert_eq!(
            LifecycleError::NotFound("F-1001".into()).code(),
            ErrorCode::MaterialListNotFound
        );
        assert_eq!(
            LifecycleError::InvalidTransition {
                from: Status::Completed,
                to: Status::Revision,
            }
            .code(),
            ErrorCode::InvalidStatusTransition
        );
        assert_eq!(
            LifecycleError::MissingSnapshot(SnapshotKind::Submitted).code(),
            ErrorCode::MissingSubmittedSnapshot
        );
        assert_eq!(LifecycleError::Conflict.code(), ErrorCode::StaleWrite);
    }
}
