//! Outcome states and how they combine.

use serde::{Deserialize, Serialize};

/// Outcome of a substep, step or whole report.
///
/// Variants are declared in aggregation order, so the derived `Ord` is the
/// "badness" order: `Failure > Warning > Success > Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unknown,
    Success,
    Warning,
    Failure,
}

impl Status {
    /// The worse of two statuses.
    #[must_use]
    pub fn worse(self, other: Status) -> Status {
        self.max(other)
    }

    /// Fold statuses into their aggregate. Empty input yields `Unknown`.
    pub fn fold<I>(statuses: I) -> Status
    where
        I: IntoIterator<Item = Status>,
    {
        statuses.into_iter().fold(Status::Unknown, Status::worse)
    }

    /// The status after a downgrade: `Failure` becomes `Warning`, anything
    /// else is returned unchanged.
    #[must_use]
    pub fn downgraded(self) -> Status {
        match self {
            Status::Failure => Status::Warning,
            other => other,
        }
    }

    pub fn is_failure(self) -> bool {
        self == Status::Failure
    }

    /// Marker used by the markdown renderer.
    pub fn marker(self) -> &'static str {
        match self {
            Status::Unknown => "❔",
            Status::Success => "✅",
            Status::Warning => "⚠️",
            Status::Failure => "❌",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Unknown => "unknown",
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Failure => "failure",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
