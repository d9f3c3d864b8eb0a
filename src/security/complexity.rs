//! Advisory complexity heuristics.
//!
//! Runs on the raw candidate text and never gates execution; the report only
//! annotates the response so the UI can nudge the user.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

use super::SafetyGate;

static LIMIT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)limit\s+\d+").expect("Invalid regex: limit pattern"));

static JOIN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bjoin\b").expect("Invalid regex: join pattern"));

static ON_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bon\b").expect("Invalid regex: on pattern"));

/// A single advisory warning. Displays as a stable code; [`message`] gives
/// the user-facing text.
///
/// [`message`]: ComplexityWarning::message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityWarning {
    NoLimit,
    PossibleCartesianProduct,
}

impl ComplexityWarning {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoLimit => "No LIMIT clause - query might return too many rows",
            Self::PossibleCartesianProduct => "Possible cartesian product - JOIN without ON clause",
        }
    }
}

impl fmt::Display for ComplexityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoLimit => write!(f, "NO_LIMIT"),
            Self::PossibleCartesianProduct => write!(f, "POSSIBLE_CARTESIAN_PRODUCT"),
        }
    }
}

impl Serialize for ComplexityWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Non-blocking advisory report over one candidate query.
///
/// `is_valid` is true iff `warnings` is empty; it is informational and must
/// not be treated as a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityReport {
    pub is_valid: bool,
    pub warnings: Vec<ComplexityWarning>,
}

impl SafetyGate {
    /// Produce advisory warnings for `candidate`.
    ///
    /// Warns when no `limit <n>` clause is present, and when whole-word
    /// `join` occurrences outnumber whole-word `on` occurrences — a crude
    /// proxy for a join missing its ON clause that mis-counts `USING (...)`
    /// joins and `on`-like text inside string literals. Advisory only.
    pub fn assess_complexity(&self, candidate: &str) -> ComplexityReport {
        let mut warnings = Vec::new();

        if !LIMIT_REGEX.is_match(candidate) {
            warnings.push(ComplexityWarning::NoLimit);
        }

        let join_count = JOIN_REGEX.find_iter(candidate).count();
        let on_count = ON_REGEX.find_iter(candidate).count();
        if join_count > on_count {
            warnings.push(ComplexityWarning::PossibleCartesianProduct);
        }

        ComplexityReport {
            is_valid: warnings.is_empty(),
            warnings,
        }
    }
}
