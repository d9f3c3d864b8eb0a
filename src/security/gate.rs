//! The admit/reject verdict over candidate SQL.
//!
//! A query is admitted only when, after normalization, it starts with
//! `select`, contains no write keyword as a standalone lexical word, matches
//! no stacked-query or UNION-injection pattern, and the raw text holds at
//! most one statement terminator. These properties are necessary but not
//! sufficient for true SQL safety; the gate fails closed on anything
//! ambiguous.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, warn};

/// Keywords that could modify data or schema. Matched as whole lexical words
/// only, so identifiers like `updated_at` never trigger.
const FORBIDDEN_KEYWORDS: [&str; 17] = [
    "insert", "update", "delete", "drop", "alter", "truncate", "create", "replace", "grant",
    "revoke", "exec", "execute", "pragma", "attach", "detach", "vacuum", "merge",
];

/// Regex for stripping line comments (`--` to end of line).
static LINE_COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--[^\n]*").expect("Invalid regex: line comment pattern"));

/// Regex for stripping block comments (`/* */`, non-greedy, spans newlines).
static BLOCK_COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("Invalid regex: block comment pattern"));

/// Regex for collapsing whitespace runs.
static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace pattern"));

/// Word-boundary regexes for each forbidden keyword, applied to the
/// normalized (lowercased) text. `_` is a word character, so a keyword
/// embedded in a longer identifier does not match.
static KEYWORD_REGEXES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    FORBIDDEN_KEYWORDS
        .iter()
        .map(|kw| {
            let re = Regex::new(&format!(r"\b{kw}\b")).expect("Invalid regex: keyword pattern");
            (*kw, re)
        })
        .collect()
});

/// Statement separator followed by another statement verb (stacked-query
/// injection). Checked on the normalized text.
static STACKED_QUERY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r";\s*(select|drop|delete|update|insert)")
        .expect("Invalid regex: stacked query pattern")
});

/// `union ... select ... from` anywhere in the normalized text (heuristic
/// UNION-injection screen).
static UNION_SELECT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"union.*select.*from").expect("Invalid regex: union select pattern"));

/// Normalize candidate SQL for screening: strip line and block comments,
/// collapse whitespace runs to single spaces, trim, lowercase.
///
/// Every check except the statement-terminator count runs on this form, so
/// keyword detection cannot be evaded by comment-splitting or case variation.
/// Normalization is idempotent.
pub fn normalize(candidate: &str) -> String {
    let stripped = LINE_COMMENT_REGEX.replace_all(candidate, "");
    let stripped = BLOCK_COMMENT_REGEX.replace_all(&stripped, "");
    WHITESPACE_REGEX
        .replace_all(&stripped, " ")
        .trim()
        .to_lowercase()
}

/// Identifier for a suspicious-pattern rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternId {
    StackedQuery,
    UnionSelect,
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackedQuery => write!(f, "stacked_query"),
            Self::UnionSelect => write!(f, "union_select"),
        }
    }
}

/// A single rejection reason. Displays as a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Input was empty or normalized to the empty string.
    Empty,
    /// Normalized text does not start with `select`.
    NotASelect,
    /// A forbidden keyword appeared as a whole lexical word.
    ForbiddenKeyword(&'static str),
    /// A stacked-query or UNION-injection pattern matched.
    SuspiciousPattern(PatternId),
    /// More than one `;` in the raw, unnormalized text.
    MultipleStatements,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "EMPTY_OR_NOT_STRING"),
            Self::NotASelect => write!(f, "NOT_A_SELECT"),
            Self::ForbiddenKeyword(word) => write!(f, "FORBIDDEN_KEYWORD:{word}"),
            Self::SuspiciousPattern(id) => write!(f, "SUSPICIOUS_PATTERN:{id}"),
            Self::MultipleStatements => write!(f, "MULTIPLE_STATEMENTS"),
        }
    }
}

impl Serialize for RejectReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Admission decision for one candidate query.
///
/// Produced fresh per [`SafetyGate::validate`] call; `reasons` is empty iff
/// `admitted`, ordered by check (the first element is the first failing
/// check).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub admitted: bool,
    pub reasons: Vec<RejectReason>,
}

impl Verdict {
    fn admitted() -> Self {
        Self {
            admitted: true,
            reasons: vec![],
        }
    }

    fn rejected(reasons: Vec<RejectReason>) -> Self {
        debug_assert!(!reasons.is_empty());
        Self {
            admitted: false,
            reasons,
        }
    }

    pub fn is_admitted(&self) -> bool {
        self.admitted
    }

    /// The first failing reason, if any.
    pub fn first_reason(&self) -> Option<&RejectReason> {
        self.reasons.first()
    }

    /// All reason codes joined for display and logging.
    pub fn reason_summary(&self) -> String {
        self.reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Lexical safety gate for AI-generated SQL.
///
/// Pure and stateless: safe to share and call concurrently, holds no locks,
/// performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyGate;

impl SafetyGate {
    pub fn new() -> Self {
        Self
    }

    /// Decide whether `candidate` is safe to execute as a read-only statement.
    ///
    /// Checks run in a fixed order and all failures accumulate: leading
    /// `select` token, forbidden keywords (in list order), suspicious
    /// patterns, then the statement-terminator count on the raw text. Exactly
    /// one trailing semicolon is tolerated.
    ///
    /// Comments are stripped before scanning, so a forbidden word living
    /// entirely inside a comment is removed rather than rejected; the deleted
    /// text cannot execute.
    pub fn validate(&self, candidate: &str) -> Verdict {
        let normalized = normalize(candidate);
        if normalized.is_empty() {
            return Verdict::rejected(vec![RejectReason::Empty]);
        }

        let mut reasons = Vec::new();

        if !normalized.starts_with("select") {
            reasons.push(RejectReason::NotASelect);
        }

        for (keyword, regex) in KEYWORD_REGEXES.iter() {
            if regex.is_match(&normalized) {
                warn!(keyword, "forbidden keyword in candidate SQL");
                reasons.push(RejectReason::ForbiddenKeyword(keyword));
            }
        }

        if STACKED_QUERY_REGEX.is_match(&normalized) {
            warn!("stacked-query pattern in candidate SQL");
            reasons.push(RejectReason::SuspiciousPattern(PatternId::StackedQuery));
        }
        if UNION_SELECT_REGEX.is_match(&normalized) {
            warn!("union-select pattern in candidate SQL");
            reasons.push(RejectReason::SuspiciousPattern(PatternId::UnionSelect));
        }

        // Counted on the raw text: normalization never removes semicolons,
        // but the tolerance is for what the caller actually sent.
        if candidate.matches(';').count() > 1 {
            reasons.push(RejectReason::MultipleStatements);
        }

        if reasons.is_empty() {
            debug!("candidate SQL admitted");
            Verdict::admitted()
        } else {
            Verdict::rejected(reasons)
        }
    }
}
