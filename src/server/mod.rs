//! Request handling: orchestration and HTTP-facing types.

pub mod handler;

pub use handler::{QueryService, QueryServiceBuilder};

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// Incoming natural-language query request.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

/// Successful query response.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// The admitted SQL, as shown to the user (no trailing semicolon).
    pub sql: String,
    pub columns: Vec<String>,
    pub data: Vec<crate::database::Row>,
    pub row_count: usize,
    pub execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Advisory complexity warnings. Informational only, never a reason the
    /// query did not run.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Client-facing error body with an HTTP-style status code.
///
/// A gate rejection or execution failure carries the offending SQL and, when
/// available, a hint — a client error, never a server fault.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl From<&Error> for ErrorResponse {
    fn from(error: &Error) -> Self {
        match error {
            Error::UnsafeSql { sql, verdict } => Self {
                status: error.status(),
                error: "Generated SQL contains unsafe operations. Only SELECT queries are allowed."
                    .into(),
                sql: Some(sql.clone()),
                hint: None,
                reasons: verdict.reasons.iter().map(ToString::to_string).collect(),
            },
            Error::Execution { sql, source } => Self {
                status: error.status(),
                error: format!("Database error: {source}"),
                sql: Some(sql.clone()),
                hint: source.hint().map(Into::into),
                reasons: vec![],
            },
            other => Self {
                status: other.status(),
                error: other.to_string(),
                sql: None,
                hint: None,
                reasons: vec![],
            },
        }
    }
}
