//! Error types for the query service.
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `From` conversions.
//!
//! The safety gate itself never produces an error: a rejected query is a
//! normal [`Verdict`](crate::security::Verdict), not a fault. The types here
//! cover everything around the gate — request validation, configuration,
//! generation, and execution.

use crate::security::Verdict;
use std::borrow::Cow;
use thiserror::Error;

/// Main error type for the query service.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid question: {0}")]
    Question(#[from] QuestionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// The generated SQL failed the safety gate. Carries the offending SQL so
    /// callers can surface it alongside the reason codes.
    #[error("Unsafe SQL rejected: {}", .verdict.reason_summary())]
    UnsafeSql { sql: String, verdict: Verdict },

    /// Execution of an admitted query failed. Carries the SQL for the
    /// client-facing error body.
    #[error("Query execution failed: {source}")]
    Execution {
        sql: String,
        #[source]
        source: DatabaseError,
    },
}

impl Error {
    /// HTTP-style status code for this error.
    ///
    /// Rejections and execution failures are client errors, never server
    /// faults; only configuration and generation problems map to 5xx.
    pub fn status(&self) -> u16 {
        match self {
            Self::Question(_) => 400,
            Self::Config(_) => 500,
            Self::Generation(GenerationError::ServiceUnavailable(_)) => 503,
            Self::Generation(_) => 500,
            Self::Database(_) => 500,
            Self::UnsafeSql { .. } => 400,
            Self::Execution { .. } => 400,
        }
    }
}

/// Errors in the user-supplied question, caught before any generation.
#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("question is required and must be a non-empty string")]
    Missing,

    #[error("question is too long (max {max} characters)")]
    TooLong { max: usize },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(Cow<'static, str>),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue {
        field: Cow<'static, str>,
        message: Cow<'static, str>,
    },

    #[error("Environment variable not found: {0}")]
    EnvNotFound(String),
}

/// Errors from the SQL generation collaborator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("AI failed to generate SQL: {0}")]
    Failed(String),

    #[error("AI returned an empty response")]
    EmptyResponse,

    #[error("AI service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Database-related errors from the execution and introspection collaborators.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Query execution failed: {message}")]
    QueryFailed {
        message: String,
        /// SQLSTATE code reported by the database, when available.
        code: Option<String>,
    },

    #[error("Query timeout after {0}ms")]
    Timeout(u64),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Schema introspection failed: {0}")]
    Introspection(String),
}

impl DatabaseError {
    /// Human-readable hint for common Postgres failure codes, surfaced to the
    /// end user alongside the failing SQL.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::QueryFailed { code, .. } => Some(match code.as_deref() {
                Some("42703") => {
                    "Column does not exist. Remember: use snake_case (order_date, not orderDate). \
                     Check the schema for exact column names."
                }
                Some("42P01") => {
                    "Table does not exist. Check the schema for available table names."
                }
                Some("42601") => {
                    "Syntax error in SQL. Check for missing commas, parentheses, or keywords."
                }
                _ => "Check if column names and table references are correct",
            }),
            _ => None,
        }
    }
}

/// Result type alias for Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for DatabaseError.
pub type DbResult<T> = std::result::Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Question(QuestionError::Missing).status(), 400);
        assert_eq!(
            Error::Config(ConfigError::EnvNotFound("GEMINI_API_KEY".into())).status(),
            500
        );
        assert_eq!(
            Error::Generation(GenerationError::Failed("boom".into())).status(),
            500
        );
        assert_eq!(
            Error::Generation(GenerationError::ServiceUnavailable("quota".into())).status(),
            503
        );
        assert_eq!(
            Error::Execution {
                sql: "select 1".into(),
                source: DatabaseError::Timeout(30000),
            }
            .status(),
            400
        );
    }

    #[test]
    fn test_error_conversion() {
        let db_error = DatabaseError::ConnectionFailed("refused".into());
        let error: Error = db_error.into();
        assert!(matches!(error, Error::Database(_)));
    }

    #[test]
    fn test_database_hints() {
        let missing_column = DatabaseError::QueryFailed {
            message: "column \"orderDate\" does not exist".into(),
            code: Some("42703".into()),
        };
        assert!(missing_column.hint().unwrap().contains("snake_case"));

        let missing_table = DatabaseError::QueryFailed {
            message: "relation \"user\" does not exist".into(),
            code: Some("42P01".into()),
        };
        assert!(missing_table.hint().unwrap().contains("Table does not exist"));

        let unknown = DatabaseError::QueryFailed {
            message: "something else".into(),
            code: None,
        };
        assert!(unknown.hint().unwrap().contains("column names"));

        assert!(DatabaseError::Timeout(100).hint().is_none());
    }
}
