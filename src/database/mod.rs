//! Query execution seam and result types.
//!
//! The service never talks to a database directly: admitted SQL goes through
//! the [`QueryExecutor`] trait, implemented by the surrounding application
//! (connection pool, read-only role, and driver choice live there).

use crate::error::DbResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Row data as a map of column name to JSON value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Generic query result containing rows and metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub row_count: usize,
    pub execution_time_ms: u64,
}

impl QueryResult {
    pub fn empty() -> Self {
        Self {
            columns: vec![],
            rows: vec![],
            row_count: 0,
            execution_time_ms: 0,
        }
    }

    pub fn new(columns: Vec<String>, rows: Vec<Row>, execution_time_ms: u64) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            execution_time_ms,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Async executor for admitted, read-only SQL.
///
/// Implementations should run the statement under a read-only database role
/// or transaction as defense-in-depth: the safety gate is a lexical screen,
/// not a proof of harmlessness.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `sql` and return the results.
    ///
    /// `sql` is a single admitted statement with a trailing semicolon. On
    /// failure, [`DatabaseError::QueryFailed`](crate::error::DatabaseError)
    /// should carry the SQLSTATE code when the driver reports one, so the
    /// service can attach a hint for the user.
    async fn execute(&self, sql: &str) -> DbResult<QueryResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_result_creation() {
        let mut row = Row::new();
        row.insert("id".into(), serde_json::json!(1));
        row.insert("name".into(), serde_json::json!("test"));

        let result = QueryResult::new(vec!["id".into(), "name".into()], vec![row], 12);
        assert_eq!(result.row_count, 1);
        assert_eq!(result.columns.len(), 2);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_empty_result() {
        let result = QueryResult::empty();
        assert!(result.is_empty());
        assert_eq!(result.row_count, 0);
    }
}
