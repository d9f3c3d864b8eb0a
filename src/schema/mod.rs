//! Database schema description and prompt rendering.
//!
//! Introspection itself lives behind the [`SchemaSource`] trait (the
//! surrounding application queries `information_schema` or equivalent); this
//! module owns the structured description and its rendering into the text
//! block embedded in the generation prompt.

use crate::error::DbResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Async provider of the current database schema.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Fetch a fresh description of all user tables, columns, and foreign
    /// keys.
    async fn describe(&self) -> DbResult<SchemaDescription>;
}

/// Column metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

/// Table with its columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnSchema>,
}

/// Foreign key relationship between two tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub foreign_table: String,
    pub foreign_column: String,
}

/// Full schema description for prompt construction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDescription {
    pub tables: Vec<TableSchema>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl SchemaDescription {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Render the description as the text block the generation prompt embeds:
    /// tables with exact column names and types, foreign key relationships,
    /// and usage notes for the model.
    pub fn render(&self) -> String {
        if self.is_empty() {
            return "No tables found in database. Please run migrations first.".into();
        }

        let mut out = String::from("DATABASE TABLES (use exact column names below):\n\n");

        for table in &self.tables {
            let _ = writeln!(out, "TABLE {}:", table.name);
            for column in &table.columns {
                let nullable = if column.nullable { " (nullable)" } else { "" };
                let _ = writeln!(out, "  {} ({}){}", column.name, column.data_type, nullable);
            }
            out.push('\n');
        }

        if !self.foreign_keys.is_empty() {
            out.push_str("RELATIONSHIPS (Foreign Keys):\n");
            for fk in &self.foreign_keys {
                let _ = writeln!(
                    out,
                    "  {}.{} -> {}.{}",
                    fk.table, fk.column, fk.foreign_table, fk.foreign_column
                );
            }
            out.push('\n');
        }

        let table_names = self
            .tables
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        let _ = write!(
            out,
            "IMPORTANT NOTES:\n\
             - Column names use snake_case (order_date, user_id, unit_price, etc.)\n\
             - Always use exact column names from above\n\
             - Table names: {table_names}\n\
             \n\
             QUERY TIPS:\n\
             - Use table aliases (e.g., SELECT u.name FROM users u)\n\
             - Join tables using foreign key relationships shown above\n\
             - Use aggregate functions: COUNT(), SUM(), AVG(), MAX(), MIN()\n\
             - For rankings: use ORDER BY with LIMIT\n\
             - For grouping: use GROUP BY with aggregate functions\n\
             - For dates: use DATE_TRUNC() and EXTRACT()\n"
        );

        out
    }
}
