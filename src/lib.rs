//! Natural-language-to-SQL query service with a lexical SQL safety gate.
//!
//! A question goes to a generative model, the model's answer goes through
//! the [`SafetyGate`](security::SafetyGate) — a static screen that admits
//! only a single, side-effect-free `SELECT` — and only admitted SQL reaches
//! the database. The gate is deliberately lexical (comment stripping,
//! keyword and pattern matching), not a SQL parser; run queries under a
//! read-only database role as defense-in-depth.
//!
//! The model, the database, and schema introspection are collaborators
//! behind traits ([`SqlGenerator`](generator::SqlGenerator),
//! [`QueryExecutor`](database::QueryExecutor),
//! [`SchemaSource`](schema::SchemaSource)); the crate owns everything
//! between them.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use nlsql::{
//!     config::ServiceConfig,
//!     database::{QueryExecutor, QueryResult},
//!     error::{DbResult, GenerationError},
//!     generator::SqlGenerator,
//!     schema::{SchemaDescription, SchemaSource},
//!     server::{QueryRequest, QueryService},
//! };
//!
//! struct Model;
//!
//! #[async_trait::async_trait]
//! impl SqlGenerator for Model {
//!     async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
//!         // Call the generative AI service here.
//!         Ok("SELECT count(*) AS user_count FROM users LIMIT 1".into())
//!     }
//! }
//!
//! struct Db;
//!
//! #[async_trait::async_trait]
//! impl QueryExecutor for Db {
//!     async fn execute(&self, _sql: &str) -> DbResult<QueryResult> {
//!         // Run the admitted statement under a read-only role here.
//!         Ok(QueryResult::empty())
//!     }
//! }
//!
//! #[async_trait::async_trait]
//! impl SchemaSource for Db {
//!     async fn describe(&self) -> DbResult<SchemaDescription> {
//!         // Introspect information_schema here.
//!         Ok(SchemaDescription::default())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Arc::new(Db);
//!     let config = ServiceConfig::builder().from_env()?.build()?;
//!
//!     let service = QueryService::builder()
//!         .config(config)
//!         .generator(Arc::new(Model))
//!         .executor(Arc::clone(&db) as _)
//!         .schema_source(db as _)
//!         .build()?;
//!
//!     let response = service
//!         .handle(QueryRequest {
//!             question: "how many users are there?".into(),
//!         })
//!         .await?;
//!     println!("{}: {} rows", response.sql, response.row_count);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod generator;
pub mod schema;
pub mod security;
pub mod server;

pub use cache::SchemaCache;
pub use config::{GeneratorConfig, ServiceConfig, ServiceConfigBuilder};
pub use database::{QueryExecutor, QueryResult, Row};
pub use error::{DbResult, Error, Result};
pub use generator::{SqlGenerator, build_prompt, strip_model_artifacts};
pub use schema::{SchemaDescription, SchemaSource};
pub use security::{ComplexityReport, ComplexityWarning, RejectReason, SafetyGate, Verdict};
pub use server::{ErrorResponse, QueryRequest, QueryResponse, QueryService, QueryServiceBuilder};
