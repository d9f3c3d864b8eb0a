//! End-to-end handler tests with mock collaborators.

use async_trait::async_trait;
use nlsql::config::ServiceConfig;
use nlsql::database::{QueryExecutor, QueryResult, Row};
use nlsql::error::{DbResult, Error, GenerationError};
use nlsql::generator::SqlGenerator;
use nlsql::schema::{ColumnSchema, SchemaDescription, SchemaSource, TableSchema};
use nlsql::server::{ErrorResponse, QueryRequest, QueryService};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

struct FixedGenerator(String);

#[async_trait]
impl SqlGenerator for FixedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.0.clone())
    }
}

#[derive(Default)]
struct RecordingExecutor {
    statements: Mutex<Vec<String>>,
    rows: Vec<Row>,
    error: Option<(String, Option<String>)>,
    delay: Option<Duration>,
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn execute(&self, sql: &str) -> DbResult<QueryResult> {
        self.statements.lock().await.push(sql.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some((message, code)) = &self.error {
            return Err(nlsql::error::DatabaseError::QueryFailed {
                message: message.clone(),
                code: code.clone(),
            });
        }
        let columns = self
            .rows
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();
        Ok(QueryResult::new(columns, self.rows.clone(), 3))
    }
}

#[derive(Default)]
struct CountingSchemaSource {
    calls: AtomicUsize,
}

#[async_trait]
impl SchemaSource for CountingSchemaSource {
    async fn describe(&self) -> DbResult<SchemaDescription> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(SchemaDescription {
            tables: vec![TableSchema {
                name: "users".into(),
                columns: vec![ColumnSchema {
                    name: "id".into(),
                    data_type: "integer".into(),
                    nullable: false,
                }],
            }],
            foreign_keys: vec![],
        })
    }
}

fn config() -> ServiceConfig {
    ServiceConfig::builder().api_key("test-key").build().unwrap()
}

fn service_with(
    generated: &str,
    executor: Arc<RecordingExecutor>,
    schema: Arc<CountingSchemaSource>,
) -> QueryService {
    QueryService::builder()
        .config(config())
        .generator(Arc::new(FixedGenerator(generated.into())))
        .executor(executor as _)
        .schema_source(schema as _)
        .build()
        .unwrap()
}

fn user_row() -> Row {
    let mut row = Row::new();
    row.insert("id".into(), serde_json::json!(1));
    row
}

#[tokio::test]
async fn happy_path_strips_fences_and_executes_with_semicolon() {
    let executor = Arc::new(RecordingExecutor {
        rows: vec![user_row()],
        ..Default::default()
    });
    let service = service_with(
        "```sql\nSELECT id FROM users LIMIT 10;\n```",
        Arc::clone(&executor),
        Arc::new(CountingSchemaSource::default()),
    );

    let response = service
        .handle(QueryRequest {
            question: "list users".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.sql, "SELECT id FROM users LIMIT 10");
    assert_eq!(response.row_count, 1);
    assert!(response.warnings.is_empty());
    assert!(response.message.is_none());

    let statements = executor.statements.lock().await;
    assert_eq!(statements.as_slice(), ["SELECT id FROM users LIMIT 10;"]);
}

#[tokio::test]
async fn unsafe_sql_is_rejected_and_never_executed() {
    let executor = Arc::new(RecordingExecutor::default());
    let service = service_with(
        "DROP TABLE users",
        Arc::clone(&executor),
        Arc::new(CountingSchemaSource::default()),
    );

    let error = service
        .handle(QueryRequest {
            question: "delete everything".into(),
        })
        .await
        .unwrap_err();

    assert!(matches!(error, Error::UnsafeSql { .. }));
    let response = ErrorResponse::from(&error);
    assert_eq!(response.status, 400);
    assert_eq!(response.sql.as_deref(), Some("DROP TABLE users"));
    assert!(!response.reasons.is_empty());

    assert!(executor.statements.lock().await.is_empty());
}

#[tokio::test]
async fn missing_limit_surfaces_advisory_warning_but_runs() {
    let executor = Arc::new(RecordingExecutor {
        rows: vec![user_row()],
        ..Default::default()
    });
    let service = service_with(
        "SELECT id FROM users",
        Arc::clone(&executor),
        Arc::new(CountingSchemaSource::default()),
    );

    let response = service
        .handle(QueryRequest {
            question: "list users".into(),
        })
        .await
        .unwrap();

    assert_eq!(
        response.warnings,
        vec!["No LIMIT clause - query might return too many rows".to_string()]
    );
    assert_eq!(executor.statements.lock().await.len(), 1);
}

#[tokio::test]
async fn empty_result_gets_a_message() {
    let service = service_with(
        "SELECT id FROM users WHERE id = -1 LIMIT 1",
        Arc::new(RecordingExecutor::default()),
        Arc::new(CountingSchemaSource::default()),
    );

    let response = service
        .handle(QueryRequest {
            question: "impossible".into(),
        })
        .await
        .unwrap();

    assert_eq!(response.row_count, 0);
    assert!(response.message.unwrap().contains("no results"));
}

#[tokio::test]
async fn question_validation() {
    let service = service_with(
        "SELECT 1 LIMIT 1",
        Arc::new(RecordingExecutor::default()),
        Arc::new(CountingSchemaSource::default()),
    );

    let error = service
        .handle(QueryRequest {
            question: "   ".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(error.status(), 400);

    let error = service
        .handle(QueryRequest {
            question: "x".repeat(501),
        })
        .await
        .unwrap_err();
    assert_eq!(error.status(), 400);
    assert!(error.to_string().contains("too long"));
}

#[tokio::test]
async fn missing_api_key_is_a_server_error() {
    let service = QueryService::builder()
        .generator(Arc::new(FixedGenerator("SELECT 1 LIMIT 1".into())))
        .executor(Arc::new(RecordingExecutor::default()) as _)
        .schema_source(Arc::new(CountingSchemaSource::default()) as _)
        .build()
        .unwrap();

    let error = service
        .handle(QueryRequest {
            question: "anything".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(error.status(), 500);
    assert!(matches!(error, Error::Config(_)));
}

#[tokio::test]
async fn schema_source_hit_once_while_cache_is_fresh() {
    let schema = Arc::new(CountingSchemaSource::default());
    let service = service_with(
        "SELECT id FROM users LIMIT 1",
        Arc::new(RecordingExecutor {
            rows: vec![user_row()],
            ..Default::default()
        }),
        Arc::clone(&schema),
    );

    for _ in 0..3 {
        service
            .handle(QueryRequest {
                question: "list users".into(),
            })
            .await
            .unwrap();
    }
    assert_eq!(schema.calls.load(Ordering::SeqCst), 1);

    service.schema_cache().invalidate();
    service
        .handle(QueryRequest {
            question: "list users".into(),
        })
        .await
        .unwrap();
    assert_eq!(schema.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn database_error_carries_sql_and_hint() {
    let executor = Arc::new(RecordingExecutor {
        error: Some((
            "column \"orderDate\" does not exist".into(),
            Some("42703".into()),
        )),
        ..Default::default()
    });
    let service = service_with(
        "SELECT orderDate FROM orders LIMIT 5",
        executor,
        Arc::new(CountingSchemaSource::default()),
    );

    let error = service
        .handle(QueryRequest {
            question: "orders by date".into(),
        })
        .await
        .unwrap_err();

    let response = ErrorResponse::from(&error);
    assert_eq!(response.status, 400);
    assert_eq!(response.sql.as_deref(), Some("SELECT orderDate FROM orders LIMIT 5"));
    assert!(response.hint.unwrap().contains("snake_case"));
}

#[tokio::test]
async fn slow_execution_times_out_as_client_error() {
    let executor = Arc::new(RecordingExecutor {
        delay: Some(Duration::from_millis(200)),
        ..Default::default()
    });
    let config = ServiceConfig::builder()
        .api_key("test-key")
        .query_timeout(Duration::from_millis(20))
        .build()
        .unwrap();
    let service = QueryService::builder()
        .config(config)
        .generator(Arc::new(FixedGenerator("SELECT 1 LIMIT 1".into())))
        .executor(executor as _)
        .schema_source(Arc::new(CountingSchemaSource::default()) as _)
        .build()
        .unwrap();

    let error = service
        .handle(QueryRequest {
            question: "slow".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(error.status(), 400);
    assert!(error.to_string().contains("timeout"));
}
