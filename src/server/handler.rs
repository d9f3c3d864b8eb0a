//! Query service orchestration.
//!
//! One request flows: question checks, cached schema, prompt, generation,
//! cleanup, safety gate, execution under a timeout, response shaping. The
//! gate's verdict is the only thing standing between model output and the
//! database; a rejection is final here — no repair, no re-prompt.

use crate::cache::SchemaCache;
use crate::config::ServiceConfig;
use crate::database::QueryExecutor;
use crate::error::{ConfigError, DatabaseError, Error, GenerationError, QuestionError, Result};
use crate::generator::{SqlGenerator, build_prompt, strip_model_artifacts};
use crate::schema::SchemaSource;
use crate::security::SafetyGate;
use crate::server::{QueryRequest, QueryResponse};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

pub struct QueryService {
    config: ServiceConfig,
    gate: SafetyGate,
    schema_cache: Arc<SchemaCache>,
    schema_source: Arc<dyn SchemaSource>,
    generator: Arc<dyn SqlGenerator>,
    executor: Arc<dyn QueryExecutor>,
}

impl QueryService {
    pub fn builder() -> QueryServiceBuilder {
        QueryServiceBuilder::new()
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Handle of the schema cache, for explicit invalidation after
    /// migrations.
    pub fn schema_cache(&self) -> Arc<SchemaCache> {
        Arc::clone(&self.schema_cache)
    }

    /// Handle one natural-language query end to end.
    #[instrument(skip(self, request), fields(question_len = request.question.len()))]
    pub async fn handle(&self, request: QueryRequest) -> Result<QueryResponse> {
        let started = Instant::now();

        let question = request.question.trim();
        if question.is_empty() {
            return Err(QuestionError::Missing.into());
        }
        if question.chars().count() > self.config.max_question_length {
            return Err(QuestionError::TooLong {
                max: self.config.max_question_length,
            }
            .into());
        }

        if self
            .config
            .generator
            .api_key
            .as_deref()
            .is_none_or(str::is_empty)
        {
            return Err(ConfigError::EnvNotFound("GEMINI_API_KEY".into()).into());
        }

        let schema_text = self.cached_schema().await?;
        let prompt = build_prompt(
            &schema_text,
            question,
            self.config.default_row_limit,
            self.config.max_row_limit,
        );

        let raw = self.generator.generate(&prompt).await?;
        let sql = strip_model_artifacts(&raw);
        if sql.is_empty() {
            return Err(GenerationError::EmptyResponse.into());
        }
        debug!(sql_len = sql.len(), "generated candidate SQL");

        let verdict = self.gate.validate(&sql);
        if !verdict.is_admitted() {
            warn!(reasons = %verdict.reason_summary(), "candidate SQL rejected");
            return Err(Error::UnsafeSql { sql, verdict });
        }

        let report = self.gate.assess_complexity(&sql);
        if !report.is_valid {
            debug!(warnings = report.warnings.len(), "complexity warnings");
        }

        // Cleanup stripped every trailing semicolon; the statement sent to
        // the executor gets exactly one back.
        let statement = format!("{sql};");
        let result = match timeout(self.config.query_timeout, self.executor.execute(&statement))
            .await
        {
            Ok(Ok(result)) => result,
            Ok(Err(source)) => return Err(Error::Execution { sql, source }),
            Err(_) => {
                return Err(Error::Execution {
                    sql,
                    source: DatabaseError::Timeout(self.config.query_timeout.as_millis() as u64),
                });
            }
        };

        let execution_time_ms = started.elapsed().as_millis() as u64;
        info!(
            rows = result.row_count,
            execution_time_ms, "query executed"
        );

        let message = if result.is_empty() {
            Some("Query executed successfully but returned no results.".to_string())
        } else {
            None
        };

        Ok(QueryResponse {
            sql,
            columns: result.columns,
            data: result.rows,
            row_count: result.row_count,
            execution_time_ms,
            message,
            warnings: report
                .warnings
                .iter()
                .map(|w| w.message().to_string())
                .collect(),
        })
    }

    /// Return the cached schema text, refreshing through the schema source
    /// when the entry is missing or expired.
    async fn cached_schema(&self) -> Result<String> {
        if let Some(schema) = self.schema_cache.get() {
            return Ok(schema);
        }

        debug!("refreshing schema cache");
        let description = self.schema_source.describe().await?;
        let text = description.render();
        self.schema_cache.store(text.clone());
        Ok(text)
    }
}

pub struct QueryServiceBuilder {
    config: Option<ServiceConfig>,
    schema_source: Option<Arc<dyn SchemaSource>>,
    generator: Option<Arc<dyn SqlGenerator>>,
    executor: Option<Arc<dyn QueryExecutor>>,
}

impl QueryServiceBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            schema_source: None,
            generator: None,
            executor: None,
        }
    }

    pub fn config(mut self, config: ServiceConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn schema_source(mut self, schema_source: Arc<dyn SchemaSource>) -> Self {
        self.schema_source = Some(schema_source);
        self
    }

    pub fn generator(mut self, generator: Arc<dyn SqlGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn build(self) -> std::result::Result<QueryService, &'static str> {
        let config = self.config.unwrap_or_default();
        let schema_cache = Arc::new(SchemaCache::new(config.schema_cache_ttl));

        Ok(QueryService {
            schema_cache,
            gate: SafetyGate::new(),
            schema_source: self.schema_source.ok_or("Schema source is required")?,
            generator: self.generator.ok_or("Generator is required")?,
            executor: self.executor.ok_or("Executor is required")?,
            config,
        })
    }
}

impl Default for QueryServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
