use crate::ai::{build_prompt, extract_sql, make_provider, GenerationProvider};
use crate::config::AssistantConfig;
use crate::db::{QueryExecutor, SchemaProvider, TableIdentity, TableSchema, Warehouse};
use crate::error::Result;
use crate::validate::validate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Value returned to the caller for every `query()` invocation. Failures at
/// any stage land here as `status: "error"`; the assistant never raises past
/// its own boundary.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    /// Generated SQL; empty when a failure occurred before generation.
    pub sql_query: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Success,
    Error,
}

impl QueryOutcome {
    fn success(sql: String, results: Option<Vec<serde_json::Value>>) -> Self {
        Self {
            sql_query: sql,
            status: OutcomeStatus::Success,
            results,
            error: None,
        }
    }

    fn error(sql: String, message: String) -> Self {
        Self {
            sql_query: sql,
            status: OutcomeStatus::Error,
            results: None,
            error: Some(message),
        }
    }
}

/// Converts natural-language questions about one warehouse table into SQL,
/// optionally executes them, and memoizes the table schema for its own
/// lifetime.
pub struct DataAssistant {
    provider: Arc<dyn GenerationProvider>,
    schema_source: Arc<dyn SchemaProvider>,
    executor: Arc<dyn QueryExecutor>,
    table: TableIdentity,
    // unset → populated → unset-on-invalidate; write lock only on
    // first population and on invalidate
    schema_cache: RwLock<Option<TableSchema>>,
}

impl DataAssistant {
    pub fn new(
        provider: Arc<dyn GenerationProvider>,
        schema_source: Arc<dyn SchemaProvider>,
        executor: Arc<dyn QueryExecutor>,
        table: TableIdentity,
    ) -> Self {
        Self {
            provider,
            schema_source,
            executor,
            table,
            schema_cache: RwLock::new(None),
        }
    }

    /// Wire up the warehouse and the configured generation backend.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        let provider = make_provider(
            config.provider,
            config.api_key.clone(),
            config.model.clone(),
            config.request_timeout,
        )?;
        let warehouse = Arc::new(Warehouse::new(
            config.warehouse.clone(),
            config.table.catalog.clone(),
            config.request_timeout,
        ));
        Ok(Self::new(
            provider,
            warehouse.clone(),
            warehouse,
            config.table.clone(),
        ))
    }

    pub fn table(&self) -> &TableIdentity {
        &self.table
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Return the cached schema, fetching it on first use. Exactly one
    /// fetch happens per populated lifetime; concurrent first calls are
    /// serialized by the write lock.
    pub async fn get_or_fetch_schema(&self) -> Result<TableSchema> {
        if let Some(schema) = self.schema_cache.read().await.as_ref() {
            return Ok(schema.clone());
        }

        let mut slot = self.schema_cache.write().await;
        // Another caller may have populated while we waited for the lock
        if let Some(schema) = slot.as_ref() {
            return Ok(schema.clone());
        }

        info!(table = %self.table, "fetching table schema");
        let schema = self.schema_source.fetch_schema(&self.table).await?;
        *slot = Some(schema.clone());
        Ok(schema)
    }

    /// Clear the cached schema so the next query picks up warehouse schema
    /// changes without restarting the assistant.
    pub async fn invalidate_schema(&self) {
        *self.schema_cache.write().await = None;
        debug!(table = %self.table, "schema cache invalidated");
    }

    /// Convert the question to SQL and, when requested, run it. Every
    /// internal failure is converted into an error outcome here.
    pub async fn query(&self, question: &str, execute: bool) -> QueryOutcome {
        match self.run(question, execute).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "query pipeline failed");
                QueryOutcome::error(String::new(), e.to_string())
            }
        }
    }

    async fn run(&self, question: &str, execute: bool) -> Result<QueryOutcome> {
        let schema = self.get_or_fetch_schema().await?;

        let prompt = build_prompt(question, &schema);
        debug!(provider = self.provider.name(), "requesting SQL generation");
        let raw = self.provider.generate(&prompt).await?;

        let sql = extract_sql(&raw)?;
        let verdict = validate(&sql);
        if !verdict.is_safe {
            let reason = verdict
                .rejection_reason
                .unwrap_or_else(|| "rejected".into());
            warn!(%reason, "generated SQL failed validation");
            return Ok(QueryOutcome::error(verdict.sql_text, reason));
        }

        info!(sql = %verdict.sql_text, "generated SQL passed validation");

        if !execute {
            return Ok(QueryOutcome::success(verdict.sql_text, None));
        }

        match self.executor.execute(&verdict.sql_text).await {
            Ok(result) => {
                info!(rows = result.row_count, elapsed_ms = result.execution_time_ms as u64, "query executed");
                Ok(QueryOutcome::success(
                    verdict.sql_text,
                    Some(result.row_mappings()),
                ))
            }
            Err(e) => Ok(QueryOutcome::error(verdict.sql_text, e.to_string())),
        }
    }
}
