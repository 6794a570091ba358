mod connection;
mod introspection;
mod query;

pub use connection::*;
pub use introspection::*;
pub use query::*;

use crate::error::{AssistantError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Fetches column metadata for the configured table.
#[async_trait]
pub trait SchemaProvider: Send + Sync {
    async fn fetch_schema(&self, table: &TableIdentity) -> Result<TableSchema>;
}

/// Runs a validated SQL string and returns rows. Implementations trust the
/// caller: the orchestrator never hands over SQL that failed validation.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> Result<ExecutionResult>;
}

/// Warehouse handle. Each operation opens one connection against the
/// catalog's database and lets it close when the client drops. All calls
/// are bounded by the configured timeout.
pub struct Warehouse {
    config: WarehouseConfig,
    catalog: String,
    timeout: Duration,
}

impl Warehouse {
    pub fn new(config: WarehouseConfig, catalog: impl Into<String>, timeout: Duration) -> Self {
        Self {
            config,
            catalog: catalog.into(),
            timeout,
        }
    }
}

#[async_trait]
impl SchemaProvider for Warehouse {
    async fn fetch_schema(&self, table: &TableIdentity) -> Result<TableSchema> {
        let fetch = async {
            let client = connect(&self.config, &self.catalog)
                .await
                .map_err(|e| AssistantError::SchemaFetch(format!("connection failed: {e}")))?;
            fetch_table_schema(&client, table).await
        };
        tokio::time::timeout(self.timeout, fetch)
            .await
            .map_err(|_| AssistantError::SchemaFetch("schema fetch timed out".into()))?
    }
}

#[async_trait]
impl QueryExecutor for Warehouse {
    async fn execute(&self, sql: &str) -> Result<ExecutionResult> {
        let run = async {
            let client = connect(&self.config, &self.catalog)
                .await
                .map_err(|e| AssistantError::Execution(format!("connection failed: {e}")))?;
            execute_query(&client, sql).await
        };
        tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| AssistantError::Execution("query timed out".into()))?
    }
}
