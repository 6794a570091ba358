use crate::ai::ProviderKind;
use crate::db::{TableIdentity, WarehouseConfig};
use crate::error::{AssistantError, Result};
use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything the assistant needs to run, resolved from the environment.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub warehouse: WarehouseConfig,
    pub table: TableIdentity,
    /// Upper bound for provider and warehouse calls.
    pub request_timeout: Duration,
}

impl AssistantConfig {
    /// Load configuration from environment variables.
    ///
    /// `LLM_PROVIDER` selects the backend (`openai` by default). The API key
    /// and model come from the provider-specific variables
    /// (`OPENAI_API_KEY`/`OPENAI_MODEL`, `GEMINI_API_KEY`/`GEMINI_MODEL`).
    pub fn from_env() -> Result<Self> {
        let provider = match env::var("LLM_PROVIDER") {
            Ok(v) => v.parse()?,
            Err(_) => ProviderKind::OpenAi,
        };

        let (api_key, model) = match provider {
            ProviderKind::OpenAi => (
                require("OPENAI_API_KEY")?,
                env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4.1".into()),
            ),
            ProviderKind::Gemini => (
                require("GEMINI_API_KEY")?,
                env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash-lite".into()),
            ),
        };

        let warehouse = WarehouseConfig {
            host: require("WAREHOUSE_HOST")?,
            port: match env::var("WAREHOUSE_PORT") {
                Ok(p) => p
                    .parse()
                    .map_err(|_| AssistantError::Config(format!("invalid WAREHOUSE_PORT: {p}")))?,
                Err(_) => 5432,
            },
            user: require("WAREHOUSE_USER")?,
            password: require("WAREHOUSE_PASSWORD")?,
        };

        let table = TableIdentity {
            catalog: require("CATALOG_NAME")?,
            schema: require("SCHEMA_NAME")?,
            table: require("TABLE_NAME")?,
        };

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(s) => Duration::from_secs(s.parse().map_err(|_| {
                AssistantError::Config(format!("invalid REQUEST_TIMEOUT_SECS: {s}"))
            })?),
            Err(_) => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            provider,
            api_key,
            model,
            warehouse,
            table,
            request_timeout,
        })
    }
}

fn require(name: &str) -> Result<String> {
    env::var(name)
        .map_err(|_| AssistantError::Config(format!("{name} not found in environment")))
}
