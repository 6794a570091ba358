use thiserror::Error;

/// Failure taxonomy for the query-generation pipeline.
///
/// Every variant maps to one pipeline stage; the orchestrator converts all
/// of them into a `QueryOutcome` and never lets them escape its boundary.
#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("schema fetch failed: {0}")]
    SchemaFetch(String),

    #[error("provider authentication failed: {0}")]
    ProviderAuth(String),

    #[error("provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("model returned no usable SQL: {0}")]
    EmptyGeneration(String),

    #[error("query rejected: {0}")]
    Rejected(String),

    #[error("query execution failed: {0}")]
    Execution(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;
