//! Natural-language to SQL assistant for a single warehouse table.
//!
//! The pipeline is linear: cached schema → deterministic prompt → LLM
//! generation (OpenAI or Gemini) → fence stripping → allow-list validation
//! → optional execution. All failures surface as a `QueryOutcome` with
//! `status: "error"`; only validated SELECT statements ever reach the
//! warehouse.

pub mod ai;
pub mod assistant;
pub mod config;
pub mod db;
pub mod error;
pub mod validate;

pub use assistant::{DataAssistant, OutcomeStatus, QueryOutcome};
pub use config::AssistantConfig;
pub use error::{AssistantError, Result};
