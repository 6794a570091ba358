use crate::error::{AssistantError, Result};
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const GEMINI_ENDPOINT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const SYSTEM_PROMPT: &str =
    "You are a SQL expert that converts natural language to SQL queries.";

/// Which generation backend the assistant talks to. Selected once at
/// construction; nothing downstream branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

impl FromStr for ProviderKind {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            other => Err(AssistantError::Config(format!(
                "unsupported LLM provider: {other} (use 'openai' or 'gemini')"
            ))),
        }
    }
}

/// A backend that turns a prompt into raw model output.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the configured backend. This is the only place that knows which
/// concrete provider exists.
pub fn make_provider(
    kind: ProviderKind,
    api_key: String,
    model: String,
    timeout: Duration,
) -> Result<Arc<dyn GenerationProvider>> {
    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AssistantError::Config(format!("http client build failed: {e}")))?;

    Ok(match kind {
        ProviderKind::OpenAi => Arc::new(OpenAiProvider {
            http,
            api_key,
            model,
        }) as Arc<dyn GenerationProvider>,
        ProviderKind::Gemini => Arc::new(GeminiProvider {
            http,
            api_key,
            model,
        }),
    })
}

pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": prompt}
            ],
            "temperature": 0.1,
            "max_tokens": 500
        });

        let resp = self
            .http
            .post(OPENAI_ENDPOINT)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = resp.status();
        let text = resp.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(status_error("OpenAI", status, &text));
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| AssistantError::ProviderUnavailable(format!("OpenAI response: {e}")))?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();
        Ok(content)
    }
}

pub struct GeminiProvider {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_ENDPOINT_BASE, self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [
                {"parts": [{"text": format!("{}\n\n{}", SYSTEM_PROMPT, prompt)}]}
            ],
            "generationConfig": {
                "temperature": 0.1,
                "maxOutputTokens": 500
            }
        });

        let resp = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(request_error)?;

        let status = resp.status();
        let text = resp.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(status_error("Gemini", status, &text));
        }

        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| AssistantError::ProviderUnavailable(format!("Gemini response: {e}")))?;
        let content = json["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .unwrap_or("")
            .to_string();
        Ok(content)
    }
}

/// Network failures and timeouts both surface as the provider being
/// unavailable; retry policy belongs to the caller.
fn request_error(e: reqwest::Error) -> AssistantError {
    if e.is_timeout() {
        AssistantError::ProviderUnavailable("request timed out".into())
    } else {
        AssistantError::ProviderUnavailable(e.to_string())
    }
}

fn status_error(provider: &str, status: reqwest::StatusCode, body: &str) -> AssistantError {
    match status.as_u16() {
        401 | 403 => AssistantError::ProviderAuth(format!(
            "{provider} rejected the credential ({status}): {body}"
        )),
        429 => AssistantError::ProviderRateLimit(format!(
            "{provider} rate limit ({status}): {body}"
        )),
        _ => AssistantError::ProviderUnavailable(format!(
            "{provider} API error ({status}): {body}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert!("anthropic".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn auth_and_rate_limit_statuses_map_to_their_variants() {
        let auth = status_error("OpenAI", reqwest::StatusCode::UNAUTHORIZED, "bad key");
        assert!(matches!(auth, AssistantError::ProviderAuth(_)));

        let limited = status_error("Gemini", reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(limited, AssistantError::ProviderRateLimit(_)));

        let down = status_error("OpenAI", reqwest::StatusCode::BAD_GATEWAY, "oops");
        assert!(matches!(down, AssistantError::ProviderUnavailable(_)));
    }
}
