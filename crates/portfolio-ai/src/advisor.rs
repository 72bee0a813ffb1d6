//! Plumbing shared by the advisors: ask the model once, treat its answer as
//! untrusted upstream data, and fall back to a static payload otherwise.

use portfolio_core::{fetch_with_fallback, LastResort, Sourced, UpstreamError};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::llm_provider::{GenerationConfig, LLMProvider, Message};

pub const SERVICE: &str = "openai";

/// A typed schema the model is asked to answer with.
pub trait ModelSchema: DeserializeOwned {
    /// Range and presence checks beyond what deserialization enforces.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Parses model output into `T`, tolerating a surrounding Markdown code fence.
pub fn parse_model_json<T: ModelSchema>(text: &str) -> Result<T, UpstreamError> {
    let parsed: T =
        serde_json::from_str(strip_code_fences(text)).map_err(UpstreamError::malformed)?;
    parsed.check().map_err(UpstreamError::Malformed)?;
    Ok(parsed)
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Single model call; provider errors become transport failures.
pub async fn ask_model(
    llm: Option<&dyn LLMProvider>,
    messages: &[Message],
    config: &GenerationConfig,
) -> Result<String, UpstreamError> {
    let llm = llm.ok_or(UpstreamError::MissingConfig("ai.api_key"))?;
    let response = llm
        .generate_chat(messages, config)
        .await
        .map_err(|e| UpstreamError::Transport(format!("{e:#}")))?;
    debug!(
        provider = llm.provider_name(),
        model = %response.model,
        finish_reason = response.finish_reason.as_deref().unwrap_or("-"),
        total_tokens = response.total_tokens,
        "model answered"
    );
    Ok(response.content)
}

/// Asks for JSON matching `T` and falls back to `fallback()` on any failure.
pub async fn advise_json<T, F>(
    llm: Option<&dyn LLMProvider>,
    messages: Vec<Message>,
    config: GenerationConfig,
    fallback: F,
) -> Sourced<T>
where
    T: ModelSchema + LastResort,
    F: FnOnce() -> T,
{
    fetch_with_fallback(
        SERVICE,
        || async move { ask_model(llm, &messages, &config).await },
        |text| parse_model_json::<T>(&text),
        fallback,
    )
    .await
}
