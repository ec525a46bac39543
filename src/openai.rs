//! OpenAI-compatible client configuration.
//!
//! Both pipeline models speak the chat-completions protocol, so a single
//! client type covers OpenAI, Groq and Gemini's compatibility endpoint.

use crate::config::ModelSettings;
use crate::error::{RecapError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create a chat client for the given model settings.
///
/// Fails when the API key environment variable is unset.
pub fn create_client(settings: &ModelSettings) -> Result<Client<OpenAIConfig>> {
    let api_key = settings.api_key().ok_or_else(|| {
        RecapError::Config(format!(
            "{} not set. Set it with: export {}='...'",
            settings.api_key_env, settings.api_key_env
        ))
    })?;

    create_client_with_timeout(
        &settings.api_base,
        &api_key,
        Duration::from_secs(settings.timeout_secs),
    )
}

/// Create a chat client for an explicit endpoint, key and timeout.
pub fn create_client_with_timeout(
    api_base: &str,
    api_key: &str,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder().timeout(timeout).build()?;

    let config = OpenAIConfig::new()
        .with_api_base(api_base.trim_end_matches('/'))
        .with_api_key(api_key);

    Ok(Client::with_config(config).with_http_client(http_client))
}
