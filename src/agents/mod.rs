//! Language-model integration for README drafting.
//!
//! [`TextGenerator`] is the seam the orchestrator depends on; [`OpenAIAgent`]
//! implements it against any OpenAI-compatible chat completions endpoint.

use crate::config::LlmConfig;
use crate::error::{ReadmeError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use log::{debug, info};
use std::time::{Duration, Instant};

/// Produces text for a prompt
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model in use
    fn model_name(&self) -> &str;

    /// Models this generator can serve
    fn supported_models(&self) -> Vec<String> {
        vec![self.model_name().to_string()]
    }
}

/// Chat-completions client
#[derive(Clone)]
pub struct OpenAIAgent {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

impl OpenAIAgent {
    /// Builds the agent; fails when no API key is configured
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ReadmeError::Config("LLM API key not set (NVIDIA_API_KEY or LLM_API_KEY)".to_string())
            })?;

        let openai_config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(config.api_base.trim_end_matches('/'));

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    #[allow(deprecated)]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([message.into()])
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ReadmeError::Generation("model returned no content".to_string()))
    }
}

#[async_trait]
impl TextGenerator for OpenAIAgent {
    async fn generate(&self, prompt: &str) -> Result<String> {
        info!("Sending {} char prompt to {}", prompt.len(), self.model);
        let start = Instant::now();

        let content = tokio::time::timeout(self.timeout, self.complete(prompt))
            .await
            .map_err(|_| {
                ReadmeError::Generation(format!("generation timed out after {}s", self.timeout.as_secs()))
            })??;

        debug!("Generation finished in {:.2}s", start.elapsed().as_secs_f64());
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
