use serde::{Serialize, Deserialize};

/// Stores API keys for the external services
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiKeys {
    /// GitHub API token for authenticated requests
    pub github_token: Option<String>,
    /// Key for the OpenAI-compatible generation endpoint
    pub llm_api_key: Option<String>,
}

impl ApiKeys {
    /// Loads API keys from the environment
    ///
    /// `NVIDIA_API_KEY` takes precedence over the generic `LLM_API_KEY`.
    pub fn from_env() -> Self {
        Self {
            github_token: get_env_value("GITHUB_TOKEN"),
            llm_api_key: get_env_value("NVIDIA_API_KEY").or_else(|| get_env_value("LLM_API_KEY")),
        }
    }
}

/// Reads an environment variable, treating empty values as unset
pub fn get_env_value(key: &str) -> Option<String> {
    let value = std::env::var(key).ok()?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
