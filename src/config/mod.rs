mod env_manager;

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::error::{ReadmeError, Result};
use std::fs;

pub use env_manager::{get_env_value, ApiKeys};

/// Default GitHub REST API base URL
pub const GITHUB_API_BASE: &str = "https://api.github.com";
/// Default OpenAI-compatible endpoint (NVIDIA hosted models)
pub const LLM_API_BASE: &str = "https://integrate.api.nvidia.com/v1";
/// Default generation model
pub const DEFAULT_MODEL: &str = "qwen/qwen2.5-coder-32b-instruct";

/// Main configuration struct for the application
///
/// Loaded once at startup and shared read-only afterwards. Every section
/// falls back to its defaults when absent from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory where generated READMEs are written
    pub output_dir: PathBuf,
    /// GitHub API settings
    pub github: GitHubConfig,
    /// Limits applied while selecting and fetching repository files
    pub fetch: FetchConfig,
    /// Text generation settings
    pub llm: LlmConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

/// GitHub API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Token for authenticated requests (raises the rate limit)
    pub token: Option<String>,
    /// REST API base URL
    pub api_base: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

/// Limits for the file selection heuristic
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Maximum number of files fetched per repository
    pub max_files: usize,
    /// Character limit for non-critical files
    pub truncate_limit: usize,
    /// Files reported larger than this (bytes) are skipped
    pub max_file_size: u64,
}

/// Settings for the OpenAI-compatible generation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key
    pub api_key: Option<String>,
    /// Base URL of the chat completions API
    pub api_base: String,
    /// Model identifier
    pub model: String,
    /// Maximum output tokens
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Timeout for a single generation call
    pub timeout_secs: u64,
}

/// HTTP server bind settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Config {
    /// Creates a new configuration with the specified output directory
    ///
    /// # Arguments
    /// * `output_dir` - The directory where generated READMEs will be stored
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            github: GitHubConfig::default(),
            fetch: FetchConfig::default(),
            llm: LlmConfig::default(),
            server: ServerConfig::default(),
        }
    }

    /// Loads configuration from a TOML file, then applies environment overrides
    ///
    /// With no explicit path the default location `<config dir>/readmesmith/config.toml`
    /// is tried. A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => dirs::config_dir().map(|d| d.join("readmesmith").join("config.toml")),
        };

        let mut config = match config_path {
            Some(ref p) if p.exists() => Self::from_file(p)?,
            Some(ref p) if path.is_some() => {
                return Err(ReadmeError::Config(format!("Config file not found: {}", p.display())));
            }
            _ => Self::default(),
        };

        config.apply_env(&ApiKeys::from_env());
        Ok(config)
    }

    /// Parses a TOML configuration file without environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ReadmeError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ReadmeError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Overrides file values with the process environment
    pub fn apply_env(&mut self, keys: &ApiKeys) {
        if keys.github_token.is_some() {
            self.github.token = keys.github_token.clone();
        }
        if keys.llm_api_key.is_some() {
            self.llm.api_key = keys.llm_api_key.clone();
        }
        if let Some(base) = get_env_value("GITHUB_API_BASE_URL") {
            self.github.api_base = base;
        }
        if let Some(base) = get_env_value("LLM_API_BASE") {
            self.llm.api_base = base;
        }
        if let Some(model) = get_env_value("AI_MODEL") {
            self.llm.model = model;
        }
        if let Some(dir) = get_env_value("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(host) = get_env_value("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get_env_value("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Validates the configuration by ensuring the output directory exists and tokens are usable
    pub async fn validate(&self) -> Result<()> {
        self.ensure_directories_exist().await?;
        self.ensure_tokens()?;
        Ok(())
    }

    /// Ensures the output directory exists
    pub async fn ensure_directories_exist(&self) -> Result<()> {
        if !tokio::fs::try_exists(&self.output_dir).await? {
            tokio::fs::create_dir_all(&self.output_dir).await?;
        }
        Ok(())
    }

    /// Rejects tokens that are configured but blank
    pub fn ensure_tokens(&self) -> Result<()> {
        if let Some(token) = &self.github.token {
            if token.trim().is_empty() {
                return Err(ReadmeError::Config("GitHub token is empty".into()));
            }
        }
        if let Some(key) = &self.llm.api_key {
            if key.trim().is_empty() {
                return Err(ReadmeError::Config("LLM API key is empty".into()));
            }
        }
        Ok(())
    }

    /// Socket address string for the HTTP server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: GITHUB_API_BASE.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_files: 45,
            truncate_limit: 3_000,
            max_file_size: 100_000,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: LLM_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4_000,
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(PathBuf::from("./generated_readmes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_validation() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::new(temp_dir.path().join("out"));

        assert!(config.validate().await.is_ok());
        assert!(temp_dir.path().join("out").is_dir());
        Ok(())
    }

    #[test]
    fn test_blank_token_rejected() {
        let mut config = Config::default();
        config.github.token = Some("   ".to_string());
        assert!(matches!(config.ensure_tokens(), Err(ReadmeError::Config(_))));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "output_dir = \"/tmp/readmes\"\n\n[fetch]\nmax_files = 10\n")?;

        let config = Config::from_file(&path)?;
        assert_eq!(config.output_dir, PathBuf::from("/tmp/readmes"));
        assert_eq!(config.fetch.max_files, 10);
        assert_eq!(config.fetch.truncate_limit, 3_000);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.github.api_base, GITHUB_API_BASE);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Config::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(ReadmeError::Config(_))));
    }

    #[test]
    fn test_api_keys_override_file_values() {
        let mut config = Config::default();
        config.apply_env(&ApiKeys {
            github_token: Some("ghp_test".into()),
            llm_api_key: Some("nvapi-test".into()),
        });
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
        assert_eq!(config.llm.api_key.as_deref(), Some("nvapi-test"));
    }
}
