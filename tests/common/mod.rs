#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use mockito::{Matcher, Mock, ServerGuard};
use readmesmith::config::Config;
use readmesmith::error::{ReadmeError, Result};
use readmesmith::github::GitHubClient;
use readmesmith::graphics::BannerBuilder;
use readmesmith::output_store::ReadmeStore;
use readmesmith::{ReadmeService, TextGenerator};
use serde_json::json;
use std::path::Path;
use std::sync::{Arc, Mutex};

pub const FAKE_MODEL: &str = "fake-model";

/// Generator returning a canned response and recording every prompt
#[derive(Default)]
pub struct FakeGenerator {
    response: String,
    pub prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn new(response: &str) -> Self {
        Self { response: response.to_string(), prompts: Mutex::new(Vec::new()) }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        FAKE_MODEL
    }
}

/// Generator that always fails
pub struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(ReadmeError::Generation("upstream unavailable".to_string()))
    }

    fn model_name(&self) -> &str {
        FAKE_MODEL
    }
}

pub fn setup_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub fn test_config(server: &ServerGuard, output_dir: &Path) -> Config {
    let mut config = Config::new(output_dir.to_path_buf());
    config.github.api_base = server.url();
    config
}

pub fn service_with(server: &ServerGuard, output_dir: &Path, generator: Arc<dyn TextGenerator>) -> ReadmeService {
    let config = test_config(server, output_dir);
    ReadmeService::new(
        GitHubClient::new(&config).unwrap(),
        generator,
        BannerBuilder::new(),
        ReadmeStore::new(&config.output_dir).unwrap(),
    )
}

/// Serves a repository with the given files from the mock GitHub API
///
/// The returned mocks must be kept alive for the duration of the test.
pub async fn mock_repository(
    server: &mut ServerGuard,
    owner: &str,
    repo: &str,
    files: &[(&str, &str)],
) -> Vec<Mock> {
    let mut mocks = Vec::new();

    mocks.push(
        server
            .mock("GET", format!("/repos/{}/{}", owner, repo).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "name": repo, "default_branch": "main" }).to_string())
            .create_async()
            .await,
    );

    let tree: Vec<_> = files
        .iter()
        .map(|(path, content)| json!({ "path": path, "type": "blob", "size": content.len() }))
        .collect();
    mocks.push(
        server
            .mock("GET", format!("/repos/{}/{}/git/trees/main", owner, repo).as_str())
            .match_query(Matcher::UrlEncoded("recursive".into(), "1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "sha": "abc", "tree": tree, "truncated": false }).to_string())
            .create_async()
            .await,
    );

    for (path, content) in files {
        mocks.push(
            server
                .mock("GET", format!("/repos/{}/{}/contents/{}", owner, repo, path).as_str())
                .match_query(Matcher::UrlEncoded("ref".into(), "main".into()))
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(
                    json!({
                        "path": path,
                        "size": content.len(),
                        "encoding": "base64",
                        "content": STANDARD.encode(content),
                    })
                    .to_string(),
                )
                .create_async()
                .await,
        );
    }

    mocks
}
