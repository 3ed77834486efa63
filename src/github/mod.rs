//! GitHub REST client used as the source fetcher.
//!
//! Branch and tree lookups degrade to defaults instead of failing; individual
//! file fetches are best-effort and run concurrently.

pub mod selection;

use crate::config::{Config, FetchConfig};
use crate::error::{ReadmeError, Result};
use crate::parallel::ParallelProcessor;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Branch used whenever the default branch cannot be resolved
pub const FALLBACK_BRANCH: &str = "main";
const GITHUB_BASE: &str = "https://github.com";

/// Identifies the target repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryReference {
    /// Owner (user or organization)
    pub owner: String,
    /// Repository name
    #[serde(rename = "repo")]
    pub name: String,
    /// Browser URL of the repository
    pub url: String,
}

impl RepositoryReference {
    /// Builds a reference; no network access
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            url: format!("{}/{}/{}", GITHUB_BASE, owner, name),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Checks that `value` is shaped like a GitHub owner or repository name
///
/// Only ASCII letters, digits, `.`, `_` and `-` are accepted, and `.` / `..`
/// are rejected, so the name is always a single URL and file-name segment.
pub fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ReadmeError::Validation(format!("{} must not be empty", field)));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
    if value == "." || value == ".." || !value.chars().all(allowed) {
        return Err(ReadmeError::Validation(format!("{} is not a valid GitHub name: {}", field, value)));
    }
    Ok(())
}

/// One entry of the recursive git tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root
    pub path: String,
    /// `blob` for files, `tree` for directories
    #[serde(rename = "type")]
    pub kind: String,
    /// Blob size in bytes
    #[serde(default)]
    pub size: Option<u64>,
}

impl TreeEntry {
    /// A file entry
    pub fn blob(path: &str) -> Self {
        Self { path: path.to_string(), kind: "blob".to_string(), size: None }
    }

    /// A directory entry
    pub fn tree(path: &str) -> Self {
        Self { path: path.to_string(), kind: "tree".to_string(), size: None }
    }

    /// Whether this entry is a file
    pub fn is_blob(&self) -> bool {
        self.kind != "tree"
    }
}

/// A fetched file, possibly truncated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path relative to the repository root
    pub path: String,
    /// Decoded content
    pub content: String,
}

impl FileEntry {
    /// Creates a file entry
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self { path: path.into(), content: content.into() }
    }
}

#[derive(Debug, Deserialize)]
struct RepoPayload {
    default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TreePayload {
    #[serde(default)]
    tree: Vec<TreeEntry>,
}

#[derive(Debug, Deserialize)]
struct ContentPayload {
    content: Option<String>,
    #[serde(default)]
    size: u64,
}

/// Async GitHub REST API client
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    api_base: String,
    limits: FetchConfig,
}

impl GitHubClient {
    /// Creates a client from the GitHub and fetch sections of the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("readmesmith"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));

        if let Some(token) = &config.github.token {
            let value = HeaderValue::from_str(&format!("token {}", token))
                .map_err(|e| ReadmeError::Config(format!("Invalid GitHub token: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.github.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ReadmeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base: config.github.api_base.trim_end_matches('/').to_string(),
            limits: config.fetch.clone(),
        })
    }

    /// Basic repository metadata (no network call needed)
    pub fn repo_info(&self, owner: &str, name: &str) -> RepositoryReference {
        RepositoryReference::new(owner, name)
    }

    /// Resolves the default branch, falling back to `main` on any failure
    pub async fn default_branch(&self, repo: &RepositoryReference) -> String {
        match self.fetch_default_branch(repo).await {
            Ok(branch) => branch,
            Err(e) => {
                warn!("Could not resolve default branch of {}: {}", repo.full_name(), e);
                FALLBACK_BRANCH.to_string()
            }
        }
    }

    /// Lists the recursive file tree, returning an empty list on any failure
    pub async fn repo_tree(&self, repo: &RepositoryReference, branch: &str) -> Vec<TreeEntry> {
        match self.fetch_tree(repo, branch).await {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Could not list tree of {}@{}: {}", repo.full_name(), branch, e);
                Vec::new()
            }
        }
    }

    /// Selects and fetches a bounded set of files from the tree
    ///
    /// Failed fetches are logged and omitted. The result keeps selection order.
    pub async fn fetch_source_files(
        &self,
        repo: &RepositoryReference,
        tree: &[TreeEntry],
        branch: &str,
    ) -> Vec<FileEntry> {
        let tiers = selection::partition(tree);
        info!(
            "Selecting files (priority: {}, high-value: {}, secondary: {})",
            tiers.priority.len(),
            tiers.high_value.len(),
            tiers.secondary.len()
        );
        let paths = tiers.into_capped(self.limits.max_files);
        if paths.is_empty() {
            return Vec::new();
        }
        info!("Fetching {} files from {}", paths.len(), repo.full_name());

        let processor = ParallelProcessor::new(paths.len());
        let tasks: Vec<_> = paths
            .iter()
            .map(|path| {
                let client = self.clone();
                let repo = repo.clone();
                let path = path.clone();
                let branch = branch.to_string();
                async move { client.fetch_file(&repo, &path, &branch).await }
            })
            .collect();

        let mut files = Vec::with_capacity(paths.len());
        for (path, result) in paths.into_iter().zip(processor.process(tasks).await) {
            match result {
                Ok(Some(content)) => {
                    let content = selection::bound_content(&path, content, self.limits.truncate_limit);
                    info!("Fetched {} ({} chars)", path, content.chars().count());
                    files.push(FileEntry { path, content });
                }
                Ok(None) => info!("Skipped {} (empty or too large)", path),
                Err(e) => warn!("Could not fetch {}: {}", path, e),
            }
        }

        info!("Total files fetched: {}", files.len());
        files
    }

    /// Fetches a single file's decoded content
    ///
    /// Returns `Ok(None)` for non-200 responses, missing content and oversized files.
    pub async fn fetch_file(
        &self,
        repo: &RepositoryReference,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>> {
        let url = self.repo_url(repo, "contents", path)?;
        let response = self.client.get(url).query(&[("ref", branch)]).send().await?;
        if response.status() != StatusCode::OK {
            return Ok(None);
        }

        let payload: ContentPayload = response.json().await?;
        let encoded = match payload.content {
            Some(c) if !c.is_empty() && payload.size < self.limits.max_file_size => c,
            _ => return Ok(None),
        };

        // GitHub wraps base64 content at 60 columns
        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| ReadmeError::GitHubApi(format!("Invalid base64 content for {}: {}", path, e)))?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// `{api_base}/repos/{owner}/{repo}/{endpoint}/{path}` with every segment percent-encoded
    fn repo_url(&self, repo: &RepositoryReference, endpoint: &str, path: &str) -> Result<Url> {
        let mut url = Url::parse(&self.api_base)?;
        url.path_segments_mut()
            .map_err(|_| ReadmeError::Config(format!("GitHub API base cannot hold a path: {}", self.api_base)))?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
            .extend(endpoint.split('/').filter(|s| !s.is_empty()))
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    async fn fetch_default_branch(&self, repo: &RepositoryReference) -> Result<String> {
        let url = self.repo_url(repo, "", "")?;
        let response = check_response(self.client.get(url).send().await?)?;
        let payload: RepoPayload = response.json().await?;
        Ok(payload.default_branch.unwrap_or_else(|| FALLBACK_BRANCH.to_string()))
    }

    async fn fetch_tree(&self, repo: &RepositoryReference, branch: &str) -> Result<Vec<TreeEntry>> {
        let url = self.repo_url(repo, "git/trees", branch)?;
        let response = check_response(
            self.client.get(url).query(&[("recursive", "1")]).send().await?,
        )?;
        let payload: TreePayload = response.json().await?;
        Ok(payload.tree)
    }
}

/// Maps rate-limit statuses and other failures to errors
fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        let reset = response
            .headers()
            .get("X-RateLimit-Reset")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        return Err(ReadmeError::RateLimitExceeded(format!(
            "GitHub rate limit hit (resets at {}). Set GITHUB_TOKEN to increase your limit.",
            reset
        )));
    }
    if !status.is_success() {
        return Err(ReadmeError::GitHubApi(format!("GitHub API request failed: HTTP {}", status)));
    }
    Ok(response)
}
