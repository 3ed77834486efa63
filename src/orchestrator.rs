//! README generation pipeline.
//!
//! fetch → infer → banners → prompt → generate → sanitize → persist

use crate::agents::TextGenerator;
use crate::error::{ReadmeError, Result};
use crate::github::{validate_name, FileEntry, GitHubClient, RepositoryReference};
use crate::graphics::{BannerBuilder, BannerConfig};
use crate::metadata::{infer_metadata, ProjectMetadata};
use crate::output_store::ReadmeStore;
use crate::prompts::PromptBuilder;
use crate::sanitizer::sanitize;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Input to [`ReadmeService::generate`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Banner options; banners are on by default
    #[serde(default)]
    pub banner_config: BannerConfig,
    /// Writing tone, `professional` when absent
    #[serde(default)]
    pub tone: Option<String>,
}

impl GenerateRequest {
    /// Request with default banners and tone
    pub fn new(owner: &str, repo: &str) -> Self {
        Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
            banner_config: BannerConfig::default(),
            tone: None,
        }
    }

    fn validate(&self) -> Result<()> {
        validate_name("owner_name", self.owner.trim())?;
        validate_name("repo_name", self.repo.trim())
    }
}

/// Result of one generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedReadme {
    /// Sanitized README text, or the fallback README
    #[serde(rename = "readme_content")]
    pub content: String,
    /// Length of `content` in characters
    #[serde(rename = "readme_length")]
    pub length: usize,
    /// Where the README was written
    #[serde(rename = "local_file_path")]
    pub file_path: String,
    /// Wall-clock seconds, rounded to two decimals
    #[serde(rename = "processing_time")]
    pub processing_time_seconds: f64,
    /// Number of files that reached the prompt
    pub files_analyzed: usize,
    /// Model reported by the generator
    #[serde(rename = "ai_model_used")]
    pub model_used: String,
    /// Branch the files were read from
    pub branch_used: String,
    /// Inferred project metadata
    pub metadata: ProjectMetadata,
    /// Target repository
    pub repo_info: RepositoryReference,
    /// Header banner URL when banners are enabled
    pub header_banner_url: Option<String>,
    /// Conclusion banner URL when banners are enabled
    pub conclusion_banner_url: Option<String>,
    /// Whether banners were requested
    pub dual_banners_enabled: bool,
}

/// Banner URLs computed without generating a README
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerPreview {
    /// capsule-render header URL
    pub header_banner_url: String,
    /// readme-typing-svg conclusion URL
    pub conclusion_banner_url: String,
    /// Metadata the banners were built from
    pub metadata: ProjectMetadata,
}

/// Runs the generation pipeline over explicitly injected collaborators
pub struct ReadmeService {
    github: GitHubClient,
    generator: Arc<dyn TextGenerator>,
    banners: BannerBuilder,
    store: ReadmeStore,
}

impl ReadmeService {
    /// Wires the service from already constructed collaborators
    pub fn new(
        github: GitHubClient,
        generator: Arc<dyn TextGenerator>,
        banners: BannerBuilder,
        store: ReadmeStore,
    ) -> Self {
        Self { github, generator, banners, store }
    }

    /// Store the generated READMEs are written to
    pub fn store(&self) -> &ReadmeStore {
        &self.store
    }

    /// Model used for generation
    pub fn model_name(&self) -> &str {
        self.generator.model_name()
    }

    /// Models the generator accepts
    pub fn supported_models(&self) -> Vec<String> {
        self.generator.supported_models()
    }

    /// Generates, sanitizes and persists a README for one repository
    ///
    /// A generation failure is replaced by [`fallback_readme`]; a repository
    /// with no fetchable files is an error and nothing is written.
    pub async fn generate(&self, request: GenerateRequest) -> Result<GeneratedReadme> {
        request.validate()?;
        let start = Instant::now();
        let repo = self.github.repo_info(request.owner.trim(), request.repo.trim());
        info!("Starting README generation for {}", repo.full_name());

        let branch = self.github.default_branch(&repo).await;
        info!("Using branch {}", branch);
        let tree = self.github.repo_tree(&repo, &branch).await;
        let files = self.github.fetch_source_files(&repo, &tree, &branch).await;
        if files.is_empty() {
            return Err(ReadmeError::NoSourceFiles(repo.full_name()));
        }

        let metadata = infer_metadata(&files);
        info!(
            "Detected {} {} ({})",
            metadata.primary_language,
            metadata.project_type,
            metadata.tech_stack.join(", ")
        );

        let banners_enabled = request.banner_config.include_banner;
        let (header, conclusion) = if banners_enabled {
            let (header, conclusion) = self.banners.dual_banners(&repo, &metadata, &request.banner_config);
            (Some(header), Some(conclusion))
        } else {
            (None, None)
        };

        let content = self
            .draft(&repo, &metadata, &files, request.tone.as_deref(), header.as_deref(), conclusion.as_deref())
            .await;

        let path = self.store.save(&repo.owner, &repo.name, &content).await?;
        let processing_time = (start.elapsed().as_secs_f64() * 100.0).round() / 100.0;
        info!("README generation for {} complete in {:.2}s", repo.full_name(), processing_time);

        Ok(GeneratedReadme {
            length: content.chars().count(),
            content,
            file_path: path.to_string_lossy().into_owned(),
            processing_time_seconds: processing_time,
            files_analyzed: files.len(),
            model_used: self.generator.model_name().to_string(),
            branch_used: branch,
            metadata,
            repo_info: repo,
            header_banner_url: header,
            conclusion_banner_url: conclusion,
            dual_banners_enabled: banners_enabled,
        })
    }

    async fn draft(
        &self,
        repo: &RepositoryReference,
        metadata: &ProjectMetadata,
        files: &[FileEntry],
        tone: Option<&str>,
        header: Option<&str>,
        conclusion: Option<&str>,
    ) -> String {
        let prompt = PromptBuilder::new(repo, metadata, files)
            .tone(tone)
            .banners(header, conclusion)
            .build();

        match self.generator.generate(&prompt).await {
            Ok(raw) => {
                let cleaned = sanitize(&raw);
                if cleaned.is_empty() {
                    warn!("Model output for {} was empty after cleanup, using fallback", repo.full_name());
                    fallback_readme(&repo.name, &repo.url, header, conclusion)
                } else {
                    cleaned
                }
            }
            Err(e) => {
                if e.is_fatal() {
                    error!("Generation failed for {}: {}", repo.full_name(), e);
                } else {
                    warn!("Generation for {} hit a transient error: {}", repo.full_name(), e);
                }
                fallback_readme(&repo.name, &repo.url, header, conclusion)
            }
        }
    }

    /// Banner URLs and metadata for a repository; no generation
    pub async fn preview_banners(&self, owner: &str, repo: &str, config: &BannerConfig) -> Result<BannerPreview> {
        preview_banners(&self.github, &self.banners, owner, repo, config).await
    }
}

/// Fetches enough of the repository to infer metadata and builds both banner URLs
///
/// Falls back to [`ProjectMetadata::fallback`] when no file could be fetched.
pub async fn preview_banners(
    github: &GitHubClient,
    banners: &BannerBuilder,
    owner: &str,
    repo: &str,
    config: &BannerConfig,
) -> Result<BannerPreview> {
    validate_name("owner", owner.trim())?;
    validate_name("repo", repo.trim())?;
    let repo = github.repo_info(owner.trim(), repo.trim());
    let branch = github.default_branch(&repo).await;
    let tree = github.repo_tree(&repo, &branch).await;
    let files = github.fetch_source_files(&repo, &tree, &branch).await;

    let metadata = if files.is_empty() {
        warn!("No files fetched for {}, previewing with fallback metadata", repo.full_name());
        ProjectMetadata::fallback()
    } else {
        infer_metadata(&files)
    };

    let (header, conclusion) = banners.dual_banners(&repo, &metadata, config);
    Ok(BannerPreview {
        header_banner_url: header,
        conclusion_banner_url: conclusion,
        metadata,
    })
}

/// Minimal README used when the model is unavailable
pub fn fallback_readme(name: &str, url: &str, header: Option<&str>, conclusion: Option<&str>) -> String {
    let header = header.map(|h| format!("![Header]({})\n\n", h)).unwrap_or_default();
    let conclusion = conclusion
        .map(|c| format!("\n\n![Conclusion]({})", c))
        .unwrap_or_default();

    format!(
        "{header}# {name}

A project hosted at {url}

## About

This project is currently being analysed. Please check back later for a comprehensive README.

## Quick Start

```bash
git clone {url}
cd {name}
```

## Contributing

Contributions are welcome! Please feel free to submit a Pull Request.

## License

Please check the repository for licence information.{conclusion}
"
    )
}
