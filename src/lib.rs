#![warn(clippy::all)]

//! readmesmith - README generation for GitHub repositories
//!
//! Fetches a bounded, prioritized subset of a repository's files, infers what
//! kind of project it is, drafts a README with an OpenAI-compatible model and
//! stores the cleaned result on disk.
//!
//! ## Features
//! - Tiered file selection with concurrent content fetching
//! - Heuristic language, framework and project-type detection
//! - Header and conclusion banner URLs (capsule-render, typing-svg)
//! - Output cleanup of reasoning blocks and fences
//! - HTTP API (axum) and command-line front ends
//!
//! ## Usage
//! ```rust,ignore
//! use readmesmith::{Config, ReadmeService, GenerateRequest};
//! use std::sync::Arc;
//!
//! async fn example() -> readmesmith::Result<()> {
//!     let config = Config::load(None)?;
//!     let service = ReadmeService::new(
//!         readmesmith::github::GitHubClient::new(&config)?,
//!         Arc::new(readmesmith::OpenAIAgent::new(&config.llm)?),
//!         readmesmith::graphics::BannerBuilder::new(),
//!         readmesmith::output_store::ReadmeStore::new(&config.output_dir)?,
//!     );
//!     let readme = service.generate(GenerateRequest::new("rust-lang", "log")).await?;
//!     println!("{}", readme.file_path);
//!     Ok(())
//! }
//! ```

/// Configuration loading and environment overrides
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Logging configuration and utilities
pub mod logging;
/// GitHub source fetching and file selection
pub mod github;
/// Parallel processing utilities
pub mod parallel;
/// Project metadata inference
pub mod metadata;
/// Banner options and URL building
pub mod graphics;
/// Generation prompt assembly
pub mod prompts;
/// Language-model clients
pub mod agents;
/// Model output cleanup
pub mod sanitizer;
/// Persistence of generated READMEs
pub mod output_store;
/// The generation pipeline
pub mod orchestrator;
/// REST API functionality for web service
pub mod api;

// Re-export common types
pub use agents::{OpenAIAgent, TextGenerator};
pub use config::Config;
pub use error::{ReadmeError, Result};
pub use graphics::BannerConfig;
pub use metadata::{infer_metadata, ProjectMetadata, ProjectType};
pub use orchestrator::{GenerateRequest, GeneratedReadme, ReadmeService};
pub use sanitizer::sanitize;
