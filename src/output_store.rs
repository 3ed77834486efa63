//! Flat on-disk store for generated READMEs.

use crate::error::{ReadmeError, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

const README_EXTENSION: &str = "md";

/// A persisted README as shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// File name inside the output directory
    pub name: String,
    /// Full path
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Creation time, or modification time where creation is unavailable
    pub created: DateTime<Utc>,
}

/// Detailed description of one persisted README
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Full path
    pub file_path: PathBuf,
    /// File name inside the output directory
    pub file_name: String,
    /// Size in bytes
    pub file_size: u64,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub modified_at: DateTime<Utc>,
}

/// Output directory holding `{owner}-{repo}-{unix_ts}.md` files
#[derive(Debug, Clone)]
pub struct ReadmeStore {
    output_dir: PathBuf,
}

impl ReadmeStore {
    /// Opens the store, creating the directory when missing
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Directory the READMEs live in
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes `content` and returns the new file's path
    pub async fn save(&self, owner: &str, repo: &str, content: &str) -> Result<PathBuf> {
        let file_name = format!("{}-{}-{}.{}", owner, repo, Utc::now().timestamp(), README_EXTENSION);
        if !is_single_component(&file_name) {
            return Err(ReadmeError::Validation(format!("Invalid file name: {}", file_name)));
        }
        let path = self.output_dir.join(file_name);
        fs::write(&path, content).await?;
        info!("README saved to {}", path.display());
        Ok(path)
    }

    /// Persisted READMEs, newest first
    pub async fn list(&self) -> Result<Vec<StoredFile>> {
        let mut files = Vec::new();
        let mut entries = fs::read_dir(&self.output_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(README_EXTENSION) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            files.push(StoredFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                path,
                size: metadata.len(),
                created: created_time(&metadata),
            });
        }

        files.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| b.name.cmp(&a.name)));
        Ok(files)
    }

    /// Content of a stored README
    pub async fn read(&self, name: &str) -> Result<String> {
        let path = self.existing_path(name).await?;
        Ok(fs::read_to_string(path).await?)
    }

    /// Size and timestamps of a stored README
    pub async fn info(&self, name: &str) -> Result<FileInfo> {
        let path = self.existing_path(name).await?;
        let metadata = fs::metadata(&path).await?;
        Ok(FileInfo {
            file_name: file_name_of(&path),
            file_size: metadata.len(),
            created_at: created_time(&metadata),
            modified_at: metadata.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now()),
            file_path: path,
        })
    }

    /// Removes a stored README
    pub async fn delete(&self, name: &str) -> Result<()> {
        let path = self.existing_path(name).await?;
        fs::remove_file(&path).await?;
        info!("Deleted {}", path.display());
        Ok(())
    }

    /// Resolves a caller-supplied name inside the output directory
    ///
    /// Only the final path component is used, so `../x.md` resolves to `x.md`.
    async fn existing_path(&self, name: &str) -> Result<PathBuf> {
        let base = Path::new(name)
            .file_name()
            .ok_or_else(|| ReadmeError::Validation(format!("Invalid file name: {}", name)))?;
        let path = self.output_dir.join(base);
        match fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(ReadmeError::NotFound(base.to_string_lossy().into_owned())),
        }
    }
}

fn created_time(metadata: &Metadata) -> DateTime<Utc> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| DateTime::<Utc>::from(SystemTime::UNIX_EPOCH))
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Formats a file size in bytes to a human-readable string (KB, MB, etc.)
pub fn format_file_size(size: u64) -> String {
    if size < 1024 {
        format!("{}B", size)
    } else if size < 1024 * 1024 {
        format!("{:.1}KB", size as f64 / 1024.0)
    } else {
        format!("{:.1}MB", size as f64 / 1024.0 / 1024.0)
    }
}
