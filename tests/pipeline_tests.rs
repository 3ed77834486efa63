use mockito::Server;
use pretty_assertions::assert_eq;
use readmesmith::error::ReadmeError;
use readmesmith::graphics::BannerConfig;
use readmesmith::orchestrator::fallback_readme;
use readmesmith::{GenerateRequest, ProjectType};
use std::sync::Arc;
use tempfile::TempDir;

mod common;
use common::*;

const REACT_PACKAGE: &str = r#"{"name": "shop", "dependencies": {"react": "^18.2.0", "react-dom": "^18.2.0"}}"#;

#[tokio::test]
async fn test_react_repository_is_web_app() {
    setup_test_logger();
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;
    let _mocks = mock_repository(
        &mut server,
        "acme",
        "shop",
        &[
            ("package.json", REACT_PACKAGE),
            ("index.html", "<div id=\"root\"></div>"),
            ("src/App.js", "export default function App() { return null; }"),
            ("node_modules/react/index.js", "module.exports = {};"),
        ],
    )
    .await;

    let generator = Arc::new(FakeGenerator::new(
        "<scratchpad>\nweb shop\n</scratchpad>\n\n```markdown\n# Shop\n\nA storefront.\n```",
    ));
    let service = service_with(&server, temp_dir.path(), generator.clone());

    let readme = service.generate(GenerateRequest::new("acme", "shop")).await.unwrap();

    assert_eq!(readme.metadata.project_type, ProjectType::WebApp);
    assert_eq!(readme.metadata.primary_language, "JavaScript");
    assert_eq!(readme.metadata.tech_stack[0], "JavaScript");
    assert!(readme.metadata.frameworks.contains(&"React".to_string()));
    assert_eq!(readme.files_analyzed, 3);
    assert_eq!(readme.branch_used, "main");
    assert_eq!(readme.model_used, FAKE_MODEL);
    assert_eq!(readme.content, "# Shop\n\nA storefront.");
    assert_eq!(readme.length, readme.content.chars().count());
    assert!(readme.dual_banners_enabled);

    let header = readme.header_banner_url.as_deref().unwrap();
    assert!(header.starts_with("https://capsule-render.vercel.app/api?"));
    assert!(readme.conclusion_banner_url.is_some());

    let saved = std::fs::read_to_string(&readme.file_path).unwrap();
    assert_eq!(saved, readme.content);

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("==== FILE: package.json ===="));
    assert!(prompt.contains(header));
    assert!(!prompt.contains("node_modules"));
}

#[tokio::test]
async fn test_fastapi_repository_is_api() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;
    let _mocks = mock_repository(
        &mut server,
        "acme",
        "orders",
        &[
            ("requirements.txt", "fastapi==0.110.0\nuvicorn\n"),
            ("main.py", "from fastapi import FastAPI\napp = FastAPI()\n"),
            ("orders/models.py", "class Order: ...\n"),
        ],
    )
    .await;

    let service = service_with(&server, temp_dir.path(), Arc::new(FakeGenerator::new("# Orders")));
    let mut request = GenerateRequest::new("acme", "orders");
    request.banner_config = BannerConfig { include_banner: false, ..BannerConfig::default() };

    let readme = service.generate(request).await.unwrap();

    assert_eq!(readme.metadata.project_type, ProjectType::Api);
    assert_eq!(readme.metadata.tech_stack, vec!["Python".to_string(), "FastAPI".to_string()]);
    assert_eq!(readme.metadata.frameworks, vec!["FastAPI".to_string()]);
    assert!(!readme.dual_banners_enabled);
    assert_eq!(readme.header_banner_url, None);
    assert_eq!(readme.conclusion_banner_url, None);
    assert_eq!(readme.content, "# Orders");
}

#[tokio::test]
async fn test_empty_repository_fails_without_persisting() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;
    let _mocks = mock_repository(&mut server, "acme", "empty", &[("LICENSE", "MIT")]).await;

    let service = service_with(&server, temp_dir.path(), Arc::new(FakeGenerator::new("# Never")));
    let result = service.generate(GenerateRequest::new("acme", "empty")).await;

    assert!(matches!(result, Err(ReadmeError::NoSourceFiles(_))));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_traversal_owner_is_rejected_before_fetching() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("out");
    let mut server = Server::new_async().await;
    let _mocks = mock_repository(&mut server, "acme", "shop", &[("index.html", "<html></html>")]).await;

    let service = service_with(&server, &output, Arc::new(FakeGenerator::new("# Shop")));
    let result = service.generate(GenerateRequest::new("../repos/acme", "shop")).await;

    assert!(matches!(result, Err(ReadmeError::Validation(_))));
    assert!(!temp_dir.path().join("repos").exists());
    assert_eq!(std::fs::read_dir(&output).unwrap().count(), 0);

    let preview = service.preview_banners("acme", "../shop", &BannerConfig::default()).await;
    assert!(matches!(preview, Err(ReadmeError::Validation(_))));
}

#[tokio::test]
async fn test_unreachable_github_degrades_then_fails() {
    let temp_dir = TempDir::new().unwrap();
    let server = Server::new_async().await;

    let service = service_with(&server, temp_dir.path(), Arc::new(FakeGenerator::new("# Never")));
    let err = service.generate(GenerateRequest::new("acme", "ghost")).await.unwrap_err();

    assert_eq!(err.to_string(), "No analysable source files found in acme/ghost");
}

#[tokio::test]
async fn test_generation_failure_uses_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;
    let _mocks = mock_repository(
        &mut server,
        "acme",
        "cli",
        &[("main.go", "package main\nfunc main() {}\n")],
    )
    .await;

    let service = service_with(&server, temp_dir.path(), Arc::new(FailingGenerator));
    let readme = service.generate(GenerateRequest::new("acme", "cli")).await.unwrap();

    let expected = fallback_readme(
        "cli",
        "https://github.com/acme/cli",
        readme.header_banner_url.as_deref(),
        readme.conclusion_banner_url.as_deref(),
    );
    assert_eq!(readme.content, expected);
    assert!(readme.content.starts_with("![Header](https://capsule-render.vercel.app/api?"));
    assert_eq!(readme.metadata.project_type, ProjectType::CliTool);
    assert_eq!(std::fs::read_to_string(&readme.file_path).unwrap(), expected);
}

#[tokio::test]
async fn test_preview_uses_fallback_metadata_without_files() {
    let temp_dir = TempDir::new().unwrap();
    let server = Server::new_async().await;

    let service = service_with(&server, temp_dir.path(), Arc::new(FailingGenerator));
    let config = BannerConfig { style: "animated".to_string(), ..BannerConfig::default() };
    let preview = service.preview_banners("acme", "ghost-town", &config).await.unwrap();

    assert_eq!(preview.metadata.primary_language, "Unknown");
    assert!(preview.header_banner_url.contains("type=waving"));
    assert!(preview.header_banner_url.contains("text=Ghost+Town"));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_tone_reaches_prompt() {
    let temp_dir = TempDir::new().unwrap();
    let mut server = Server::new_async().await;
    let _mocks = mock_repository(&mut server, "acme", "lib", &[("src/lib.rs", "pub fn add() {}")]).await;

    let generator = Arc::new(FakeGenerator::new("# Lib"));
    let service = service_with(&server, temp_dir.path(), generator.clone());
    let mut request = GenerateRequest::new("acme", "lib");
    request.tone = Some("playful".to_string());
    request.banner_config.include_banner = false;

    let readme = service.generate(request).await.unwrap();
    assert_eq!(readme.metadata.project_type, ProjectType::Library);

    let prompt = generator.last_prompt().unwrap();
    assert!(prompt.contains("**playful** tone"));
    assert!(prompt.contains("Do NOT include any external images"));
}
