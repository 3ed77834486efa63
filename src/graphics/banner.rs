//! Banner image URLs for generated READMEs.
//!
//! The header is a capsule-render gradient, the conclusion an animated
//! typing-svg. Both are plain URLs: nothing here touches the network.

use super::{lookup, BannerConfig, BannerStyle, FONTS, THEMES};
use crate::github::RepositoryReference;
use crate::metadata::ProjectMetadata;
use url::form_urlencoded::Serializer;

const CAPSULE_BASE: &str = "https://capsule-render.vercel.app/api";
const TYPING_BASE: &str = "https://readme-typing-svg.demolab.com/";
const FALLBACK_HEADER_COLOR: &str = "timeAuto";
const DEFAULT_TYPING_COLOR: &str = "667eea";
const DESC_STACK_ENTRIES: usize = 3;

/// Language → capsule gradient and typing color
const LANGUAGE_COLORS: &[(&str, &str, &str)] = &[
    ("Python", "0:3776AB,100:FFD43B", "3776AB"),
    ("JavaScript", "0:F7DF1E,100:323330", "F7DF1E"),
    ("TypeScript", "0:3178C6,100:007ACC", "3178C6"),
    ("Java", "0:ED8B00,100:FF6B35", "ED8B00"),
    ("Go", "0:00ADD8,100:5DC9E2", "00ADD8"),
    ("Rust", "0:CE422B,100:A72145", "CE422B"),
    ("C++", "0:00599C,100:659AD2", "00599C"),
    ("C#", "0:239120,100:512BD4", "239120"),
    ("PHP", "0:777BB4,100:8892BF", "777BB4"),
    ("Ruby", "0:CC342D,100:FE1616", "CC342D"),
    ("Swift", "0:FA7343,100:FF8C00", "FA7343"),
    ("Kotlin", "0:7F52FF,100:0095D5", "7F52FF"),
];

/// Builds header and conclusion banner URLs
#[derive(Debug, Clone)]
pub struct BannerBuilder {
    capsule_base: String,
    typing_base: String,
}

impl Default for BannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BannerBuilder {
    /// Builder pointing at the public capsule-render and typing-svg services
    pub fn new() -> Self {
        Self {
            capsule_base: CAPSULE_BASE.to_string(),
            typing_base: TYPING_BASE.to_string(),
        }
    }

    /// Returns `(header_url, conclusion_url)`
    pub fn dual_banners(
        &self,
        repo: &RepositoryReference,
        metadata: &ProjectMetadata,
        config: &BannerConfig,
    ) -> (String, String) {
        let title = display_title(repo, config);
        (
            self.header_url(&title, metadata, config),
            self.conclusion_url(&title, metadata, config),
        )
    }

    /// capsule-render header with title and a one-line description
    pub fn header_url(&self, title: &str, metadata: &ProjectMetadata, config: &BannerConfig) -> String {
        let (kind, height) = BannerStyle::parse(&config.style).capsule_params();
        let color = language_colors(&metadata.primary_language)
            .map(|(gradient, _)| gradient)
            .or_else(|| lookup(THEMES, &config.theme))
            .unwrap_or(FALLBACK_HEADER_COLOR);

        let query = Serializer::new(String::new())
            .append_pair("type", kind)
            .append_pair("color", color)
            .append_pair("height", height)
            .append_pair("section", "header")
            .append_pair("text", title)
            .append_pair("fontSize", "50")
            .append_pair("fontColor", "ffffff")
            .append_pair("fontAlign", "50")
            .append_pair("fontAlignY", "40")
            .append_pair("desc", &description(metadata))
            .append_pair("descSize", "18")
            .append_pair("descAlign", "50")
            .append_pair("descAlignY", "65")
            .append_pair("animation", "fadeIn")
            .finish();

        format!("{}?{}", self.capsule_base, query)
    }

    /// typing-svg conclusion cycling through three closing lines
    pub fn conclusion_url(&self, title: &str, metadata: &ProjectMetadata, config: &BannerConfig) -> String {
        let lines = [
            format!("Thanks for checking out {}!", title),
            "Star this repo if you found it helpful".to_string(),
            "Built with love for the developer community".to_string(),
        ]
        .join(";");
        let font = lookup(FONTS, &config.font).unwrap_or(config.font.as_str());
        let color = language_colors(&metadata.primary_language)
            .map(|(_, single)| single)
            .unwrap_or(DEFAULT_TYPING_COLOR);

        let query = Serializer::new(String::new())
            .append_pair("lines", &lines)
            .append_pair("font", font)
            .append_pair("size", "20")
            .append_pair("duration", "3500")
            .append_pair("pause", "1500")
            .append_pair("color", color)
            .append_pair("center", "true")
            .append_pair("width", "600")
            .append_pair("height", "60")
            .finish();

        format!("{}?{}", self.typing_base, query)
    }
}

/// Custom title when given, otherwise the prettified repository name
pub fn display_title(repo: &RepositoryReference, config: &BannerConfig) -> String {
    match config.custom_title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => title_case(&repo.name.replace(['-', '_'], " ")),
    }
}

/// Upper-cases the first letter of every run of letters and lower-cases the rest
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn description(metadata: &ProjectMetadata) -> String {
    let mut desc = format!(
        "⚡ {} {}",
        metadata.primary_language,
        title_case(metadata.project_type.as_str())
    );
    let stack: Vec<&str> = metadata
        .tech_stack
        .iter()
        .take(DESC_STACK_ENTRIES)
        .map(String::as_str)
        .collect();
    if !stack.is_empty() {
        desc.push_str(" • ");
        desc.push_str(&stack.join(" + "));
    }
    desc
}

fn language_colors(language: &str) -> Option<(&'static str, &'static str)> {
    LANGUAGE_COLORS
        .iter()
        .find(|(lang, _, _)| *lang == language)
        .map(|(_, gradient, single)| (*gradient, *single))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ProjectType;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use url::Url;

    fn python_api() -> ProjectMetadata {
        ProjectMetadata {
            primary_language: "Python".to_string(),
            project_type: ProjectType::Api,
            tech_stack: vec!["Python".to_string(), "FastAPI".to_string()],
            frameworks: vec!["FastAPI".to_string()],
        }
    }

    fn query(url: &str) -> HashMap<String, String> {
        Url::parse(url).unwrap().query_pairs().into_owned().collect()
    }

    #[test]
    fn test_header_parameters() {
        let repo = RepositoryReference::new("acme", "my-cool_project");
        let (header, _) = BannerBuilder::new().dual_banners(&repo, &python_api(), &BannerConfig::default());

        assert!(header.starts_with("https://capsule-render.vercel.app/api?type=soft&"));
        let params = query(&header);
        assert_eq!(params["text"], "My Cool Project");
        assert_eq!(params["color"], "0:3776AB,100:FFD43B");
        assert_eq!(params["height"], "150");
        assert_eq!(params["desc"], "⚡ Python Api • Python + FastAPI");
        assert_eq!(params["animation"], "fadeIn");
    }

    #[test]
    fn test_conclusion_parameters() {
        let repo = RepositoryReference::new("acme", "widget");
        let config = BannerConfig { font: "fira".to_string(), ..BannerConfig::default() };
        let (_, conclusion) = BannerBuilder::new().dual_banners(&repo, &python_api(), &config);

        assert!(conclusion.starts_with("https://readme-typing-svg.demolab.com/?lines="));
        let params = query(&conclusion);
        assert_eq!(
            params["lines"],
            "Thanks for checking out Widget!;Star this repo if you found it helpful;Built with love for the developer community"
        );
        assert_eq!(params["font"], "Fira Code");
        assert_eq!(params["color"], "3776AB");
        assert_eq!(params["center"], "true");
    }

    #[test]
    fn test_unknown_language_uses_theme_then_defaults() {
        let repo = RepositoryReference::new("acme", "notes");
        let metadata = ProjectMetadata::fallback();
        let config = BannerConfig {
            theme: "matrix".to_string(),
            font: "Comic Sans".to_string(),
            style: "minimal".to_string(),
            ..BannerConfig::default()
        };
        let (header, conclusion) = BannerBuilder::new().dual_banners(&repo, &metadata, &config);

        let header = query(&header);
        assert_eq!(header["color"], "0:0a0a0a,100:1a1a1a");
        assert_eq!(header["type"], "rect");
        assert_eq!(header["height"], "120");
        assert_eq!(header["desc"], "⚡ Unknown Library • Unknown");

        let conclusion = query(&conclusion);
        assert_eq!(conclusion["font"], "Comic Sans");
        assert_eq!(conclusion["color"], "667eea");

        let config = BannerConfig { theme: "sunrise".to_string(), ..BannerConfig::default() };
        let (header, _) = BannerBuilder::new().dual_banners(&repo, &metadata, &config);
        assert_eq!(query(&header)["color"], "timeAuto");
    }

    #[test]
    fn test_custom_title_overrides_name() {
        let repo = RepositoryReference::new("acme", "svc");
        let config = BannerConfig { custom_title: Some("Acme Service".to_string()), ..BannerConfig::default() };
        let (header, conclusion) = BannerBuilder::new().dual_banners(&repo, &python_api(), &config);

        assert_eq!(query(&header)["text"], "Acme Service");
        assert!(query(&conclusion)["lines"].starts_with("Thanks for checking out Acme Service!"));
        // spaces are form-encoded
        assert!(header.contains("text=Acme+Service"));
    }

    #[test]
    fn test_banners_are_pure() {
        let repo = RepositoryReference::new("acme", "widget");
        let builder = BannerBuilder::new();
        let first = builder.dual_banners(&repo, &python_api(), &BannerConfig::default());
        let second = builder.dual_banners(&repo, &python_api(), &BannerConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("web_app"), "Web_App");
        assert_eq!(title_case("hello WORLD 2d"), "Hello World 2D");
    }
}
