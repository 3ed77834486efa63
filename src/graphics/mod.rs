//! Banner configuration and the option tables exposed to clients.

pub mod banner;

pub use banner::BannerBuilder;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default font key
pub const DEFAULT_FONT: &str = "jetbrains";
/// Default theme key
pub const DEFAULT_THEME: &str = "github_dark";
/// Default style key
pub const DEFAULT_STYLE: &str = "professional";

/// Font key → font family used by the typing banner
pub const FONTS: &[(&str, &str)] = &[
    ("jetbrains", "JetBrains Mono"),
    ("fira", "Fira Code"),
    ("source", "Source Code Pro"),
    ("roboto", "Roboto Mono"),
    ("inter", "Inter"),
    ("poppins", "Poppins"),
];

/// Dark theme key → capsule gradient
pub const THEMES: &[(&str, &str)] = &[
    ("github_dark", "0:0d1117,100:21262d"),
    ("midnight", "0:0f0f23,100:1a1a2e"),
    ("cyberpunk", "0:0f3460,100:16213e"),
    ("obsidian", "0:1e1e1e,100:2d2d2d"),
    ("matrix", "0:0a0a0a,100:1a1a1a"),
    ("neon", "0:0f0f23,100:1a1a2e"),
    ("carbon", "0:161618,100:23252a"),
];

/// Style key → human description
pub const STYLES: &[(&str, &str)] = &[
    ("professional", "Soft capsule header"),
    ("animated", "Waving capsule header"),
    ("minimal", "Flat rectangular header"),
];

/// Caller-supplied banner settings
///
/// Values are not validated here; unknown keys fall through to defaults or are
/// passed on literally when the URLs are built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerConfig {
    /// Whether banners are rendered at all
    pub include_banner: bool,
    /// Font key (see [`FONTS`])
    pub font: String,
    /// Theme key (see [`THEMES`])
    pub theme: String,
    /// Style key: professional, animated or minimal
    pub style: String,
    /// Title replacing the prettified repository name
    pub custom_title: Option<String>,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            include_banner: true,
            font: DEFAULT_FONT.to_string(),
            theme: DEFAULT_THEME.to_string(),
            style: DEFAULT_STYLE.to_string(),
            custom_title: None,
        }
    }
}

/// Header banner style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerStyle {
    /// Soft capsule, 150px
    Professional,
    /// Waving capsule, 150px
    Animated,
    /// Rectangle, 120px
    Minimal,
}

impl BannerStyle {
    /// Lenient parse: unknown values render like `professional`
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "animated" => Self::Animated,
            "minimal" => Self::Minimal,
            _ => Self::Professional,
        }
    }

    /// capsule-render `type` and `height` parameters
    pub fn capsule_params(&self) -> (&'static str, &'static str) {
        match self {
            Self::Professional => ("soft", "150"),
            Self::Animated => ("waving", "150"),
            Self::Minimal => ("rect", "120"),
        }
    }
}

impl fmt::Display for BannerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Professional => "professional",
            Self::Animated => "animated",
            Self::Minimal => "minimal",
        };
        f.write_str(name)
    }
}

/// Option tables returned by the banner-options endpoint
#[derive(Debug, Clone, Serialize)]
pub struct BannerOptions {
    /// Font keys and families
    pub fonts: Vec<BannerOption>,
    /// Theme keys and gradients
    pub themes: Vec<BannerOption>,
    /// Style keys and descriptions
    pub styles: Vec<BannerOption>,
    /// Defaults applied when a request omits a value
    pub defaults: BannerConfig,
}

/// A single selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerOption {
    /// Key sent by clients
    pub key: String,
    /// Display value
    pub value: String,
}

fn to_options(table: &[(&str, &str)]) -> Vec<BannerOption> {
    table
        .iter()
        .map(|(key, value)| BannerOption { key: key.to_string(), value: value.to_string() })
        .collect()
}

/// Enumerated font, theme and style choices with their defaults
pub fn banner_options() -> BannerOptions {
    BannerOptions {
        fonts: to_options(FONTS),
        themes: to_options(THEMES),
        styles: to_options(STYLES),
        defaults: BannerConfig::default(),
    }
}

/// Looks up a key in one of the option tables
pub fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse_is_lenient() {
        assert_eq!(BannerStyle::parse("Animated"), BannerStyle::Animated);
        assert_eq!(BannerStyle::parse("minimal"), BannerStyle::Minimal);
        assert_eq!(BannerStyle::parse("sparkly"), BannerStyle::Professional);
        assert_eq!(BannerStyle::Minimal.capsule_params(), ("rect", "120"));
    }

    #[test]
    fn test_banner_config_defaults_fill_missing_fields() {
        let config: BannerConfig = serde_json::from_str(r#"{"style": "minimal"}"#).unwrap();
        assert!(config.include_banner);
        assert_eq!(config.font, DEFAULT_FONT);
        assert_eq!(config.theme, DEFAULT_THEME);
        assert_eq!(config.style, "minimal");
    }

    #[test]
    fn test_options_cover_defaults() {
        let options = banner_options();
        assert!(options.fonts.iter().any(|o| o.key == options.defaults.font));
        assert!(options.themes.iter().any(|o| o.key == options.defaults.theme));
        assert!(options.styles.iter().any(|o| o.key == options.defaults.style));
        assert_eq!(lookup(FONTS, "fira"), Some("Fira Code"));
        assert_eq!(lookup(THEMES, "unknown"), None);
    }
}
