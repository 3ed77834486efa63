//! Heuristic project metadata inference.
//!
//! Everything here is a pure function of the fetched files: same input in the
//! same order gives the same [`ProjectMetadata`].

use crate::github::selection::base_name;
use crate::github::FileEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

const UNKNOWN_LANGUAGE: &str = "Unknown";
const MAX_TECH_STACK: usize = 5;
const MAX_FRAMEWORKS: usize = 3;

const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("py", "Python"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("java", "Java"),
    ("go", "Go"),
    ("rs", "Rust"),
    ("cpp", "C++"),
    ("cc", "C++"),
    ("cxx", "C++"),
    ("kt", "Kotlin"),
    ("swift", "Swift"),
    ("dart", "Dart"),
    ("rb", "Ruby"),
    ("cs", "C#"),
    ("php", "PHP"),
];

/// Manifest basenames (lowercase) and the keyword → label table scanned in each
const FRAMEWORK_MARKERS: &[(&[&str], &[(&str, &str)])] = &[
    (
        &["requirements.txt", "pyproject.toml", "setup.py"],
        &[
            ("fastapi", "FastAPI"),
            ("django", "Django"),
            ("flask", "Flask"),
            ("streamlit", "Streamlit"),
        ],
    ),
    (
        &["package.json"],
        &[
            ("react", "React"),
            ("vue", "Vue.js"),
            ("angular", "Angular"),
            ("express", "Express.js"),
            ("next", "Next.js"),
        ],
    ),
    (
        &["cargo.toml"],
        &[
            ("actix-web", "Actix Web"),
            ("axum", "Axum"),
            ("rocket", "Rocket"),
        ],
    ),
    (
        &["go.mod"],
        &[
            ("gin-gonic", "Gin"),
            ("labstack/echo", "Echo"),
            ("gofiber", "Fiber"),
        ],
    ),
    (
        &["pom.xml", "build.gradle"],
        &[("spring-boot", "Spring Boot")],
    ),
];

const ENTRY_POINTS: &[&str] = &[
    "main.py", "app.py", "server.py", "main.go", "main.rs", "server.js", "server.ts",
];

const WEB_ENTRY_POINTS: &[&str] = &["index.html", "app.js"];

const BACKEND_FRAMEWORKS: &[&str] = &[
    "FastAPI", "Flask", "Django", "Express.js", "Actix Web", "Axum", "Rocket",
    "Gin", "Echo", "Fiber", "Spring Boot",
];

const FRONTEND_FRAMEWORKS: &[&str] = &["React", "Vue.js", "Angular", "Next.js"];

/// Broad category of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// HTTP/RPC backend
    Api,
    /// Browser application
    WebApp,
    /// Command-line program
    CliTool,
    /// Reusable package
    Library,
    /// Mobile application
    MobileApp,
    /// Desktop application
    DesktopApp,
    /// Notebooks, models and analysis
    DataScience,
    /// Game
    Game,
    /// Anything else
    Other,
}

impl ProjectType {
    /// Snake-case identifier, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::WebApp => "web_app",
            Self::CliTool => "cli_tool",
            Self::Library => "library",
            Self::MobileApp => "mobile_app",
            Self::DesktopApp => "desktop_app",
            Self::DataScience => "data_science",
            Self::Game => "game",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inferred description of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Most common language by file count, or `Unknown`
    pub primary_language: String,
    /// Project category
    pub project_type: ProjectType,
    /// Primary language followed by detected frameworks, at most 5
    pub tech_stack: Vec<String>,
    /// Detected frameworks in detection order, at most 3
    pub frameworks: Vec<String>,
}

impl ProjectMetadata {
    /// Metadata used when nothing could be inferred
    pub fn fallback() -> Self {
        Self {
            primary_language: UNKNOWN_LANGUAGE.to_string(),
            project_type: ProjectType::Library,
            tech_stack: vec![UNKNOWN_LANGUAGE.to_string()],
            frameworks: Vec::new(),
        }
    }
}

/// Infers metadata from fetched files
pub fn infer_metadata(files: &[FileEntry]) -> ProjectMetadata {
    let primary_language = detect_primary_language(files);
    let frameworks = detect_frameworks(files);

    let mut tech_stack = frameworks.clone();
    if !tech_stack.contains(&primary_language) {
        tech_stack.insert(0, primary_language.clone());
    }

    let project_type = classify(files, &frameworks);

    tech_stack.truncate(MAX_TECH_STACK);
    let mut frameworks = frameworks;
    frameworks.truncate(MAX_FRAMEWORKS);

    ProjectMetadata {
        primary_language,
        project_type,
        tech_stack,
        frameworks,
    }
}

/// Canonical language for a path's extension
pub fn language_for_path(path: &str) -> Option<&'static str> {
    let name = base_name(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let ext = ext.to_lowercase();
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
}

/// Language with the highest file count; ties go to the first seen
pub fn detect_primary_language(files: &[FileEntry]) -> String {
    let counts = files
        .iter()
        .filter_map(|f| language_for_path(&f.path))
        .fold(Vec::<(&str, usize)>::new(), |mut acc, lang| {
            match acc.iter().position(|(l, _)| *l == lang) {
                Some(i) => acc[i].1 += 1,
                None => acc.push((lang, 1)),
            }
            acc
        });

    counts
        .iter()
        .fold(None::<(&str, usize)>, |best, &(lang, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((lang, n)),
        })
        .map(|(lang, _)| lang.to_string())
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string())
}

/// Framework labels found in manifest files, in detection order, without duplicates
pub fn detect_frameworks(files: &[FileEntry]) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            let name = base_name(&file.path).to_lowercase();
            let content = file.content.to_lowercase();
            FRAMEWORK_MARKERS
                .iter()
                .filter(move |(manifests, _)| manifests.contains(&name.as_str()))
                .flat_map(|(_, markers)| markers.iter())
                .filter(move |(keyword, _)| content.contains(keyword))
                .map(|(_, label)| *label)
                .collect::<Vec<_>>()
        })
        .fold(Vec::new(), |mut found: Vec<String>, label| {
            if !found.iter().any(|f| f == label) {
                found.push(label.to_string());
            }
            found
        })
}

/// Project type from entry points and detected frameworks
pub fn classify(files: &[FileEntry], frameworks: &[String]) -> ProjectType {
    let has_file = |names: &[&str]| files.iter().any(|f| names.contains(&base_name(&f.path)));
    let uses_any = |set: &[&str]| frameworks.iter().any(|fw| set.contains(&fw.as_str()));

    if has_file(ENTRY_POINTS) {
        if uses_any(BACKEND_FRAMEWORKS) {
            ProjectType::Api
        } else {
            ProjectType::CliTool
        }
    } else if has_file(WEB_ENTRY_POINTS) || uses_any(FRONTEND_FRAMEWORKS) {
        ProjectType::WebApp
    } else {
        ProjectType::Library
    }
}
