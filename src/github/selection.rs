//! File selection heuristic for repository trees.
//!
//! Picks a bounded, prioritized subset of the recursive tree: manifests first,
//! then source files whose names suggest core roles, then remaining source files.

use super::TreeEntry;

/// Path segments that exclude an entry entirely
pub const SKIP_DIRS: &[&str] = &[
    ".git", "node_modules", "vendor", "__pycache__",
    ".next", "dist", "build", ".venv", "venv", "pods",
    ".flutter-plugins", ".dart_tool", "test", "tests",
    "spec", "docs", "assets", "public", ".idea", ".vscode",
    "migrations", "alembic",
];

/// Well-known manifest and config files, fetched before any source file
pub const PRIORITY_FILES: &[&str] = &[
    "package.json", "requirements.txt", "Cargo.toml", "go.mod", "pom.xml",
    "composer.json", "Gemfile", "setup.py", "pyproject.toml", "Dockerfile",
    "docker-compose.yml", "README.md", "README.txt", "README",
    "AndroidManifest.xml", "build.gradle", "app/build.gradle",
    "gradle.properties", "settings.gradle", "proguard-rules.pro",
    "Info.plist", "Podfile", "Podfile.lock", "project.pbxproj",
    "AppDelegate.swift", "AppDelegate.m", "SceneDelegate.swift",
    "pubspec.yaml", "pubspec.lock", "analysis_options.yaml",
    "lib/main.dart", "android/app/build.gradle", "ios/Runner/Info.plist",
];

/// Manifests kept at full length
pub const CRITICAL_FILES: &[&str] = &[
    "build.gradle", "app/build.gradle", "package.json", "pubspec.yaml",
    "AndroidManifest.xml", "Info.plist", "Podfile", "requirements.txt",
    "pom.xml", "Cargo.toml", "go.mod",
];

/// Recognized source-code extensions
pub const CODE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".go", ".rs",
    ".php", ".rb", ".cpp", ".c", ".h", ".cs", ".swift", ".kt",
    ".dart", ".m", ".mm", ".scala", ".clj", ".ex", ".exs",
    ".html", ".css",
];

/// Filename fragments suggesting routing, service, configuration or entry-point roles
pub const HIGH_VALUE_MARKERS: &[&str] = &[
    "controller", "service", "route", "api", "app",
    "main", "index", "config", "handler", "manager",
    "server", "core",
];

/// Files selected from a tree, split by tier
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Manifest/config files
    pub priority: Vec<String>,
    /// Source files with a high-value name
    pub high_value: Vec<String>,
    /// Any other source file
    pub secondary: Vec<String>,
}

impl Selection {
    /// Concatenates the tiers in precedence order and keeps at most `max_files`
    pub fn into_capped(self, max_files: usize) -> Vec<String> {
        self.priority
            .into_iter()
            .chain(self.high_value)
            .chain(self.secondary)
            .take(max_files)
            .collect()
    }
}

/// Partitions the tree into priority, high-value and secondary tiers
pub fn partition(tree: &[TreeEntry]) -> Selection {
    let mut selection = Selection::default();

    for entry in tree.iter().filter(|e| e.is_blob()) {
        let path = entry.path.as_str();
        let path_lower = path.to_lowercase();
        let name_lower = base_name(&path_lower);

        if path_lower.split('/').any(|segment| SKIP_DIRS.contains(&segment)) {
            continue;
        }

        let is_priority = PRIORITY_FILES
            .iter()
            .any(|p| p.eq_ignore_ascii_case(name_lower) || *p == path);

        if is_priority {
            selection.priority.push(path.to_string());
        } else if is_code_file(&path_lower) {
            if HIGH_VALUE_MARKERS.iter().any(|m| name_lower.contains(m)) {
                selection.high_value.push(path.to_string());
            } else {
                selection.secondary.push(path.to_string());
            }
        }
    }

    selection
}

/// Selects at most `max_files` paths, priority tier first, then high-value, then secondary
pub fn select_files(tree: &[TreeEntry], max_files: usize) -> Vec<String> {
    partition(tree).into_capped(max_files)
}

/// Whether a fetched file is exempt from truncation
pub fn is_critical(path: &str) -> bool {
    CRITICAL_FILES.iter().any(|c| path.contains(c))
}

/// Keeps critical files whole and truncates everything else to `limit` characters
pub fn bound_content(path: &str, content: String, limit: usize) -> String {
    if is_critical(path) {
        content
    } else {
        truncate_chars(&content, limit).to_string()
    }
}

/// Truncates to at most `limit` characters without splitting a code point
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Last path segment
pub fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn is_code_file(path_lower: &str) -> bool {
    CODE_EXTENSIONS.iter().any(|ext| path_lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn blob(path: &str) -> TreeEntry {
        TreeEntry::blob(path)
    }

    #[test]
    fn test_tiers_are_ordered() {
        let tree = vec![
            blob("src/utils.py"),
            blob("src/api_routes.py"),
            TreeEntry::tree("src"),
            blob("requirements.txt"),
            blob("README.md"),
            blob("LICENSE"),
        ];

        let selected = select_files(&tree, 45);
        assert_eq!(
            selected,
            vec!["requirements.txt", "README.md", "src/api_routes.py", "src/utils.py"]
        );
    }

    #[test_case("node_modules/react/index.js" ; "dependency directory")]
    #[test_case("tests/test_main.py" ; "test directory")]
    #[test_case("web/public/index.html" ; "static assets")]
    #[test_case(".venv/lib/site.py" ; "virtual environment")]
    #[test_case("Build/output.js" ; "segment match ignores case")]
    fn test_skip_dirs(path: &str) {
        assert!(select_files(&[blob(path)], 45).is_empty());
    }

    #[test]
    fn test_skip_requires_whole_segment() {
        let selected = select_files(&[blob("src/testing_utils.py"), blob("builder/main.go")], 45);
        assert_eq!(selected, vec!["builder/main.go", "src/testing_utils.py"]);
    }

    #[test]
    fn test_priority_matches_basename_case_insensitively_and_full_path() {
        let tree = vec![
            blob("backend/Requirements.TXT"),
            blob("android/app/build.gradle"),
            blob("notes.txt"),
        ];
        assert_eq!(
            select_files(&tree, 45),
            vec!["backend/Requirements.TXT", "android/app/build.gradle"]
        );
    }

    #[test]
    fn test_cap_is_applied_after_tiering() {
        let mut tree: Vec<TreeEntry> = (0..60).map(|i| blob(&format!("src/mod_{i}.rs"))).collect();
        tree.push(blob("Cargo.toml"));

        let selected = select_files(&tree, 45);
        assert_eq!(selected.len(), 45);
        assert_eq!(selected[0], "Cargo.toml");
    }

    #[test]
    fn test_truncation_respects_critical_files() {
        let long = "x".repeat(5_000);
        assert_eq!(bound_content("package.json", long.clone(), 3_000).len(), 5_000);
        assert_eq!(bound_content("src/app.js", long, 3_000).len(), 3_000);
    }

    #[test]
    fn test_truncate_chars_keeps_code_points_whole() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }

    fn tier_of(path: &str) -> u8 {
        let selection = partition(&[blob(path)]);
        if !selection.priority.is_empty() {
            0
        } else if !selection.high_value.is_empty() {
            1
        } else {
            2
        }
    }

    proptest! {
        #[test]
        fn prop_selection_is_capped_and_tier_ordered(
            names in proptest::collection::vec(
                prop_oneof![
                    Just("package.json".to_string()),
                    Just("go.mod".to_string()),
                    "[a-z]{1,8}_service\\.(py|go|ts)",
                    "[a-z]{1,8}\\.(py|rs|js|md|txt)",
                ],
                0..80,
            ),
            cap in 1usize..50,
        ) {
            let tree: Vec<TreeEntry> = names
                .iter()
                .enumerate()
                .map(|(i, n)| blob(&format!("pkg{i}/{n}")))
                .collect();

            let selected = select_files(&tree, cap);
            prop_assert!(selected.len() <= cap);

            let tiers: Vec<u8> = selected.iter().map(|p| tier_of(p)).collect();
            prop_assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
