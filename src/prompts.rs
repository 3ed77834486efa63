//! Prompt assembly for README generation.

use crate::github::selection::{base_name, truncate_chars};
use crate::github::{FileEntry, RepositoryReference};
use crate::metadata::ProjectMetadata;

/// Tone used when the caller does not supply one
pub const DEFAULT_TONE: &str = "professional";
/// Upper bound on the concatenated file payload, in characters
pub const MAX_PAYLOAD_CHARS: usize = 100_000;
/// Upper bound on the existing README excerpt, in characters
pub const MAX_EXISTING_README_CHARS: usize = 2_000;

const TRUNCATION_MARKER: &str = "\n\n... [TRUNCATED] ...";
const NO_EXISTING_README: &str = "No existing README found";
const README_NAMES: &[&str] = &["readme.md", "readme.txt", "readme"];

const ROLE_CONTEXT: &str = "You are a senior developer-experience engineer and technical writer. \
Your documentation is clean, scannable and strictly accurate, written in a **{tone}** tone, \
and serves both newcomers and experienced engineers.";

const DESIGN_NO_IMAGES: &str = r#"
### DESIGN CONSTRAINTS:
Do NOT include any external images, banners or decorative SVGs. Start with a Markdown title (`# Project Name`), a one-sentence tagline and a row of 4-6 shields.io badges for the core tech stack."#;

const DESIGN_WITH_BANNERS: &str = r#"
### DESIGN CONSTRAINTS:
The README MUST begin with this header banner as its very first line:
![Header]({header})

The README MUST end with this conclusion banner as its very last line:
![Conclusion]({conclusion})

Do NOT add any other images. Place a one-sentence tagline and 4-6 shields.io badges directly below the header banner."#;

const CORE_INSTRUCTIONS: &str = r#"
### CORE INSTRUCTIONS:
Read the provided source files and extract the architecture, features and usage rules. Write a README.md matched to the project's real complexity and tech stack.

### REQUIREMENTS:
1. State the core purpose of the project in the first paragraph.
2. Use a clean H1 -> H2 -> H3 structure.
3. No filler and no marketing language.
4. Only document features, dependencies and setup steps that are verifiable in the provided code.
5. Always give code blocks a language.
6. Do NOT wrap the output in ```markdown fences and do NOT prepend a `### README.md` heading.

### REASONING:
Before the README, write a short reasoning block covering the value proposition, the audience, the top features and any setup steps worth simplifying. Wrap that block in `<scratchpad>` and `</scratchpad>` tags, without a markdown heading.

### REQUIRED STRUCTURE (after the scratchpad):
1. Title and tagline
2. Badges
3. Overview
4. Key Features
5. Quick Start
6. Architecture: domain models, data flow and notable design decisions
7. License and Contributing"#;

const CLOSING: &str = "Write your `<scratchpad>`, then the README.md.";

/// Builds the generation prompt for one repository
#[derive(Debug, Clone)]
pub struct PromptBuilder<'a> {
    repo: &'a RepositoryReference,
    metadata: &'a ProjectMetadata,
    files: &'a [FileEntry],
    tone: String,
    banners: Option<(String, String)>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(repo: &'a RepositoryReference, metadata: &'a ProjectMetadata, files: &'a [FileEntry]) -> Self {
        Self {
            repo,
            metadata,
            files,
            tone: DEFAULT_TONE.to_string(),
            banners: None,
        }
    }

    /// Sets the writing tone; blank values keep the default
    pub fn tone(mut self, tone: Option<&str>) -> Self {
        if let Some(tone) = tone.map(str::trim).filter(|t| !t.is_empty()) {
            self.tone = tone.to_string();
        }
        self
    }

    /// Asks the model to place the given header and conclusion banners
    pub fn banners(mut self, header: Option<&str>, conclusion: Option<&str>) -> Self {
        self.banners = match (header, conclusion) {
            (Some(h), Some(c)) => Some((h.to_string(), c.to_string())),
            _ => None,
        };
        self
    }

    pub fn build(&self) -> String {
        let role = ROLE_CONTEXT.replace("{tone}", &self.tone);

        let design = match &self.banners {
            Some((header, conclusion)) => DESIGN_WITH_BANNERS
                .replace("{header}", header)
                .replace("{conclusion}", conclusion),
            None => DESIGN_NO_IMAGES.to_string(),
        };

        let existing = existing_readme(self.files)
            .map(|body| truncate_chars(body.trim(), MAX_EXISTING_README_CHARS))
            .filter(|body| !body.is_empty())
            .unwrap_or(NO_EXISTING_README);

        let input = format!(
            "\n### INPUT DATA:\n\
             **Project Name**: {name}\n\
             **Repository**: {url}\n\
             **Detected Primary Language**: {language}\n\
             **Detected Project Type**: {project_type}\n\
             **Detected Tech Stack**: {tech_stack}\n\n\
             **EXISTING README.md** (use as inspiration, adapted to the standards above):\n\
             <existing_readme>\n{existing}\n</existing_readme>\n\n\
             **PROJECT FILES**:\n\
             <source_code>\n{files}\n</source_code>\n\n\
             {closing}",
            name = self.repo.name,
            url = self.repo.url,
            language = self.metadata.primary_language,
            project_type = self.metadata.project_type,
            tech_stack = self.metadata.tech_stack.join(", "),
            existing = existing,
            files = file_payload(self.files),
            closing = CLOSING,
        );

        format!("{}\n\n{}\n\n{}\n\n{}", role, design, CORE_INSTRUCTIONS, input)
    }
}

/// Content of the first fetched README-like file
pub fn existing_readme(files: &[FileEntry]) -> Option<&str> {
    files
        .iter()
        .find(|f| {
            let name = base_name(&f.path).to_lowercase();
            README_NAMES.contains(&name.as_str())
        })
        .map(|f| f.content.as_str())
}

/// Fences every file and caps the result at [`MAX_PAYLOAD_CHARS`]
pub fn file_payload(files: &[FileEntry]) -> String {
    let mut payload = String::new();
    for file in files {
        payload.push_str(&format!("==== FILE: {} ====\n{}\n\n", file.path, file.content));
    }

    let capped = truncate_chars(&payload, MAX_PAYLOAD_CHARS);
    if capped.len() < payload.len() {
        let mut capped = capped.to_string();
        capped.push_str(TRUNCATION_MARKER);
        capped
    } else {
        payload
    }
}
