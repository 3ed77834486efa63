//! Cleanup of raw model output.
//!
//! Models wrap their answer in reasoning blocks, code fences and stray
//! headings. [`sanitize`] strips those and is idempotent.

const SCRATCHPAD_OPEN: &str = "<scratchpad>";
const SCRATCHPAD_CLOSE: &str = "</scratchpad>";
const METADATA_MARKER: &str = "---METADATA---";
/// A `### ` heading this close before the scratchpad belongs to it
const HEADING_LOOKBEHIND: usize = 15;
/// Characters dropped after an unterminated scratchpad when no document start is found
const UNTERMINATED_CUT: usize = 500;

const DOCUMENT_STARTS: &[&str] = &["### README.md", "## README.md", "![Header]"];
const README_HEADINGS: &[&str] = &["### README.md", "## README.md", "# README.md"];
const FENCE_OPENERS: &[&str] = &["```markdown", "```md"];
const FENCE: &str = "```";

/// Strips scratchpad blocks, README headings, markdown fences and metadata footers
///
/// Repeats until nothing changes, so `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    loop {
        let next = clean_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_once(input: &str) -> String {
    let mut content = remove_scratchpad(input.trim());
    content = strip_readme_heading(&content);
    content = strip_fence(&content);
    if let Some(idx) = content.find(METADATA_MARKER) {
        content = content[..idx].trim().to_string();
    }
    content
}

fn remove_scratchpad(content: &str) -> String {
    let Some(open) = content.find(SCRATCHPAD_OPEN) else {
        return content.to_string();
    };
    let after_open = open + SCRATCHPAD_OPEN.len();

    let end = match content[after_open..].find(SCRATCHPAD_CLOSE) {
        Some(rel) => after_open + rel + SCRATCHPAD_CLOSE.len(),
        None => unterminated_end(content, open),
    };

    let start = match content[..open].rfind("### ") {
        Some(heading) if heading + HEADING_LOOKBEHIND >= open => heading,
        _ => open,
    };

    format!("{}{}", &content[..start], &content[end..]).trim().to_string()
}

/// Where the document most likely resumes after a scratchpad missing its close tag
fn unterminated_end(content: &str, open: usize) -> usize {
    let tail = &content[open..];
    DOCUMENT_STARTS
        .iter()
        .find_map(|marker| tail.find(marker))
        .or_else(|| tail.find("\n# ").map(|idx| idx + 1))
        .map(|idx| open + idx)
        .unwrap_or_else(|| {
            tail.char_indices()
                .nth(UNTERMINATED_CUT)
                .map(|(idx, _)| open + idx)
                .unwrap_or(content.len())
        })
}

fn strip_readme_heading(content: &str) -> String {
    README_HEADINGS
        .iter()
        .find_map(|heading| content.strip_prefix(heading))
        .unwrap_or(content)
        .trim()
        .to_string()
}

fn strip_fence(content: &str) -> String {
    if !content.ends_with(FENCE) {
        return content.to_string();
    }
    let Some(inner) = FENCE_OPENERS.iter().find_map(|open| content.strip_prefix(open)) else {
        return content.to_string();
    };
    let inner = inner.trim();
    inner.strip_suffix(FENCE).unwrap_or(inner).trim().to_string()
}
