//! Frontmatter generation for articles saved by `publish_blog_post`.

use chrono::NaiveDate;

/// Lines scanned for a `# ` heading when deriving a title.
const TITLE_SCAN_LINES: usize = 5;

const DESCRIPTION: &str = "Article published via MCP";
const AUTHOR: &str = "AI Assistant";

/// True if `filename` is a markdown article (`.md` or `.mdx`).
pub fn is_markdown(filename: &str) -> bool {
    filename.ends_with(".md") || filename.ends_with(".mdx")
}

/// True if the content should get a generated frontmatter block.
///
/// Only markdown files without an existing `---` block qualify.
pub fn needs_frontmatter(filename: &str, content: &str) -> bool {
    is_markdown(filename) && !content.starts_with("---")
}

/// Title of the article: the first `# ` heading in the opening lines, else the
/// filename stem in title case.
pub fn derive_title(filename: &str, content: &str) -> String {
    for line in content.split('\n').take(TITLE_SCAN_LINES) {
        if let Some(heading) = line.strip_prefix("# ") {
            return heading.trim().to_string();
        }
    }
    let stem = filename
        .strip_suffix(".mdx")
        .or_else(|| filename.strip_suffix(".md"))
        .unwrap_or(filename);
    title_case(&stem.replace('-', " "))
}

/// Uppercase the first letter of every word, lowercase the rest.
///
/// A word starts after any non-alphabetic character.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Render the frontmatter block (including the trailing blank line).
pub fn render_frontmatter(title: &str, date: NaiveDate) -> String {
    let title = title.replace('"', "\\\"");
    format!(
        "---\ntitle: \"{title}\"\npubDate: {}\ndescription: \"{DESCRIPTION}\"\nauthor: \"{AUTHOR}\"\n---\n\n",
        date.format("%Y-%m-%d")
    )
}

/// Return the article body to write, with frontmatter prepended if needed.
pub fn with_frontmatter(filename: &str, content: &str, date: NaiveDate) -> String {
    if !needs_frontmatter(filename, content) {
        return content.to_string();
    }
    let title = derive_title(filename, content);
    let mut out = render_frontmatter(&title, date);
    out.push_str(content);
    out
}
