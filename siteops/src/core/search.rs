//! Keyword matching for `find_articles`.

/// Previews longer than this many characters are cut and suffixed with `...`.
pub const PREVIEW_CHARS: usize = 100;

/// Keyword normalized once for repeated matching.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    needle: String,
    case_sensitive: bool,
}

impl KeywordMatcher {
    pub fn new(keyword: &str, case_sensitive: bool) -> Self {
        let needle = if case_sensitive {
            keyword.to_string()
        } else {
            keyword.to_lowercase()
        };
        Self {
            needle,
            case_sensitive,
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        if self.case_sensitive {
            text.contains(&self.needle)
        } else {
            text.to_lowercase().contains(&self.needle)
        }
    }
}

/// Where a keyword was found in an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleHit {
    Filename,
    /// First matching line (1-based) with a trimmed preview.
    Line { number: usize, preview: String },
}

/// Check the filename first, then each line of the content in order.
pub fn find_in_article(matcher: &KeywordMatcher, filename: &str, content: &str) -> Option<ArticleHit> {
    if matcher.matches(filename) {
        return Some(ArticleHit::Filename);
    }
    content
        .split('\n')
        .enumerate()
        .find(|(_, line)| matcher.matches(line))
        .map(|(idx, line)| ArticleHit::Line {
            number: idx + 1,
            preview: preview(line),
        })
}

/// Trimmed line, cut to [`PREVIEW_CHARS`] characters.
pub fn preview(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.chars().count() > PREVIEW_CHARS {
        let cut: String = trimmed.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_hit_takes_precedence() {
        let matcher = KeywordMatcher::new("rust", false);
        assert_eq!(
            find_in_article(&matcher, "why-Rust.md", "rust everywhere"),
            Some(ArticleHit::Filename)
        );
    }

    #[test]
    fn reports_first_matching_line() {
        let matcher = KeywordMatcher::new("MCP", false);
        let content = "# Title\n\n  Using mcp servers  \nmore MCP";
        assert_eq!(
            find_in_article(&matcher, "post.md", content),
            Some(ArticleHit::Line {
                number: 3,
                preview: "Using mcp servers".to_string()
            })
        );
    }

    #[test]
    fn case_sensitive_skips_other_case() {
        let matcher = KeywordMatcher::new("MCP", true);
        assert_eq!(find_in_article(&matcher, "post.md", "mcp only"), None);
    }

    #[test]
    fn long_preview_is_cut() {
        let line = "x".repeat(150);
        let out = preview(&line);
        assert_eq!(out.chars().count(), PREVIEW_CHARS + 3);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn preview_counts_characters_not_bytes() {
        let line = "é".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&line), line);
    }
}
