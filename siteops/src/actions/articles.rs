//! Article actions: save-and-publish, keyword search, and delete.
//!
//! Caller mistakes (missing file, wrong extension, path outside the working
//! directory) are reported as text, like tool output. Only spawn failures of
//! the git/deploy steps are hard errors.

use std::path::Path;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::ActionRegistry;
use crate::core::frontmatter::{is_markdown, with_frontmatter};
use crate::core::path::resolve_within;
use crate::core::search::{ArticleHit, KeywordMatcher, find_in_article};
use crate::io::articles::{markdown_files, read_article, remove_article, write_article};
use crate::io::process::CommandRunner;

pub(super) const DEFAULT_ARTICLE_DIR: &str = "src/content/blog";

const GIT_SECTION: &str = "\n=== Git Operations ===";
const DEPLOY_SECTION: &str = "\n=== Deployment ===";

fn default_true() -> bool {
    true
}

fn default_article_dir() -> String {
    DEFAULT_ARTICLE_DIR.to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishPostArgs {
    /// Subdirectory of the working directory to save into.
    pub directory: String,
    pub content: String,
    pub filename: String,
    /// Defaults to `feat: publish <filename>` when missing or empty.
    #[serde(default)]
    pub commit_message: Option<String>,
    #[serde(default = "default_true")]
    pub deploy: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FindArticlesArgs {
    pub keyword: String,
    #[serde(default = "default_article_dir")]
    pub directory: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteArticleArgs {
    /// Path relative to the working directory.
    pub filepath: String,
    #[serde(default = "default_true")]
    pub commit: bool,
    #[serde(default = "default_true")]
    pub push: bool,
}

impl<R: CommandRunner> ActionRegistry<R> {
    /// Save an article (adding frontmatter to markdown), commit and push it,
    /// and optionally deploy.
    pub fn publish_blog_post(&self, args: &PublishPostArgs) -> Result<String> {
        self.publish_blog_post_on(args, Local::now().date_naive())
    }

    #[instrument(skip_all, fields(filename = %args.filename, deploy = args.deploy))]
    pub(super) fn publish_blog_post_on(&self, args: &PublishPostArgs, today: NaiveDate) -> Result<String> {
        let relative = Path::new(&args.directory).join(&args.filename);
        let Some(path) = resolve_within(self.workdir.path(), &relative) else {
            return Ok(format!(
                "Error: Path must be within the working directory: {}",
                relative.display()
            ));
        };

        let body = with_frontmatter(&args.filename, &args.content, today);
        if let Err(err) = write_article(&path, &body) {
            warn!(err = %format!("{err:#}"), "failed to save article");
            return Ok(format!("Error saving article: {err:#}"));
        }

        let mut parts = vec![format!("✓ Saved article to: {}", path.display())];
        parts.push(GIT_SECTION.to_string());
        let message = match args.commit_message.as_deref() {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => format!("feat: publish {}", args.filename),
        };
        self.commit_and_push(&message, &mut parts)?;

        if args.deploy {
            parts.push(DEPLOY_SECTION.to_string());
            parts.push(self.publish_article()?);
        }
        Ok(parts.join("\n"))
    }

    /// Search markdown files under a directory for a keyword.
    #[instrument(skip_all, fields(directory = %args.directory))]
    pub fn find_articles(&self, args: &FindArticlesArgs) -> Result<String> {
        let root = self.workdir.path();
        let search_dir = match resolve_within(root, Path::new(&args.directory)) {
            Some(dir) if dir.exists() => dir,
            Some(dir) => return Ok(format!("Directory not found: {}", dir.display())),
            None => return Ok(format!("Directory not found: {}", args.directory)),
        };

        let matcher = KeywordMatcher::new(&args.keyword, args.case_sensitive);
        let mut results = Vec::new();
        for file in markdown_files(&search_dir) {
            let file = match file {
                Ok(file) => file,
                Err(err) => {
                    results.push(format!("✗ Error reading {err:#}"));
                    continue;
                }
            };
            let rel = file.strip_prefix(root).unwrap_or(&file).display().to_string();
            let filename = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let content = match read_article(&file) {
                Ok(content) => content,
                Err(err) => {
                    results.push(format!("✗ Error reading {rel}: {err:#}"));
                    continue;
                }
            };
            match find_in_article(&matcher, &filename, &content) {
                Some(ArticleHit::Filename) => results.push(format!("✓ Found in filename: {rel}")),
                Some(ArticleHit::Line { number, preview }) => {
                    results.push(format!("✓ Found in {rel} (line {number}): {preview}"));
                }
                None => {}
            }
        }
        debug!(matches = results.len(), "search finished");

        if results.is_empty() {
            return Ok(format!("No articles found containing '{}'", args.keyword));
        }
        Ok(format!(
            "Found {} matches for '{}':\n\n{}",
            results.len(),
            args.keyword,
            results.join("\n")
        ))
    }

    /// Delete a markdown article and optionally commit (and push) the removal.
    #[instrument(skip_all, fields(filepath = %args.filepath, commit = args.commit, push = args.push))]
    pub fn delete_article(&self, args: &DeleteArticleArgs) -> Result<String> {
        let root = self.workdir.path();
        let requested = Path::new(&args.filepath);
        if !root.join(requested).exists() {
            return Ok(format!("File not found: {}", args.filepath));
        }
        if !is_markdown(&args.filepath) {
            return Ok(format!(
                "Error: Can only delete markdown files (.md or .mdx), got: {}",
                args.filepath
            ));
        }
        let Some(path) = resolve_within(root, requested) else {
            return Ok("Error: File must be within the working directory".to_string());
        };

        if let Err(err) = remove_article(&path) {
            warn!(err = %format!("{err:#}"), "failed to delete article");
            return Ok(format!("Error deleting file: {err:#}"));
        }
        let mut parts = vec![format!("✓ Deleted file: {}", args.filepath)];

        if args.commit {
            parts.push(GIT_SECTION.to_string());
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let empty = self.stage_and_commit(&format!("feat: remove article {name}"), &mut parts)?;
            if args.push && !empty {
                self.push(&mut parts)?;
            }
        }
        Ok(parts.join("\n"))
    }
}
