//! Action Registry: binds externally callable tool names to command sequences.
//!
//! Each action is a short, strictly sequential series of [`CommandRunner`]
//! invocations. Transports (MCP stdio, HTTP) only ever talk to
//! [`ActionRegistry::call`] / [`ActionRegistry::invoke`] and the tool list.

mod articles;
mod commit;
mod publish;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::io::config::Workdir;
use crate::io::process::CommandRunner;

pub use articles::{DeleteArticleArgs, FindArticlesArgs, PublishPostArgs};
pub use commit::{CommitArgs, PUSH_COMMAND, STAGE_COMMAND};
pub use publish::{DEPLOY_COMMAND, NoArgs};

/// Every tool the registry exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    PublishArticle,
    CommitCode,
    PublishBlogPost,
    FindArticles,
    DeleteArticle,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::PublishArticle,
        Tool::CommitCode,
        Tool::PublishBlogPost,
        Tool::FindArticles,
        Tool::DeleteArticle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::PublishArticle => "publish_article",
            Tool::CommitCode => "commit_code",
            Tool::PublishBlogPost => "publish_blog_post",
            Tool::FindArticles => "find_articles",
            Tool::DeleteArticle => "delete_article",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::PublishArticle => {
                "Deploy the Astro blog to production by running npm run deploy."
            }
            Tool::CommitCode => {
                "Stage all changes, commit them, and push unless there was nothing to commit."
            }
            Tool::PublishBlogPost => {
                "Save article, commit changes, and optionally deploy - all in one command."
            }
            Tool::FindArticles => {
                "Find articles containing a keyword in their content or filename."
            }
            Tool::DeleteArticle => "Delete an article file and optionally commit the deletion.",
        }
    }

    /// JSON Schema for the tool's arguments object.
    pub fn input_schema(self) -> Value {
        match self {
            Tool::PublishArticle => json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
            Tool::CommitCode => json!({
                "type": "object",
                "properties": {
                    "message": {
                        "type": "string",
                        "description": "Commit message",
                        "default": crate::core::commit::DEFAULT_COMMIT_MESSAGE
                    }
                },
                "additionalProperties": false
            }),
            Tool::PublishBlogPost => json!({
                "type": "object",
                "properties": {
                    "directory": {
                        "type": "string",
                        "description": "Subdirectory of the working directory to save into (e.g. \"src/content/blog\")"
                    },
                    "content": { "type": "string", "description": "Article content" },
                    "filename": { "type": "string", "description": "File name (e.g. \"my-article.md\")" },
                    "commit_message": {
                        "type": "string",
                        "description": "Commit message (defaults to \"feat: publish <filename>\")"
                    },
                    "deploy": {
                        "type": "boolean",
                        "description": "Run npm run deploy after committing",
                        "default": true
                    }
                },
                "required": ["directory", "content", "filename"],
                "additionalProperties": false
            }),
            Tool::FindArticles => json!({
                "type": "object",
                "properties": {
                    "keyword": { "type": "string", "description": "Keyword to search for" },
                    "directory": {
                        "type": "string",
                        "description": "Subdirectory of the working directory to search",
                        "default": articles::DEFAULT_ARTICLE_DIR
                    },
                    "case_sensitive": { "type": "boolean", "default": false }
                },
                "required": ["keyword"],
                "additionalProperties": false
            }),
            Tool::DeleteArticle => json!({
                "type": "object",
                "properties": {
                    "filepath": {
                        "type": "string",
                        "description": "Path relative to the working directory (e.g. \"src/content/blog/my-article.md\")"
                    },
                    "commit": { "type": "boolean", "default": true },
                    "push": { "type": "boolean", "default": true }
                },
                "required": ["filepath"],
                "additionalProperties": false
            }),
        }
    }

    pub fn spec(self) -> ToolSpec {
        ToolSpec {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool descriptor as advertised to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

/// Why a tool call did not produce a transcript.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: &'static str, message: String },
    /// A step failed hard, e.g. an executable could not be spawned.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

/// Text handed back to a caller, flagged when it describes a hard failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn transcript(text: String) -> Self {
        Self {
            text,
            is_error: false,
        }
    }

    pub fn failure(err: &anyhow::Error) -> Self {
        Self {
            text: format!("{err:#}"),
            is_error: true,
        }
    }
}

/// Registry of callable actions over one working directory.
///
/// Only constructible from a resolved [`Workdir`], so no action exists unless
/// startup validation passed.
#[derive(Debug)]
pub struct ActionRegistry<R> {
    workdir: Workdir,
    runner: R,
}

impl<R: CommandRunner> ActionRegistry<R> {
    pub fn new(workdir: Workdir, runner: R) -> Self {
        Self { workdir, runner }
    }

    pub fn workdir(&self) -> &Workdir {
        &self.workdir
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn tools(&self) -> Vec<ToolSpec> {
        Tool::ALL.into_iter().map(Tool::spec).collect()
    }

    /// Dispatch `name` with a JSON arguments object (`null` means no arguments).
    #[instrument(skip(self, arguments))]
    pub fn call(&self, name: &str, arguments: Value) -> Result<String, CallError> {
        let tool = Tool::from_name(name).ok_or_else(|| CallError::UnknownTool(name.to_string()))?;
        info!(tool = tool.name(), "calling tool");
        let result = match tool {
            Tool::PublishArticle => {
                parse_args::<NoArgs>(tool, arguments)?;
                self.publish_article()
            }
            Tool::CommitCode => {
                let args: CommitArgs = parse_args(tool, arguments)?;
                self.commit_code(args.message.as_deref())
            }
            Tool::PublishBlogPost => self.publish_blog_post(&parse_args(tool, arguments)?),
            Tool::FindArticles => self.find_articles(&parse_args(tool, arguments)?),
            Tool::DeleteArticle => self.delete_article(&parse_args(tool, arguments)?),
        };
        result.map_err(|err| {
            warn!(tool = tool.name(), err = %format!("{err:#}"), "tool failed");
            CallError::Failed(err)
        })
    }

    /// Like [`call`](Self::call), but folds hard step failures into an error
    /// [`ToolOutput`]. Unknown tools and bad arguments stay errors so the
    /// transport can report them as protocol errors.
    pub fn invoke(&self, name: &str, arguments: Value) -> Result<ToolOutput, CallError> {
        match self.call(name, arguments) {
            Ok(text) => Ok(ToolOutput::transcript(text)),
            Err(CallError::Failed(err)) => Ok(ToolOutput::failure(&err)),
            Err(err) => Err(err),
        }
    }
}

fn parse_args<T: DeserializeOwned>(tool: Tool, arguments: Value) -> Result<T, CallError> {
    let arguments = if arguments.is_null() {
        Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|err| CallError::InvalidArguments {
        tool: tool.name(),
        message: err.to_string(),
    })
}
