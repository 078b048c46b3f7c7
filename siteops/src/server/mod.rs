//! MCP server over stdio, built on `rmcp`.
//!
//! Framing, the initialize handshake and unknown methods are handled by the
//! `rmcp` service. This module maps `tools/list` and `tools/call` onto the
//! [`ActionRegistry`]. Stdout carries only protocol messages; diagnostics go
//! to the tracing subscriber on stderr.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use rmcp::model::{
    CallToolRequestParam, CallToolResult, Content, ErrorData, JsonObject, ListToolsResult,
    PaginatedRequestParam, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::transport::stdio;
use rmcp::{RoleServer, ServerHandler, ServiceExt, model};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::actions::{ActionRegistry, CallError};
use crate::io::process::CommandRunner;

pub const SERVER_NAME: &str = "Astro Deployment MCP Server";
pub const INSTRUCTIONS: &str =
    "Exposes publish_article and commit_code tools for an Astro blog, plus article helpers";

/// MCP handler over a shared [`ActionRegistry`].
///
/// Actions block on child processes, so each call runs on the blocking pool.
pub struct SiteopsServer<R> {
    registry: Arc<ActionRegistry<R>>,
}

impl<R> Clone for SiteopsServer<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<R: CommandRunner + Send + Sync + 'static> SiteopsServer<R> {
    pub fn new(registry: ActionRegistry<R>) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ActionRegistry<R> {
        &self.registry
    }

    /// Tool descriptors in MCP form.
    pub fn tool_list(&self) -> Vec<model::Tool> {
        self.registry
            .tools()
            .into_iter()
            .map(|spec| {
                let schema = match spec.input_schema {
                    Value::Object(map) => map,
                    _ => JsonObject::new(),
                };
                model::Tool::new(spec.name, spec.description, Arc::new(schema))
            })
            .collect()
    }

    /// Run one tool. Unknown tools and bad arguments are `invalid_params`
    /// errors; hard step failures become an `isError` result.
    #[instrument(skip(self, arguments))]
    pub async fn run_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let registry = Arc::clone(&self.registry);
        let tool = name.to_string();
        let arguments = arguments.map_or(Value::Null, Value::Object);
        let outcome = tokio::task::spawn_blocking(move || registry.invoke(&tool, arguments))
            .await
            .map_err(|err| {
                error!(err = %err, "tool task failed to complete");
                ErrorData::internal_error(format!("tool task failed to complete: {err}"), None)
            })?;

        match outcome {
            Ok(output) if output.is_error => Ok(CallToolResult::error(vec![Content::text(
                output.text,
            )])),
            Ok(output) => Ok(CallToolResult::success(vec![Content::text(output.text)])),
            Err(err @ (CallError::UnknownTool(_) | CallError::InvalidArguments { .. })) => {
                Err(ErrorData::invalid_params(err.to_string(), None))
            }
            Err(CallError::Failed(err)) => Ok(CallToolResult::error(vec![Content::text(
                format!("{err:#}"),
            )])),
        }
    }
}

impl<R: CommandRunner + Send + Sync + 'static> ServerHandler for SiteopsServer<R> {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info.name = SERVER_NAME.to_string();
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.tool_list(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run_tool(&request.name, request.arguments).await
    }
}

/// Serve the registry over stdin/stdout until the client closes the stream.
pub async fn serve_stdio<R: CommandRunner + Send + Sync + 'static>(
    registry: ActionRegistry<R>,
) -> Result<()> {
    let server = SiteopsServer::new(registry);
    info!(
        workdir = %server.registry().workdir().path().display(),
        "serving MCP over stdio"
    );
    let service = server
        .serve(stdio())
        .await
        .map_err(|err| anyhow!("start MCP session: {err}"))?;
    let reason = service.waiting().await.context("MCP session task")?;
    info!(?reason, "input closed, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rmcp::model::ErrorCode;
    use serde_json::json;

    use super::*;
    use crate::test_support::{ScriptedRunner, registry_in};

    fn server(runner: ScriptedRunner) -> (tempfile::TempDir, SiteopsServer<ScriptedRunner>) {
        let temp = tempfile::tempdir().expect("tempdir");
        let registry = registry_in(temp.path(), runner);
        (temp, SiteopsServer::new(registry))
    }

    fn text_of(result: &CallToolResult) -> &str {
        &result.content[0].raw.as_text().expect("text content").text
    }

    fn object(value: Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    #[test]
    fn info_names_the_server_and_enables_tools() {
        let (_temp, server) = server(ScriptedRunner::default());
        let info = server.get_info();
        assert_eq!(info.server_info.name, SERVER_NAME);
        assert_eq!(info.instructions.as_deref(), Some(INSTRUCTIONS));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn tool_list_includes_core_tools_with_schemas() {
        let (_temp, server) = server(ScriptedRunner::default());
        let tools = server.tool_list();
        let names: Vec<&str> = tools.iter().map(|tool| tool.name.as_ref()).collect();
        assert!(names.contains(&"publish_article"));
        assert!(names.contains(&"commit_code"));
        let commit = tools
            .iter()
            .find(|tool| tool.name == "commit_code")
            .expect("commit_code");
        assert_eq!(commit.input_schema.get("type"), Some(&json!("object")));
    }

    #[tokio::test]
    async fn call_returns_transcript_content() {
        let (_temp, server) = server(ScriptedRunner::new(vec![ScriptedRunner::output(
            "deployed\n",
            "",
            0,
        )]));
        let result = server
            .run_tool("publish_article", object(json!({})))
            .await
            .expect("call");
        assert_eq!(result.is_error, Some(false));
        assert_eq!(text_of(&result), "$ npm run deploy\ndeployed\n");
    }

    #[tokio::test]
    async fn spawn_failure_is_flagged_as_tool_error() {
        let (_temp, server) = server(ScriptedRunner::new(vec![ScriptedRunner::spawn_error(
            "spawn npm run deploy: No such file or directory",
        )]));
        let result = server
            .run_tool("publish_article", None)
            .await
            .expect("call");
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).contains("No such file or directory"));
    }

    #[tokio::test]
    async fn unknown_tool_is_invalid_params() {
        let (_temp, server) = server(ScriptedRunner::default());
        let err = server.run_tool("shell", None).await.expect_err("rejected");
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(server.registry().runner().calls().is_empty());
    }

    #[tokio::test]
    async fn bad_arguments_are_invalid_params() {
        let (_temp, server) = server(ScriptedRunner::default());
        let err = server
            .run_tool("commit_code", object(json!({"msg": "typo"})))
            .await
            .expect_err("rejected");
        assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
        assert!(server.registry().runner().calls().is_empty());
    }
}
