//! `siteops`: deploy and commit automation for an Astro blog checkout.
//!
//! `siteops serve` speaks MCP over stdio for agent clients. The other
//! subcommands run one action directly and print its transcript.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use siteops::actions::ActionRegistry;
use siteops::exit_codes;
use siteops::io::config::Settings;
use siteops::io::process::ProcessRunner;
use siteops::logging;
use siteops::server;

#[derive(Parser)]
#[command(
    name = "siteops",
    version,
    about = "Deploy and commit automation for an Astro blog"
)]
struct Cli {
    /// Working directory all commands run in [default: ./astro].
    #[arg(long, global = true, env = "ASTRO_DIR")]
    workdir: Option<PathBuf>,

    /// Optional TOML config file.
    #[arg(long, global = true, env = "SITEOPS_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the tools over MCP (JSON-RPC on stdin/stdout).
    Serve,
    /// Run `npm run deploy` and print the transcript.
    Publish,
    /// Stage, commit and push all changes.
    Commit {
        /// Commit message [default: "chore: automated commit"].
        #[arg(short, long)]
        message: Option<String>,
    },
    /// List the available tools.
    Tools,
}

fn main() {
    logging::init("warn");
    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    let settings = match Settings::resolve(cli.workdir.as_deref(), cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{:#}", err);
            return exit_codes::INVALID_CONFIG;
        }
    };
    let runner =
        ProcessRunner::new(settings.workdir.clone()).with_timeout(settings.command_timeout);
    let registry = ActionRegistry::new(settings.workdir, runner);

    let result = match cli.command {
        Command::Serve => cmd_serve(registry),
        Command::Publish => registry.publish_article().and_then(|text| print_text(&text)),
        Command::Commit { message } => registry
            .commit_code(message.as_deref())
            .and_then(|text| print_text(&text)),
        Command::Tools => cmd_tools(&registry),
    };

    match result {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::FAILURE
        }
    }
}

fn cmd_serve(registry: ActionRegistry<ProcessRunner>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    runtime.block_on(server::serve_stdio(registry))
}

fn cmd_tools(registry: &ActionRegistry<ProcessRunner>) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(
        out,
        "working directory: {}",
        registry.workdir().path().display()
    )
    .context("write stdout")?;
    for spec in registry.tools() {
        writeln!(out, "- {}: {}", spec.name, spec.description).context("write stdout")?;
    }
    Ok(())
}

fn print_text(text: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes()).context("write stdout")?;
    out.flush().context("flush stdout")
}
