//! HTTP front end for the siteops tools, for callers that do not speak MCP.

mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use clap::Parser;
use siteops::actions::ActionRegistry;
use siteops::exit_codes;
use siteops::io::config::Settings;
use siteops::io::process::ProcessRunner;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use crate::state::{AppState, SharedRunner};

#[derive(Parser)]
#[command(name = "siteops-http")]
#[command(about = "HTTP API for Astro blog deploy and commit tools")]
struct Args {
    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on
    #[arg(long, default_value = "3001")]
    port: u16,

    /// Working directory all commands run in [default: ./astro]
    #[arg(long, env = "ASTRO_DIR")]
    workdir: Option<PathBuf>,

    /// Optional TOML config file
    #[arg(long, env = "SITEOPS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("siteops_http=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let settings = match Settings::resolve(args.workdir.as_deref(), args.config.as_deref()) {
        Ok(settings) => settings,
        Err(err) => {
            error!(err = %format!("{err:#}"), "invalid configuration");
            eprintln!("{err:#}");
            std::process::exit(exit_codes::INVALID_CONFIG);
        }
    };
    info!(workdir = %settings.workdir.path().display(), "starting siteops-http");

    let runner: SharedRunner = Box::new(
        ProcessRunner::new(settings.workdir.clone()).with_timeout(settings.command_timeout),
    );
    let state = AppState::new(ActionRegistry::new(settings.workdir, runner));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", routes::api_router())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
