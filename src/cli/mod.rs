use anyhow::{Context, Result, bail};
use console::style;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

use crate::core::collaborators::Resources;
use crate::core::config::EngineConfig;
use crate::core::engine::Engine;
use crate::core::lifecycle::{ExpirySweeper, LifecycleManager};
use crate::core::terminal::{self, GuideSection};
use crate::interfaces::web::ApiServer;
use crate::logging;

const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

fn print_help() {
    terminal::print_banner();

    GuideSection::new("Commands")
        .command("serve", "Start the tool server (default)")
        .command("help", "Show this message")
        .print();

    GuideSection::new("Flags")
        .command("--host <addr>", "Bind address (HOST, default 0.0.0.0)")
        .command("--port, -p <port>", "Listen port (PORT, default 3001)")
        .print();

    println!(
        "\n {} {} [serve] [--host <addr>] [--port <port>]\n",
        style("Usage:").bold(),
        style("prospect-mcp").green()
    );
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Flags start at this index of the argument list.
    Serve(usize),
    Help,
}

fn parse_command(args: &[String]) -> Result<Command> {
    match args.get(1).map(String::as_str) {
        None => Ok(Command::Serve(1)),
        Some("help" | "--help" | "-h") => Ok(Command::Help),
        Some(flag) if flag.starts_with('-') => Ok(Command::Serve(1)),
        Some("serve") => Ok(Command::Serve(2)),
        Some(other) => bail!("Unknown command '{}'. Run 'prospect-mcp help' for usage.", other),
    }
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    match parse_command(&args)? {
        Command::Serve(flags_start) => serve(&args, flags_start).await,
        Command::Help => {
            print_help();
            Ok(())
        }
    }
}

async fn serve(args: &[String], flags_start: usize) -> Result<()> {
    let mut config = EngineConfig::from_env();
    config.apply_cli_flags(args, flags_start);
    logging::init(&config.log_level);

    terminal::print_banner();
    info!("Data directory: {:?}", config.data_dir);

    let resources = Resources::open(&config).context("Failed to open resources")?;
    let engine = Arc::new(Engine::new(resources.clone()));

    let mut lifecycle = LifecycleManager::new();
    lifecycle.attach(Arc::new(Mutex::new(ApiServer::new(
        engine,
        config.bind_addr(),
    ))));
    lifecycle.attach(Arc::new(Mutex::new(ExpirySweeper::new(
        resources.state.clone(),
        SWEEP_INTERVAL,
    ))));
    lifecycle.start().await?;

    terminal::print_success("Tool server is ready");
    terminal::print_status("Profiles", &config.database_path.to_string_lossy());
    terminal::print_status("Executions", &config.state_db_path.to_string_lossy());
    terminal::print_link("Tools", &format!("http://{}/mcp/tools", config.bind_addr()));
    terminal::print_link("Health", &format!("http://{}/health", config.bind_addr()));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    lifecycle.shutdown().await
}
