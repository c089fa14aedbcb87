//! AI Shell - Entry Point
//!
//! Loads configuration, starts the async runtime and the interrupt watcher,
//! then hands the terminal to the interactive loop.

use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use ai_shell::core::config::ShellConfig;
use ai_shell::core::error::Result;
use ai_shell::llm::{Assistant, LlmClient};
use ai_shell::shell::{spawn_interrupt_watcher, CommandRunner, InteractionLoop, PathResolver};
use ai_shell::ui;
use clap::Parser;
use tokio::io::BufReader;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Interactive shell that runs commands and answers natural-language questions
#[derive(Parser, Debug)]
#[command(name = "ai-shell", version)]
#[command(about = "Interactive shell with a natural-language assistant")]
struct Cli {}

fn main() -> ExitCode {
    let _cli = Cli::parse();

    // Logs go to stderr so they never interleave with command output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ai_shell=warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = dotenv::dotenv() {
        tracing::debug!(error = %e, "no .env file loaded");
    }

    let config = match ShellConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let _ = ui::setup_hint(&mut io::stderr(), &e.to_string());
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "shell terminated");
            let _ = ui::error(&mut io::stderr(), &e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(config: ShellConfig) -> Result<()> {
    let rt = Runtime::new()?;
    let result = rt.block_on(async {
        tracing::info!(model = %config.model, base_url = %config.base_url, "AI Shell starting");

        let assistant = Assistant::new(Arc::new(LlmClient::from_config(&config)));
        let mut shell = InteractionLoop::new(
            assistant,
            Box::new(PathResolver),
            CommandRunner::shell(),
            BufReader::new(tokio::io::stdin()),
            io::stdout(),
            io::stderr(),
        );

        spawn_interrupt_watcher(shell.running_flag());
        shell.run().await
    });

    // The blocking stdin reader may still be parked on a read
    rt.shutdown_background();
    result
}
