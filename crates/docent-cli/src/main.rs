//! Docent command-line client.
//!
//! Binary name: `docent`
//!
//! Parses arguments, installs tracing, resolves the effective configuration,
//! then dispatches to a command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use docent_infra::config::ConfigOverrides;
use docent_observe::tracing_setup::{
    filter_for_verbosity, init_tracing, shutdown_tracing, TracingOptions,
};

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = TracingOptions {
        default_filter: filter_for_verbosity(cli.verbose, cli.quiet).to_string(),
        json: false,
        enable_otel: cli.otel,
    };
    init_tracing(&options).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "docent", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(ConfigOverrides {
        base_url: cli.base_url.clone(),
        model: cli.model.clone(),
    })
    .await?;

    let result = match cli.command {
        Commands::Chat { mode, file } => {
            cli::chat::loop_runner::run_chat_loop(&state, mode.into(), file).await
        }
        Commands::Ask {
            question,
            mode,
            file,
        } => cli::ask::ask(&state, &question, mode.into(), file, cli.json).await,
        Commands::Summarize { path } => cli::summarize::summarize(&state, &path, cli.json).await,
        Commands::Status => cli::status::status(&state, cli.json).await,
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}
