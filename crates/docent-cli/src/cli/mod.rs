//! CLI command definitions for the `docent` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod ask;
pub mod chat;
pub mod conversations;
pub mod status;
pub mod summarize;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

use docent_types::mode::ChatMode;

/// Chat with your documents through a question-answering backend.
#[derive(Parser)]
#[command(name = "docent", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log errors (command output is unaffected).
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend base address (overrides DOCENT_BASE_URL and config.toml).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Model selector sent with queries (overrides DOCENT_MODEL and config.toml).
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Export tracing spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Which assistant to talk to.
        #[arg(long, value_enum, default_value_t = ModeArg::General)]
        mode: ModeArg,

        /// Upload this PDF before the first prompt.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Ask a single question and print the answer.
    Ask {
        /// The question to ask.
        question: String,

        /// Which assistant to ask.
        #[arg(long, value_enum, default_value_t = ModeArg::General)]
        mode: ModeArg,

        /// Upload this PDF first and ask about it.
        #[arg(long, value_name = "PATH")]
        file: Option<PathBuf>,
    },

    /// Index a PDF and print a summary of it.
    Summarize {
        /// PDF to summarize.
        path: PathBuf,
    },

    /// Show the effective configuration and probe the backend.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Chat mode as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// General assistant; a document is optional.
    #[value(alias = "chat")]
    General,
    /// Document-grounded assistant; upload a PDF before asking.
    #[value(aliases = ["doc", "rag"])]
    Document,
}

impl From<ModeArg> for ChatMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::General => ChatMode::General,
            ModeArg::Document => ChatMode::Document,
        }
    }
}

/// Steady-ticking spinner with `message`, cleared by the caller.
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

/// Expand a leading `~` to the home directory.
pub fn expand_path(raw: &str) -> PathBuf {
    match raw.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(raw),
        },
        None if raw == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(raw)),
        None => Path::new(raw).to_path_buf(),
    }
}
