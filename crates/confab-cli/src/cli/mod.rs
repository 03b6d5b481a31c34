//! CLI command definitions for the `confab` binary.
//!
//! Uses clap derive macros for argument parsing. Every command works on the
//! current session selection, which persists between invocations through the
//! store snapshot.

pub mod chat;
pub mod session;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chat with an LLM, with sessions kept on a session server.
#[derive(Parser)]
#[command(name = "confab", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export trace spans to stdout via OpenTelemetry.
    #[arg(long, global = true, hide = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sessions, most recently updated first.
    #[command(alias = "ls")]
    Sessions,

    /// Create a new session and select it.
    New {
        /// Seed the session from this mask's context messages.
        #[arg(long, requires = "mask_name")]
        mask_id: Option<String>,

        /// Display name of the mask; becomes the session topic.
        #[arg(long, requires = "mask_id")]
        mask_name: Option<String>,

        /// Avatar of the mask.
        #[arg(long, requires = "mask_id")]
        mask_avatar: Option<String>,
    },

    /// Make the session at INDEX current.
    Select {
        /// Store index as shown by `confab sessions`.
        index: usize,
    },

    /// Delete the session at INDEX.
    #[command(alias = "rm")]
    Delete {
        index: usize,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },

    /// Show the messages of the current session.
    History,

    /// Send one message in the current session and print the reply.
    Send {
        /// Message text.
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },

    /// Interactive chat in the current session.
    Chat,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Sessions => "sessions",
            Commands::New { .. } => "new",
            Commands::Select { .. } => "select",
            Commands::Delete { .. } => "delete",
            Commands::History => "history",
            Commands::Send { .. } => "send",
            Commands::Chat => "chat",
            Commands::Completions { .. } => "completions",
        }
    }
}
