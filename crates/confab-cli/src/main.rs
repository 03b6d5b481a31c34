//! Confab CLI entry point.
//!
//! Binary name: `confab`
//!
//! Parses CLI arguments, restores the session store from its snapshot,
//! refreshes it from the session server, then dispatches to the command
//! handler and saves the snapshot again.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing::Instrument;

use confab_observe::{attrs, init_tracing, shutdown_tracing, verbosity_filter};
use confab_types::mask::Mask;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "confab", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let span = tracing::info_span!("command", { attrs::COMMAND } = cli.command.name());
    let result = run(cli).instrument(span).await;

    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::init().await?;
    state.sync().await;

    let result = match cli.command {
        Commands::Sessions => cli::session::list_sessions(&state, cli.json).await,
        Commands::New {
            mask_id,
            mask_name,
            mask_avatar,
        } => {
            let mask = mask_id.zip(mask_name).map(|(id, name)| {
                let mask = Mask::named(id, name);
                match mask_avatar {
                    Some(avatar) => mask.with_avatar(avatar),
                    None => mask,
                }
            });
            cli::session::new_session(&state, mask, cli.json).await
        }
        Commands::Select { index } => cli::session::select_session(&state, index, cli.json).await,
        Commands::Delete { index, force } => {
            cli::session::delete_session(&state, index, force, cli.json).await
        }
        Commands::History => cli::session::show_history(&state, cli.json).await,
        Commands::Send { prompt } => cli::chat::send(&state, prompt.join(" "), cli.json).await,
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&state).await,
        Commands::Completions { .. } => Ok(()),
    };

    // Confirmed changes are kept even when the command itself failed.
    state.persist().await;
    result
}
