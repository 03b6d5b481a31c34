//! Chat commands: a single `send`, and the interactive loop.
//!
//! Both go through `SessionStore::chat`, which commits each turn only after
//! the session server has accepted it. Entry point for the loop:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Instrument;

use confab_observe::attrs;
use confab_types::chat::ChatTurn;
use confab_types::error::ChatError;

use crate::state::AppState;

use super::session::display_text;

/// Send one prompt in the current session and print the reply.
///
/// # Examples
///
/// ```bash
/// confab send "What is a borrow checker?"
/// ```
pub async fn send(state: &AppState, prompt: String, json: bool) -> Result<()> {
    let spinner = (!json).then(thinking_spinner);
    let result = run_turn(state, prompt).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(turn) if json => {
            println!(
                "{}",
                serde_json::json!({
                    "sessionId": turn.session_id,
                    "user": turn.user,
                    "assistant": turn.assistant,
                })
            );
            Ok(())
        }
        Ok(turn) => {
            println!();
            println!("  {} {}", style("AI").cyan().bold(), display_text(&turn.assistant.content));
            println!();
            Ok(())
        }
        Err(err) => Err(anyhow::anyhow!(explain_failure(&err))),
    }
}

/// Run one exchange inside a GenAI-style span.
pub(crate) async fn run_turn(state: &AppState, prompt: String) -> Result<ChatTurn, ChatError> {
    let session_id = state.store.current_session().await.id;
    let span = tracing::info_span!(
        "chat",
        { attrs::SESSION_ID } = %session_id,
        { attrs::SESSION_INDEX } = state.store.current_index().await,
        { attrs::GEN_AI_OPERATION_NAME } = attrs::OP_CHAT,
        { attrs::GEN_AI_REQUEST_MODEL } = %state.store.model(),
        { attrs::SERVER_ADDRESS } = %state.config.completion_base_url,
    );
    state.store.chat(prompt).instrument(span).await
}

/// Describe a failed exchange for the terminal.
pub(crate) fn explain_failure(err: &ChatError) -> String {
    if err.phase.user_message_committed() {
        format!("{err}. Your message was saved; the reply is missing.")
    } else {
        format!("{err}. Nothing was saved.")
    }
}

pub(crate) fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
