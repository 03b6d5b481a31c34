//! Main chat loop orchestration.
//!
//! Reads lines, dispatches slash commands to the store's session operations,
//! and runs every other line as one chat exchange in the current session.
//! The snapshot is saved after each state-changing step so an interrupted
//! loop loses nothing the server has confirmed.

use anyhow::Result;
use console::style;
use tracing::debug;

use crate::cli::session::{display_text, print_messages, print_sessions_table};
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::{explain_failure, run_turn, thinking_spinner};

/// Run the interactive chat loop on the current session.
pub async fn run_chat_loop(state: &AppState) -> Result<()> {
    print_current_banner(state).await;

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) if text.is_empty() => continue,
            InputEvent::Message(text) => text,
        };

        if let Some(cmd) = commands::parse(&text) {
            debug!(?cmd, "Slash command");
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::New => {
                    match state.store.new_session(None).await {
                        Ok(_) => print_current_banner(state).await,
                        Err(e) => print_error(&format!("Could not create session: {e}")),
                    }
                    state.persist().await;
                }
                ChatCommand::Sessions => {
                    let sessions = state.store.sessions_by_recency().await;
                    print_sessions_table(&sessions, state.store.current_index().await);
                }
                ChatCommand::Select(index) => {
                    state.store.select_session(index).await;
                    state.persist().await;
                    print_current_banner(state).await;
                }
                ChatCommand::Delete(index) => {
                    match state.store.delete_session(index).await {
                        Ok(_) => {
                            println!("\n  {} Session deleted.", style("x").red().bold());
                            print_current_banner(state).await;
                        }
                        Err(e) => print_error(&format!("Could not delete session: {e}")),
                    }
                    state.persist().await;
                }
                ChatCommand::History => {
                    let session = state.store.current_session().await;
                    print_messages(&session.messages);
                }
                ChatCommand::Unknown(what) => {
                    println!(
                        "\n  {} Unknown command: {}. Type /help for available commands.\n",
                        style("?").yellow().bold(),
                        style(what).dim()
                    );
                }
            }
            continue;
        }

        let spinner = thinking_spinner();
        let result = run_turn(state, text).await;
        spinner.finish_and_clear();

        match result {
            Ok(turn) => {
                println!();
                println!(
                    "  {} {}",
                    style("AI").cyan().bold(),
                    display_text(&turn.assistant.content)
                );
                println!();
            }
            Err(err) => {
                print_error(&explain_failure(&err));
                println!("  {}", style("Type a message to retry, /exit to quit.").dim());
            }
        }
        state.persist().await;
    }

    chat_input.flush();
    Ok(())
}

async fn print_current_banner(state: &AppState) {
    let session = state.store.current_session().await;
    print_welcome_banner(
        &session.topic,
        state.store.model(),
        session.id.as_str(),
        session.messages.len(),
    );
}

fn print_error(message: &str) {
    eprintln!("\n  {} {message}", style("!").red().bold());
}
