//! Session management CLI commands: list, new, select, delete, history.
//!
//! Provides session browsing with rich tables, deletion with confirmation
//! prompt, and `--json` output for scripting.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;
use serde::Serialize;

use confab_types::chat::Session;
use confab_types::id::SessionId;
use confab_types::mask::Mask;
use confab_types::message::{ContentPart, Message, MessageContent, MessageRole};

use crate::state::AppState;

/// One row of `confab sessions --json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionRow<'a> {
    index: usize,
    current: bool,
    id: &'a SessionId,
    topic: &'a str,
    messages: usize,
    last_update: i64,
}

/// List sessions, most recently updated first.
///
/// # Examples
///
/// ```bash
/// confab sessions
/// confab sessions --json
/// ```
pub async fn list_sessions(state: &AppState, json: bool) -> Result<()> {
    let sessions = state.store.sessions_by_recency().await;
    let current = state.store.current_index().await;

    if json {
        let rows: Vec<SessionRow<'_>> = sessions
            .iter()
            .map(|(index, session)| SessionRow {
                index: *index,
                current: *index == current,
                id: &session.id,
                topic: &session.topic,
                messages: session.messages.len(),
                last_update: session.last_update.timestamp_millis(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    print_sessions_table(&sessions, current);
    Ok(())
}

/// Print sessions as a table, marking the current one.
pub fn print_sessions_table(sessions: &[(usize, Session)], current: usize) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Topic").fg(Color::White),
        Cell::new("Messages").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for (index, session) in sessions {
        let marker = if *index == current {
            Cell::new(format!("* {index}")).fg(Color::Green)
        } else {
            Cell::new(format!("  {index}")).fg(Color::DarkGrey)
        };
        let updated = session
            .last_update
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        table.add_row(vec![
            marker,
            Cell::new(truncate(&session.topic, 40)).fg(Color::Cyan),
            Cell::new(session.messages.len().to_string()).fg(Color::White),
            Cell::new(updated).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} session{}",
        style(sessions.len()).bold(),
        if sessions.len() == 1 { "" } else { "s" }
    );
    println!();
}

/// Create a session, optionally seeded from a mask.
///
/// # Examples
///
/// ```bash
/// confab new
/// confab new --mask-id translator --mask-name "Translator"
/// ```
pub async fn new_session(state: &AppState, mask: Option<Mask>, json: bool) -> Result<()> {
    let session_id = state.store.new_session(mask).await?;
    let session = state.store.current_session().await;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "created": true,
                "sessionId": session_id,
                "topic": session.topic,
                "seededMessages": session.messages.len(),
            })
        );
    } else {
        println!(
            "  {} Session '{}' created and selected.",
            style("+").green().bold(),
            style(&session.topic).cyan()
        );
        if !session.messages.is_empty() {
            println!(
                "  {}",
                style(format!("{} context messages from the mask", session.messages.len())).dim()
            );
        }
    }
    Ok(())
}

/// Select the session at `index`. Out-of-range indices select the last session.
pub async fn select_session(state: &AppState, index: usize, json: bool) -> Result<()> {
    state.store.select_session(index).await;
    let selected = state.store.current_index().await;
    let session = state.store.current_session().await;

    if json {
        println!(
            "{}",
            serde_json::json!({"index": selected, "sessionId": session.id, "topic": session.topic})
        );
        return Ok(());
    }

    if selected != index {
        println!(
            "  {} No session at index {index}, selected the last one.",
            style("!").yellow().bold()
        );
    }
    println!(
        "  {} Now in '{}' (#{selected})",
        style(">").green().bold(),
        style(&session.topic).cyan()
    );
    Ok(())
}

/// Delete the session at `index` after confirmation.
///
/// # Examples
///
/// ```bash
/// confab delete 2
/// confab delete 2 --force
/// ```
pub async fn delete_session(state: &AppState, index: usize, force: bool, json: bool) -> Result<()> {
    let sessions = state.store.sessions().await;
    let Some(session) = sessions.get(index) else {
        anyhow::bail!(
            "No session at index {index} ({} session{})",
            sessions.len(),
            if sessions.len() == 1 { "" } else { "s" }
        );
    };

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete session '{}' ({} messages)?",
                style(&session.topic).red().bold(),
                session.messages.len()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let session_id = state.store.delete_session(index).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"deleted": true, "sessionId": session_id})
        );
    } else {
        println!(
            "  {} Session '{}' deleted.",
            style("x").red().bold(),
            session.topic
        );
    }
    Ok(())
}

/// Show the current session's messages.
pub async fn show_history(state: &AppState, json: bool) -> Result<()> {
    let session = state.store.current_session().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    println!();
    println!("  {}", style(&session.topic).cyan().bold());
    if session.messages.is_empty() {
        println!("  {}", style("(no messages yet)").dim());
    }
    print_messages(&session.messages);
    Ok(())
}

pub fn print_messages(messages: &[Message]) {
    println!();
    for message in messages {
        let label = match message.role {
            MessageRole::User => style("You").green(),
            MessageRole::Assistant => style("AI").cyan(),
            MessageRole::System => style("System").magenta(),
        };
        println!("  {} {}", label.bold(), display_text(&message.content));
    }
    println!();
}

/// Human-readable rendering of message content.
pub fn display_text(content: &MessageContent) -> String {
    match content {
        MessageContent::Text(text) => text.clone(),
        MessageContent::Parts(parts) => parts
            .iter()
            .map(|part| match part {
                ContentPart::Text { text } => text.clone(),
                ContentPart::ImageUrl { image_url } => format!("[image: {}]", image_url.url),
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
