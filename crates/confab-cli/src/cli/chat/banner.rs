//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
///
/// Shows the session topic, model, and a short session id, with a hint
/// about slash commands.
pub fn print_welcome_banner(topic: &str, model: &str, session_id: &str, message_count: usize) {
    println!();
    println!("  {}", style(topic).cyan().bold());
    println!();
    println!("  {}    {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(short_id(session_id)).dim()
    );
    if message_count > 0 {
        println!(
            "  {} {}",
            style("History:").bold(),
            style(format!("{message_count} messages (/history to show)")).dim()
        );
    }
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}

fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(end, _)| &id[..end])
}
