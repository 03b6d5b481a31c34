//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and switch, create, list, or delete sessions
//! without leaving the loop.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Exit the chat loop.
    Exit,
    /// Create a session and switch to it.
    New,
    /// List sessions.
    Sessions,
    /// Switch to the session at this index.
    Select(usize),
    /// Delete the session at this index.
    Delete(usize),
    /// Show the current session's messages.
    History,
    /// Unknown command or bad argument, with a message for the user.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, ' ');
    let cmd = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/new" => ChatCommand::New,
        "/sessions" | "/ls" => ChatCommand::Sessions,
        "/history" => ChatCommand::History,
        "/select" | "/s" => match parse_index(arg) {
            Some(index) => ChatCommand::Select(index),
            None => ChatCommand::Unknown("/select requires a session index".to_string()),
        },
        "/delete" | "/rm" => match parse_index(arg) {
            Some(index) => ChatCommand::Delete(index),
            None => ChatCommand::Unknown("/delete requires a session index".to_string()),
        },
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

fn parse_index(arg: Option<&str>) -> Option<usize> {
    arg.and_then(|a| a.parse().ok())
}

/// Print the help text listing all available commands.
pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/new", "Start a new session"),
        ("/sessions", "List sessions"),
        ("/select N", "Switch to session N"),
        ("/delete N", "Delete session N"),
        ("/history", "Show conversation history"),
        ("/exit", "Leave the chat"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, description) in rows {
        println!("  {:<10} {}", style(cmd).cyan(), description);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_select_and_delete() {
        assert_eq!(parse("/select 2"), Some(ChatCommand::Select(2)));
        assert_eq!(parse("/SELECT  3 "), Some(ChatCommand::Select(3)));
        assert_eq!(parse("/delete 0"), Some(ChatCommand::Delete(0)));
    }

    #[test]
    fn test_parse_index_required() {
        assert_eq!(
            parse("/select"),
            Some(ChatCommand::Unknown("/select requires a session index".to_string()))
        );
        assert_eq!(
            parse("/delete two"),
            Some(ChatCommand::Unknown("/delete requires a session index".to_string()))
        );
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/foo"), Some(ChatCommand::Unknown("/foo".to_string())));
    }
}
