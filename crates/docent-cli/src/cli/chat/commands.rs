//! Slash commands available inside `docent chat`.

use console::style;

#[derive(Debug, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    /// Clear the terminal screen.
    Clear,
    Exit,
    /// Start a new conversation.
    New,
    /// List conversations.
    List,
    /// Switch to the conversation at this 1-based position in `/list`.
    Switch(usize),
    /// Rename the current conversation.
    Rename(String),
    /// Delete a conversation by position, or the current one.
    Delete(Option<usize>),
    /// Upload a PDF into the current conversation.
    Upload(String),
    /// Print the current conversation's messages.
    History,
    /// Deselect the current conversation without deleting it.
    Close,
    /// Change the model used for subsequent queries.
    Model(String),
    /// Unknown command or missing argument; carries the text to show.
    Unknown(String),
}

/// Parse `input` as a slash command. `None` if it does not start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd.to_lowercase(), arg.trim()),
        None => (trimmed.to_lowercase(), ""),
    };

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/new" => ChatCommand::New,
        "/list" | "/ls" => ChatCommand::List,
        "/history" => ChatCommand::History,
        "/close" => ChatCommand::Close,
        "/switch" | "/sw" => match position(arg) {
            Some(n) => ChatCommand::Switch(n),
            None => ChatCommand::Unknown("/switch requires a conversation number".to_string()),
        },
        "/delete" | "/rm" => {
            if arg.is_empty() {
                ChatCommand::Delete(None)
            } else {
                match position(arg) {
                    Some(n) => ChatCommand::Delete(Some(n)),
                    None => ChatCommand::Unknown(format!("'{arg}' is not a conversation number")),
                }
            }
        }
        "/rename" => {
            if arg.is_empty() {
                ChatCommand::Unknown("/rename requires a title".to_string())
            } else {
                ChatCommand::Rename(arg.to_string())
            }
        }
        "/upload" | "/up" => {
            if arg.is_empty() {
                ChatCommand::Unknown("/upload requires a file path".to_string())
            } else {
                ChatCommand::Upload(arg.to_string())
            }
        }
        "/model" => {
            if arg.is_empty() {
                ChatCommand::Unknown("/model requires a model name".to_string())
            } else {
                ChatCommand::Model(arg.to_string())
            }
        }
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// 1-based list position; zero is rejected.
fn position(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|n| *n > 0)
}

pub fn print_help() {
    let rows = [
        ("/help", "Show this help message"),
        ("/new", "Start a new conversation"),
        ("/list", "List conversations"),
        ("/switch N", "Switch to conversation N"),
        ("/rename TITLE", "Rename the current conversation"),
        ("/delete [N]", "Delete conversation N (default: current)"),
        ("/upload PATH", "Upload a PDF into this conversation"),
        ("/history", "Show this conversation's messages"),
        ("/model NAME", "Use a different model from now on"),
        ("/close", "Leave the current conversation"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat session"),
    ];

    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    for (cmd, description) in rows {
        println!("  {}{}", style(format!("{cmd:<16}")).cyan(), description);
    }
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
