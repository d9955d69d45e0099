//! Line commands of the terminal client.

use crate::models::{Role, Session, Turn};
use std::path::PathBuf;

/// Prompt suggestions shown on an empty chat.
pub const SUGGESTIONS: [&str; 3] = [
    "Create a responsive navbar with Tailwind CSS",
    "Build a todo app with React",
    "Make a landing page for a coffee shop",
];

pub const HELP: &str = "\
Commands:
  /attach <path>   stage a file for the next message
  /detach          drop the staged file
  /clear           clear history and session
  /history         print the conversation
  /session         show the current session and preview URL
  /help            show this help
  /quit            exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Submit(String),
    Attach(PathBuf),
    Detach,
    Clear,
    History,
    Session,
    Help,
    Quit,
    /// A slash command that is not recognised, or misses its argument.
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();

    let Some(rest) = line.strip_prefix('/') else {
        return Command::Submit(line.to_string());
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "attach" if arg.is_empty() => Command::Invalid("/attach needs a file path".to_string()),
        "attach" => Command::Attach(PathBuf::from(arg)),
        "detach" => Command::Detach,
        "clear" => Command::Clear,
        "history" => Command::History,
        "session" => Command::Session,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("Unknown command: /{}", other)),
    }
}

pub fn render_turn(turn: &Turn) -> String {
    let speaker = match turn.role() {
        Role::User => "you",
        Role::Assistant => "maya",
    };
    format!("{}> {}", speaker, turn.content())
}

pub fn render_session(session: Option<&Session>) -> String {
    match session {
        None => "No active session.".to_string(),
        Some(session) if session.is_placeholder() => "Local session (no upstream id yet).".to_string(),
        Some(session) => match &session.preview_url {
            Some(url) => format!("Session {}\nPreview: {}", session.id, url),
            None => format!("Session {}", session.id),
        },
    }
}

pub fn render_suggestions() -> String {
    let mut out = String::from("Try one of:");
    for suggestion in SUGGESTIONS {
        out.push_str("\n  - ");
        out.push_str(suggestion);
    }
    out
}
