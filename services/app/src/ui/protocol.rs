//! services/app/src/ui/protocol.rs
//!
//! Defines the line commands the terminal front end accepts. Each line typed
//! by the user parses into exactly one `Command`.

use std::str::FromStr;
use ticketflow_core::domain::{Route, TicketId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Switch screens. Protected screens are still subject to the guard.
    Navigate(Route),
    Login { email: String, password: String },
    Signup { email: String, password: String },
    Logout,

    // --- Ticket form ---
    NewTicket,
    Edit(TicketId),
    Delete(TicketId),
    SetTitle(String),
    SetDescription(String),
    SetStatus(String),
    SetPriority(String),
    Submit,
    Cancel,

    Dismiss,
    /// An empty line; re-renders the current screen.
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseCommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a ticket id")]
    InvalidId(String),
}

fn parse_id(raw: &str) -> Result<TicketId, ParseCommandError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseCommandError::InvalidId(raw.trim().to_string()))
}

/// Splits "email password" where the password may itself contain spaces.
fn credentials(rest: &str) -> (String, String) {
    let mut parts = rest.trim().splitn(2, char::is_whitespace);
    let email = parts.next().unwrap_or_default().to_string();
    let password = parts.next().unwrap_or_default().trim_start().to_string();
    (email, password)
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match (word.to_lowercase().as_str(), rest.is_empty()) {
            ("", _) => Self::Refresh,
            ("home", true) => Self::Navigate(Route::Landing),
            ("dashboard", true) => Self::Navigate(Route::Dashboard),
            ("tickets", true) => Self::Navigate(Route::Tickets),
            ("login", true) => Self::Navigate(Route::Login),
            ("signup", true) => Self::Navigate(Route::Signup),
            ("go", false) => Self::Navigate(Route::from_path(rest)),
            ("go", true) => return Err(ParseCommandError::MissingArgument("go")),
            ("login", false) => {
                let (email, password) = credentials(rest);
                Self::Login { email, password }
            }
            ("signup", false) => {
                let (email, password) = credentials(rest);
                Self::Signup { email, password }
            }
            ("logout", _) => Self::Logout,
            ("new", _) => Self::NewTicket,
            ("edit", false) => Self::Edit(parse_id(rest)?),
            ("edit", true) => return Err(ParseCommandError::MissingArgument("edit")),
            ("delete", false) => Self::Delete(parse_id(rest)?),
            ("delete", true) => return Err(ParseCommandError::MissingArgument("delete")),
            // Empty values are allowed so a field can be cleared.
            ("title", _) => Self::SetTitle(rest.to_string()),
            ("description", _) => Self::SetDescription(rest.to_string()),
            ("status", _) => Self::SetStatus(rest.to_string()),
            ("priority", _) => Self::SetPriority(rest.to_string()),
            ("submit", _) => Self::Submit,
            ("cancel", _) => Self::Cancel,
            ("dismiss", _) => Self::Dismiss,
            ("help", _) => Self::Help,
            ("quit", _) | ("exit", _) => Self::Quit,
            _ => return Err(ParseCommandError::Unknown(word.to_string())),
        };
        Ok(command)
    }
}
