//! Line commands accepted by the terminal front end.

use crate::errors::AppError;

pub const LANDING_HELP: &str = "Commands: detect | name <text> | password <text> | location <text> | submit | show | quit";
pub const DASHBOARD_HELP: &str = "Commands: show | alert | logout | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Detect,
    Name(String),
    Password(String),
    Location(String),
    Submit,
    Show,
    Alert,
    Logout,
    Help,
    Quit,
}

impl Command {
    /// Parse one input line. Field commands take the rest of the line
    /// verbatim, so `location` alone clears the field.
    pub fn parse(line: &str) -> Result<Self, AppError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "detect" => Command::Detect,
            "name" => Command::Name(rest.to_string()),
            "password" => Command::Password(rest.to_string()),
            "location" => Command::Location(rest.to_string()),
            "submit" | "register" | "login" => Command::Submit,
            "show" | "" => Command::Show,
            "alert" => Command::Alert,
            "logout" => Command::Logout,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown command '{}', type \"help\"",
                    other
                )))
            }
        };
        Ok(command)
    }
}
