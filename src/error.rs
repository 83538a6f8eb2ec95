use thiserror::Error;

/// Outcome of a failed command, classified by who is at fault.
///
/// Every command handler returns `Result<(), CommandError>`; the dispatcher
/// turns the error into a chat reply and decides how loudly to log it.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Bad or missing input from the user. The message is shown as-is.
    #[error("{0}")]
    UserInput(String),

    /// Mathematically undefined calculation.
    #[error("Undefined")]
    Domain,

    /// The translation service returned nothing usable. The message is shown as-is.
    #[error("{0}")]
    Service(String),

    /// Anything else. Logged with detail; the user sees a generic error.
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl CommandError {
    /// Text to reply with, given the command's generic fallback message.
    pub fn user_message(&self, generic: &str) -> String {
        match self {
            CommandError::UserInput(message) | CommandError::Service(message) => message.clone(),
            CommandError::Domain => "Undefined".to_string(),
            CommandError::Unexpected(_) => generic.to_string(),
        }
    }
}
