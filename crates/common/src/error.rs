use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Missing context: {0}")]
    MissingContext(String),

    #[error("Cannot {event} while {state}")]
    InvalidTransition { state: String, event: String },

    #[error("Sign-in required")]
    Unauthenticated,

    #[error("Session store error: {0}")]
    Session(String),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Terminal errors leave the current view unusable; the operator has to
    /// navigate away.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Error::MissingContext(_))
    }

    /// Copy of this error for a second consumer
    ///
    /// Wrapped sources that cannot be cloned are carried over as their message.
    pub fn duplicate(&self) -> Error {
        match self {
            Error::Validation(msg) => Error::Validation(msg.clone()),
            Error::Network(msg) => Error::Network(msg.clone()),
            Error::Server { status, message } => Error::Server {
                status: *status,
                message: message.clone(),
            },
            Error::Decode(msg) => Error::Decode(msg.clone()),
            Error::MissingContext(msg) => Error::MissingContext(msg.clone()),
            Error::InvalidTransition { state, event } => Error::InvalidTransition {
                state: state.clone(),
                event: event.clone(),
            },
            Error::Unauthenticated => Error::Unauthenticated,
            Error::Session(msg) => Error::Session(msg.clone()),
            other => Error::Other(anyhow::anyhow!(other.to_string())),
        }
    }

    /// Message suitable for a banner or alert.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::Network(_) => {
                "Could not reach the portal backend. Check that it is running.".to_string()
            }
            Error::Server { message, .. } => message.clone(),
            Error::Unauthenticated => "Please sign in to continue.".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
