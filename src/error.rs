//! Error types for the Ingen remote client.

use thiserror::Error;

/// Errors produced while talking to an Ingen server.
#[derive(Error, Debug)]
pub enum Error {
    /// The connection URI or a configuration value is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Connect, read or write failed, or the peer hung up mid-message.
    #[error("transport error: {message}")]
    Transport {
        /// What the transport was doing when it failed.
        message: String,
        /// Underlying OS error, if there was one.
        #[source]
        source: Option<std::io::Error>,
    },

    /// The server sent something that is not a valid protocol response.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The server answered with a non-zero status code.
    #[error("{description}; cause: {cause}")]
    Application {
        /// Numeric status code from the response body.
        code: i64,
        /// Human-readable description, or the raw code when none is known.
        description: String,
        /// The request text that triggered the failure.
        cause: String,
    },
}

impl Error {
    pub(crate) fn transport(message: impl Into<String>, source: std::io::Error) -> Self {
        Error::Transport {
            message: message.into(),
            source: Some(source),
        }
    }

    pub(crate) fn closed(message: impl Into<String>) -> Self {
        Error::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Status code of an application error.
    pub fn code(&self) -> Option<i64> {
        match self {
            Error::Application { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<rio_turtle::TurtleError> for Error {
    fn from(e: rio_turtle::TurtleError) -> Self {
        Error::Protocol(e.to_string())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
