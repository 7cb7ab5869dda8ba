use serde::{Deserialize, Serialize};
use skein_network::modes::ModeError;
use skein_network::prelude::*;
use skein_network::router::RouterError;
use thiserror::Error;

/// An error that might occur on a single connection.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionError {
    #[error("Connection closed")]
    Closed,
    #[error("I/O Error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ConnectionError {
    fn from(e: std::io::Error) -> Self {
        Self::IoError(e.to_string())
    }
}

/// An error that could occur when handling an inbound message
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Object lookup failed: {0}")]
    LookupError(#[from] LookupError),
    #[error("Invalid name: {0}")]
    InvalidName(#[from] InvalidNameError),
    #[error("Not on channel {0}")]
    UnknownChannel(String),
    #[error("Mode change rejected: {0}")]
    ModeError(#[from] ModeError),
    #[error("Message has no user origin")]
    NoSource,
}

impl HandlerError {
    /// Whether this is a reference to something not in our model, which the
    /// network is entitled to send and we ignore
    pub fn is_unknown_target(&self) -> bool {
        matches!(
            self,
            Self::LookupError(LookupError::NoSuchChannelName(_) | LookupError::NoSuchMember(_))
                | Self::UnknownChannel(_)
        )
    }
}

pub type HandleResult = Result<(), HandlerError>;

/// An error from a request made to a session or the session manager
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No such session {0}")]
    NoSuchSession(String),
    #[error("No such network {0}")]
    NoSuchNetwork(NetworkId),
    #[error("Network {0} is not connected")]
    NotConnected(NetworkId),
    #[error("Object lookup failed: {0}")]
    LookupError(#[from] LookupError),
    #[error("Invalid name: {0}")]
    InvalidName(#[from] InvalidNameError),
    #[error("{0}")]
    RouterError(#[from] RouterError),
}
