//! Defines errors returned by the other modules

use crate::prelude::*;
use thiserror::Error;

/// Types of error that can occur while looking up model objects
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("No such network index {0}")]
    NoSuchNetwork(usize),
    #[error("No such network id {0}")]
    NoSuchNetworkId(NetworkId),
    #[error("No such channel index {channel} on network {network}")]
    NoSuchChannel { network: usize, channel: usize },
    #[error("No such channel name {0}")]
    NoSuchChannelName(ChannelName),
    #[error("No such member {0}")]
    NoSuchMember(Nickname),
}

/// Convenience definition of a Result type used to look up model objects.
pub type LookupResult<T> = std::result::Result<T, LookupError>;
