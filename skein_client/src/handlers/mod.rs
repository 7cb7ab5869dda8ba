//! Inbound command handlers.
//!
//! Each handler registers itself with the dispatcher through
//! `#[command_handler]`; nothing here is called directly.

// These are here so the handler modules can import everything easily
use crate::context::HandlerContext;
use crate::errors::*;
use skein_macros::command_handler;
use skein_network::network::change::*;
use skein_network::prelude::*;
use skein_network::protocol::{Message, Origin};

use std::str::FromStr;

mod registration;
mod ping;
mod names;
mod join;
mod part;
mod nick;
mod mode;
mod topic;
mod privmsg;

#[cfg(test)]
mod tests;

/// The nickname of a user origin, or fail
fn source_nick(message: &Message) -> Result<&str, HandlerError>
{
    message.source_nick().ok_or(HandlerError::NoSource)
}

/// A display name for whoever sent the message, user or server
fn source_name(message: &Message) -> String
{
    match &message.origin {
        Some(Origin::Peer { nick, .. }) => nick.clone(),
        Some(Origin::Network(name)) => name.clone(),
        None => String::new(),
    }
}
