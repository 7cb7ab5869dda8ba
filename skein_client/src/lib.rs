//! Client-side IRC protocol engine.
//!
//! A [`SessionManager`](manager::SessionManager) owns any number of
//! [`Session`](session::Session)s, each of which drives one or more networks
//! through their connection lifecycle and keeps an authoritative model of
//! them.
//!
//! # Inbound handling
//!
//! Each connection runs as a [`ConnectionTask`](connection::ConnectionTask),
//! reporting raw byte chunks to the manager. The owning session frames them
//! into lines, decodes each line, and passes it to the
//! [`CommandDispatcher`](dispatcher::CommandDispatcher).
//!
//! Command handler registration is at compile time, via the `inventory` crate, mediated
//! by the `command_handler` macro. To handle a new command, add a function under
//! `handlers` with that attribute - see one of the existing handlers for examples.
//!
//! Handlers see the network model read-only. To change it they apply a
//! state-change operation through their [`HandlerContext`](context::HandlerContext);
//! the session's [`Replicator`](skein_network::network::Replicator) applies it
//! to the authoritative model and queues it for every mirror.
//!
//! # Replication
//!
//! The manager registers a sink with every session which writes each applied
//! operation out as a [`ChangeRecord`](skein_network::network::ChangeRecord),
//! tagged with its session. A display process replays these against its own
//! [`Mirror`](skein_network::network::Mirror).
//!
//! Everything runs on one thread: connection events and user input are
//! processed strictly one at a time.

pub mod config;
pub mod errors;
pub mod tracing_config;

pub mod connection;

pub mod context;
pub mod dispatcher;
mod handlers;

pub mod session;
pub mod manager;
