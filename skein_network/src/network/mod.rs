#![allow(clippy::module_inception)]
#![allow(clippy::new_without_default)]

/// Defines the plain state objects making up a session model
pub mod state {
    mod network;
    mod channel;
    mod member;
    mod activity;

    pub use network::*;
    pub use channel::*;
    pub use member::*;
    pub use activity::*;
}

pub mod change;
pub use change::{ChangeOp, ChangeRecord, ChangeRecordError};

pub mod errors;
pub use errors::*;

mod session;
pub use session::SessionState;

mod replicator;
pub use replicator::{ChangeSink, Mirror, Replicator, SavedChanges};

#[cfg(test)]
pub mod tests {
    pub mod fixtures;
    mod change_application;
}
