//! The state-change operation vocabulary.
//!
//! Every mutation of a [`SessionState`](crate::network::SessionState) is one
//! of these operations. Each carries everything its mutation needs,
//! including timestamps, so that applying it is a pure function of the prior
//! state and the operation itself. Networks and channels are addressed by
//! their position in the ordered lists of the model.

use crate::prelude::*;

use skein_macros::state_changes;
use thiserror::Error;

/// Returned when converting a [`ChangeOp`] into the wrong detail type
#[derive(Debug, Error)]
#[error("Wrong state change type")]
pub struct WrongChangeTypeError;

/// The form in which operations cross the replication boundary: a name and
/// an ordered list of arguments.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChangeRecord {
    pub name: String,
    pub args: Vec<serde_json::Value>,
}

#[derive(Debug, Error)]
pub enum ChangeRecordError {
    #[error("Unknown operation {0:?}")]
    UnknownOperation(String),
    #[error("Operation {name} takes {expected} arguments, got {found}")]
    ArgumentCount {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Bad argument: {0}")]
    BadArgument(#[from] serde_json::Error),
}

state_changes!(

/// A named, argument-carrying change to the session model.
ChangeOp => {
    /// A network has been configured
    struct AddNetwork {
        pub id: NetworkId,
        pub settings: state::NetworkSettings,
    }

    /// A network has been removed from the session
    struct RemoveNetwork {
        pub network: usize,
    }

    struct SetConnectionState {
        pub network: usize,
        pub state: state::ConnectionState,
    }

    /// The network has told us which nickname we actually hold
    struct SetNickname {
        pub network: usize,
        pub nick: Nickname,
    }

    /// Something happened that belongs to the network rather than a channel
    struct NetworkActivity {
        pub network: usize,
        pub activity: state::Activity,
    }

    /// Our own join has been confirmed
    struct AddChannel {
        pub network: usize,
        pub name: ChannelName,
    }

    /// We have left, or been removed from, a channel
    struct RemoveChannel {
        pub network: usize,
        pub channel: usize,
    }

    /// A names chunk has arrived for a channel
    struct AppendPendingMembers {
        pub network: usize,
        pub channel: usize,
        pub members: Vec<state::Member>,
    }

    /// The names exchange has ended; the pending roster becomes live
    struct CommitMemberList {
        pub network: usize,
        pub channel: usize,
    }

    /// Someone else has joined a channel we are in
    struct Join {
        pub network: usize,
        pub channel: usize,
        pub member: state::Member,
        pub ts: i64,
    }

    /// Someone else has left a channel we are in
    struct Part {
        pub network: usize,
        pub channel: usize,
        pub nick: Nickname,
        pub reason: Option<String>,
        pub ts: i64,
    }

    /// Someone was kicked from a channel we remain in
    struct Kick {
        pub network: usize,
        pub channel: usize,
        pub nick: Nickname,
        pub by: String,
        pub reason: Option<String>,
        pub ts: i64,
    }

    struct ChannelActivity {
        pub network: usize,
        pub channel: usize,
        pub activity: state::Activity,
    }

    /// Privilege flags of one member have changed
    struct MemberModeChange {
        pub network: usize,
        pub channel: usize,
        pub nick: Nickname,
        pub added: MemberFlagSet,
        pub removed: MemberFlagSet,
    }

    /// Someone changed nickname; applies to every channel of the network
    struct RenameMember {
        pub network: usize,
        pub old: Nickname,
        pub new: Nickname,
        pub ts: i64,
    }

    /// Someone left the network; applies to every channel of the network
    struct MemberQuit {
        pub network: usize,
        pub nick: Nickname,
        pub reason: Option<String>,
        pub ts: i64,
    }

    struct SetTopic {
        pub network: usize,
        pub channel: usize,
        pub topic: Option<String>,
    }
});
