//! Defines the [SessionState] object.

use crate::network::change::*;
use crate::prelude::*;

use serde::{Deserialize, Serialize};

/// Stores the complete model for one session: every configured network, its
/// joined channels, their rosters and activity.
///
/// ## General Principles
///
/// A `SessionState` is fully serializable and cloneable. Networks and
/// channels are kept in ordered lists, and operations refer to them by
/// position, so two models that have seen the same operations in the same
/// order are structurally identical.
///
/// The only way to change a `SessionState` is [`apply`](Self::apply). An
/// authoritative copy is driven by the protocol handlers; mirrors are driven
/// by replaying the same operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    networks: Vec<state::Network>,
}

impl SessionState {
    /// Create an empty session model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a [ChangeOp] to the model.
    ///
    /// ## Return Value
    ///
    /// `Ok(())` if the operation was applied. `Err(_)` if it refers to a
    /// network, channel or member that doesn't exist; in that case the model
    /// is left unchanged. Because the outcome depends only on the prior
    /// state and the operation, a mirror replaying the same operation fails
    /// in the same way.
    pub fn apply(&mut self, op: &ChangeOp) -> LookupResult<()> {
        match op {
            ChangeOp::AddNetwork(detail) => self.add_network(detail),
            ChangeOp::RemoveNetwork(detail) => self.remove_network(detail),
            ChangeOp::SetConnectionState(detail) => self.set_connection_state(detail),
            ChangeOp::SetNickname(detail) => self.set_nickname(detail),
            ChangeOp::NetworkActivity(detail) => self.network_activity(detail),
            ChangeOp::AddChannel(detail) => self.add_channel(detail),
            ChangeOp::RemoveChannel(detail) => self.remove_channel(detail),
            ChangeOp::AppendPendingMembers(detail) => self.append_pending_members(detail),
            ChangeOp::CommitMemberList(detail) => self.commit_member_list(detail),
            ChangeOp::Join(detail) => self.member_joined(detail),
            ChangeOp::Part(detail) => self.member_parted(detail),
            ChangeOp::Kick(detail) => self.member_kicked(detail),
            ChangeOp::ChannelActivity(detail) => self.channel_activity(detail),
            ChangeOp::MemberModeChange(detail) => self.member_mode_change(detail),
            ChangeOp::RenameMember(detail) => self.rename_member(detail),
            ChangeOp::MemberQuit(detail) => self.member_quit(detail),
            ChangeOp::SetTopic(detail) => self.set_topic(detail),
        }
    }
}

mod accessors;

mod channel_state;
mod member_state;
mod network_state;
