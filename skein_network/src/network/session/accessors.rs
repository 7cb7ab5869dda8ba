use super::SessionState;
use crate::prelude::*;

impl SessionState {
    /// All networks, in configuration order
    pub fn networks(&self) -> &[state::Network] {
        &self.networks
    }

    /// Look up a network by position
    pub fn network(&self, index: usize) -> LookupResult<&state::Network> {
        self.networks.get(index).ok_or(LookupError::NoSuchNetwork(index))
    }

    pub(super) fn network_mut(&mut self, index: usize) -> LookupResult<&mut state::Network> {
        self.networks
            .get_mut(index)
            .ok_or(LookupError::NoSuchNetwork(index))
    }

    /// Find the current position of a network by its stable ID
    pub fn network_index(&self, id: NetworkId) -> LookupResult<usize> {
        self.networks
            .iter()
            .position(|n| n.id == id)
            .ok_or(LookupError::NoSuchNetworkId(id))
    }

    /// Look up a channel by network and channel position
    pub fn channel(&self, network: usize, channel: usize) -> LookupResult<&state::Channel> {
        self.network(network)?
            .channels
            .get(channel)
            .ok_or(LookupError::NoSuchChannel { network, channel })
    }

    pub(super) fn channel_mut(
        &mut self,
        network: usize,
        channel: usize,
    ) -> LookupResult<&mut state::Channel> {
        self.network_mut(network)?
            .channels
            .get_mut(channel)
            .ok_or(LookupError::NoSuchChannel { network, channel })
    }
}

impl state::Network {
    /// Position of a joined channel, matched case-insensitively
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.channels.iter().position(|c| c.name == name)
    }

    /// Look up a joined channel by name, returning its position as well
    pub fn channel_by_name(&self, name: &str) -> Option<(usize, &state::Channel)> {
        self.channel_index(name).map(|index| (index, &self.channels[index]))
    }

    /// Whether `nick` is the nickname we currently hold on this network
    pub fn is_own_nick(&self, nick: &str) -> bool {
        self.nick == nick
    }
}

impl state::Channel {
    pub fn member(&self, nick: &str) -> Option<&state::Member> {
        self.members.iter().find(|m| m.nick == nick)
    }

    pub fn member_index(&self, nick: &str) -> Option<usize> {
        self.members.iter().position(|m| m.nick == nick)
    }

    /// Whether a names exchange is in progress
    pub fn is_assembling_names(&self) -> bool {
        !self.pending_members.is_empty()
    }
}
