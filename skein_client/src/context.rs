use crate::errors::*;
use crate::session::NetworkLink;

use skein_network::modes::ModeTable;
use skein_network::prelude::*;

/// Everything an inbound command handler may touch: the model of the
/// network the line arrived on (changed only by applying operations), the
/// connection it arrived on, and the time it arrived.
pub struct HandlerContext<'a> {
    network: usize,
    replicator: &'a mut Replicator,
    link: &'a mut NetworkLink,
    ts: i64,
}

impl<'a> HandlerContext<'a> {
    pub(crate) fn new(network: usize, replicator: &'a mut Replicator, link: &'a mut NetworkLink, ts: i64) -> Self {
        Self {
            network,
            replicator,
            link,
            ts,
        }
    }

    /// Position of this network in the session model
    pub fn network_index(&self) -> usize {
        self.network
    }

    pub fn network(&self) -> LookupResult<&state::Network> {
        self.replicator.state().network(self.network)
    }

    /// Timestamp to record against any activity created by this line
    pub fn ts(&self) -> i64 {
        self.ts
    }

    /// Apply, and replicate, a change to the model
    pub fn apply(&mut self, op: impl Into<ChangeOp>) -> LookupResult<()> {
        self.replicator.apply(op)
    }

    /// Queue a line for the network
    pub fn send(&self, line: String) {
        match &self.link.connection {
            Some(conn) => conn.send(line),
            None => tracing::debug!(network = self.network, %line, "No connection to send on"),
        }
    }

    pub fn modes(&self) -> &ModeTable {
        &self.link.modes
    }

    pub fn modes_mut(&mut self) -> &mut ModeTable {
        &mut self.link.modes
    }

    pub fn is_own_nick(&self, nick: &str) -> LookupResult<bool> {
        Ok(self.network()?.is_own_nick(nick))
    }

    /// Find a joined channel by name
    pub fn channel(&self, name: &str) -> Result<usize, HandlerError> {
        self.network()?
            .channel_index(name)
            .ok_or_else(|| HandlerError::UnknownChannel(name.to_string()))
    }

    pub fn channel_state(&self, index: usize) -> LookupResult<&state::Channel> {
        self.replicator.state().channel(self.network, index)
    }
}
