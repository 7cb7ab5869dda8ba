use super::*;
use crate::prelude::*;

use serde::{Deserialize, Serialize};

/// Connection lifecycle of one network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    /// Transport is up but the network hasn't confirmed registration
    Connected,
    Registered,
}

impl ConnectionState {
    /// Whether inbound lines should be handled in this state
    pub fn is_live(self) -> bool {
        matches!(self, ConnectionState::Connected | ConnectionState::Registered)
    }
}

/// The configured identity and endpoint of a network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub name: String,
    pub host: String,
    pub port: u16,
    pub nick: Nickname,
    pub username: String,
    pub realname: String,
    /// Channels to join once registered, in order
    pub channels: Vec<ChannelName>,
}

/// One configured remote endpoint and everything we know about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: NetworkId,
    pub settings: NetworkSettings,
    /// The nickname the network has actually given us
    pub nick: Nickname,
    pub connection: ConnectionState,
    pub channels: Vec<Channel>,
    pub activity: Vec<Activity>,
}

impl Network {
    pub fn new(id: NetworkId, settings: NetworkSettings) -> Self {
        Self {
            id,
            nick: settings.nick.clone(),
            settings,
            connection: ConnectionState::Disconnected,
            channels: Vec::new(),
            activity: Vec::new(),
        }
    }
}
