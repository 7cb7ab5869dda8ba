use super::*;
use crate::prelude::*;

use serde::{Deserialize, Serialize};

/// A joined channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: ChannelName,
    pub topic: Option<String>,
    pub members: Vec<Member>,
    /// Roster under construction during a names exchange
    pub pending_members: Vec<Member>,
    pub activity: Vec<Activity>,
}

impl Channel {
    pub fn new(name: ChannelName) -> Self {
        Channel {
            name,
            topic: None,
            members: Vec::new(),
            pending_members: Vec::new(),
            activity: Vec::new(),
        }
    }
}
