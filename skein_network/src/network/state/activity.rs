use crate::modes::ModeEntry;
use crate::prelude::*;

use serde::{Deserialize, Serialize};

/// One entry in a channel or network history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unix timestamp, fixed when the operation was created
    pub ts: i64,
    pub kind: ActivityKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityKind {
    Join { nick: Nickname },
    Part { nick: Nickname, reason: Option<String> },
    Quit { nick: Nickname, reason: Option<String> },
    Kick { nick: Nickname, by: String, reason: Option<String> },
    NickChange { old: Nickname, new: Nickname },
    Chat { from: String, text: String },
    Action { from: String, text: String },
    Notice { from: String, text: String },
    Mode { by: String, changes: Vec<ModeEntry> },
    Topic { by: String, text: String },
    /// Connection lifecycle or other local status text
    Status { text: String },
}

impl Activity {
    pub fn new(ts: i64, kind: ActivityKind) -> Self {
        Self { ts, kind }
    }
}
