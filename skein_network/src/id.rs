//! Defines the ID types used to refer to model objects from outside

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a network within a session for the session's lifetime.
///
/// Operations address networks by position; this ID is for collaborators
/// (connections, input requests) that must survive earlier networks being
/// removed.
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(u32);

impl NetworkId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "net{}", self.0)
    }
}

/// Hands out sequential [`NetworkId`]s
#[derive(Debug, Default)]
pub struct NetworkIdGenerator {
    next: u32,
}

impl NetworkIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> NetworkId {
        let id = NetworkId(self.next);
        self.next += 1;
        id
    }
}
