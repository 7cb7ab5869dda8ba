use crate::prelude::*;

use serde::{Deserialize, Serialize};

/// A channel roster entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub nick: Nickname,
    pub login: Option<String>,
    pub host: Option<String>,
    pub flags: MemberFlagSet,
}

impl Member {
    pub fn new(nick: Nickname) -> Self {
        Self {
            nick,
            login: None,
            host: None,
            flags: MemberFlagSet::new(),
        }
    }

    pub fn with_flags(mut self, flags: MemberFlagSet) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_identity(mut self, login: &str, host: &str) -> Self {
        self.login = Some(login.to_string());
        self.host = Some(host.to_string());
        self
    }
}
