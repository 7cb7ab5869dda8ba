use thiserror::Error;

/// The sender prefix of a protocol line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// A user, in `nick!login@host` form
    Peer {
        nick: String,
        login: String,
        host: String,
    },
    /// Anything else; usually a server name
    Network(String),
}

impl Origin {
    /// Classify a raw prefix (without its leading `:`).
    ///
    /// The nick runs to the first `!`, the login to the next `@`, and the
    /// host is the remainder; all three must be non-empty. Anything that
    /// doesn't fit that shape is taken to be a network identity.
    pub fn parse(raw: &str) -> Self {
        let peer = raw.split_once('!').and_then(|(nick, rest)| {
            let (login, host) = rest.split_once('@')?;
            (!nick.is_empty() && !login.is_empty() && !host.is_empty())
                .then(|| (nick, login, host))
        });

        match peer {
            Some((nick, login, host)) => Origin::Peer {
                nick: nick.to_string(),
                login: login.to_string(),
                host: host.to_string(),
            },
            None => Origin::Network(raw.to_string()),
        }
    }

    /// The nickname, if this is a peer
    pub fn nick(&self) -> Option<&str> {
        match self {
            Origin::Peer { nick, .. } => Some(nick),
            Origin::Network(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Empty line")]
    Empty,
    #[error("Origin prefix with no command")]
    UnterminatedOrigin,
    #[error("No command")]
    MissingCommand,
}

/// A tokenised line received from a network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// The sender, if the line had a prefix
    pub origin: Option<Origin>,
    /// The command or numeric
    pub command: String,
    /// The list of arguments
    pub args: Vec<String>,
}

impl Message {
    /// Decode one line, without its CR LF terminator
    pub fn parse(raw: &str) -> Result<Self, DecodeError> {
        if raw.is_empty() {
            return Err(DecodeError::Empty);
        }

        let mut rest = raw;
        let mut origin = None;

        if let Some(prefixed) = rest.strip_prefix(':') {
            let Some((prefix, remainder)) = prefixed.split_once(' ') else {
                return Err(DecodeError::UnterminatedOrigin);
            };
            origin = Some(Origin::parse(prefix));
            rest = remainder.trim_start_matches(' ');
        }

        if rest.is_empty() {
            return Err(DecodeError::MissingCommand);
        }

        let (command, mut rest) = match rest.split_once(' ') {
            Some((command, rest)) => (command, rest),
            None => (rest, ""),
        };

        let mut args = Vec::new();

        loop {
            if let Some(arg) = rest.strip_prefix(':') {
                args.push(arg.to_string());
                break;
            }

            match rest.find(' ') {
                Some(offset) => {
                    let arg = &rest[0..offset];

                    if !arg.is_empty() {
                        args.push(arg.to_string());
                    }

                    rest = &rest[offset + 1..];
                }
                None => {
                    if !rest.is_empty() {
                        args.push(rest.to_string());
                    }
                    break;
                }
            }
        }

        Ok(Self {
            origin,
            command: command.to_string(),
            args,
        })
    }

    /// The sender's nickname, if sent by a peer
    pub fn source_nick(&self) -> Option<&str> {
        self.origin.as_ref().and_then(Origin::nick)
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}
