//! Defines validated string types for nicknames and channel names
//!
//! Both compare, hash and order case-insensitively using the RFC 1459
//! casemapping, while preserving the original spelling for display.

use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};
use thiserror::Error;

/// A value failed validation for the named type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidNameError {
    #[error("Invalid value for Nickname: {0:?}")]
    Nickname(String),
    #[error("Invalid value for ChannelName: {0:?}")]
    ChannelName(String),
}

/// Characters that may begin a channel name
pub const CHANNEL_PREFIXES: &[char] = &['#', '&', '+', '!'];

/// Fold a single character under the RFC 1459 casemapping
fn fold_char(c: char) -> char {
    match c {
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        '~' => '^',
        c => c.to_ascii_lowercase(),
    }
}

/// Fold a whole string under the RFC 1459 casemapping
pub fn casefold(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

fn folded_eq(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.chars().map(fold_char).eq(b.chars().map(fold_char))
}

/// Check whether a string is syntactically a channel name
pub fn is_channel_name(s: &str) -> bool {
    s.starts_with(CHANNEL_PREFIXES)
}

macro_rules! casefolded_name {
    ($name:ident, $err:ident) => {
        #[derive(Clone, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The casefolded form, suitable for use as a lookup key
            pub fn folded(&self) -> String {
                casefold(&self.0)
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                folded_eq(&self.0, &other.0)
            }
        }

        impl Eq for $name {}

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                folded_eq(&self.0, other)
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                folded_eq(&self.0, other)
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                for c in self.0.chars() {
                    fold_char(c).hash(state);
                }
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.chars().map(fold_char).cmp(other.0.chars().map(fold_char))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = InvalidNameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from(s.to_string())
            }
        }

        impl TryFrom<String> for $name {
            type Error = InvalidNameError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                if Self::is_valid(&value) {
                    Ok(Self(value))
                } else {
                    Err(InvalidNameError::$err(value))
                }
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> String {
                value.0
            }
        }
    };
}

casefolded_name!(Nickname, Nickname);
casefolded_name!(ChannelName, ChannelName);

impl Nickname {
    /// Nicknames are accepted permissively: anything non-empty that can't be
    /// confused with a prefix, channel or trailing argument.
    fn is_valid(value: &str) -> bool {
        !value.is_empty()
            && !value.starts_with(':')
            && !is_channel_name(value)
            && !value.contains(|c: char| c.is_whitespace() || c == '!' || c == '@' || c == ',')
    }
}

impl ChannelName {
    fn is_valid(value: &str) -> bool {
        value.len() > 1
            && is_channel_name(value)
            && !value.contains(|c: char| c.is_whitespace() || c == ',' || c == '\x07')
    }
}
