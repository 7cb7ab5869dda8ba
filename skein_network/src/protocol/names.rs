//! Parsing of RPL_NAMREPLY roster tokens

use crate::modes::{MemberFlag, MemberFlagSet};

/// One member as listed in a names reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamesEntry {
    pub nick: String,
    pub flags: MemberFlagSet,
}

/// Parse one roster token such as `@+bob`.
///
/// Leading sigils are accumulated as flags; the first non-sigil character
/// starts the nick, which is kept unmodified. A token with no nick is
/// rejected.
pub fn parse_token(token: &str) -> Option<NamesEntry> {
    let nick = token.trim_start_matches(|c: char| MemberFlag::from_prefix(c).is_some());
    if nick.is_empty() {
        return None;
    }

    let sigils = &token[..token.len() - nick.len()];
    let flags = sigils.chars().filter_map(MemberFlag::from_prefix).collect();

    Some(NamesEntry {
        nick: nick.to_string(),
        flags,
    })
}

/// Parse a whole space-separated roster chunk. Bad tokens are logged and
/// skipped without affecting the rest.
pub fn parse_roster(roster: &str) -> Vec<NamesEntry> {
    roster
        .split(' ')
        .filter(|t| !t.is_empty())
        .filter_map(|token| {
            let entry = parse_token(token);
            if entry.is_none() {
                tracing::debug!(token, "Dropping names entry with no nick");
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sigils_become_flags() {
        let entry = parse_token("@+bob").unwrap();
        assert_eq!(entry.nick, "bob");
        assert_eq!(entry.flags, MemberFlag::Op | MemberFlag::Voice);
    }

    #[test]
    fn plain_nick() {
        let entry = parse_token("carol").unwrap();
        assert_eq!(entry.nick, "carol");
        assert!(entry.flags.is_empty());
    }

    #[test]
    fn sigil_only_token_rejected() {
        assert_eq!(parse_token("&"), None);
        assert_eq!(parse_token("~@"), None);
    }

    #[test]
    fn bad_token_does_not_spoil_batch() {
        let entries = parse_roster("~alice & %dave  +eve");
        let nicks: Vec<_> = entries.iter().map(|e| e.nick.as_str()).collect();
        assert_eq!(nicks, vec!["alice", "dave", "eve"]);
        assert_eq!(entries[0].flags, MemberFlag::Owner.into());
        assert_eq!(entries[1].flags, MemberFlag::HalfOp.into());
    }
}
