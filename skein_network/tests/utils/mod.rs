use serde::Serialize;
use skein_network::network::change::*;
use skein_network::prelude::*;
use std::str::FromStr;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn stringify<T: Serialize>(obj: &T) -> String {
    serde_json::to_string(obj).unwrap()
}

pub fn nick(s: &str) -> Nickname {
    Nickname::from_str(s).unwrap()
}

pub fn chan(s: &str) -> ChannelName {
    ChannelName::from_str(s).unwrap()
}

pub fn settings(name: &str, channels: &[&str]) -> state::NetworkSettings {
    state::NetworkSettings {
        name: name.to_string(),
        host: format!("irc.{}.example", name),
        port: 6667,
        nick: nick("me"),
        username: "me".to_string(),
        realname: "me".to_string(),
        channels: channels.iter().map(|c| chan(c)).collect(),
    }
}

/// A realistic run of operations: two networks, a names exchange, some
/// traffic, a failed lookup and a reconnect.
pub fn sample_operations() -> Vec<ChangeOp> {
    vec![
        AddNetwork { id: NetworkId::new(0), settings: settings("alpha", &["#a"]) }.into(),
        AddNetwork { id: NetworkId::new(1), settings: settings("beta", &["#b"]) }.into(),
        SetConnectionState { network: 0, state: state::ConnectionState::Connecting }.into(),
        SetConnectionState { network: 0, state: state::ConnectionState::Connected }.into(),
        SetConnectionState { network: 0, state: state::ConnectionState::Registered }.into(),
        SetNickname { network: 0, nick: nick("me_") }.into(),
        AddChannel { network: 0, name: chan("#a") }.into(),
        AppendPendingMembers {
            network: 0,
            channel: 0,
            members: vec![
                state::Member::new(nick("me_")),
                state::Member::new(nick("alice")).with_flags(MemberFlag::Op.into()),
            ],
        }
        .into(),
        AppendPendingMembers {
            network: 0,
            channel: 0,
            members: vec![state::Member::new(nick("bob"))],
        }
        .into(),
        CommitMemberList { network: 0, channel: 0 }.into(),
        Join {
            network: 0,
            channel: 0,
            member: state::Member::new(nick("carol")).with_identity("c", "example.org"),
            ts: 100,
        }
        .into(),
        ChannelActivity {
            network: 0,
            channel: 0,
            activity: state::Activity::new(
                101,
                state::ActivityKind::Chat { from: "carol".to_string(), text: "hi".to_string() },
            ),
        }
        .into(),
        MemberModeChange {
            network: 0,
            channel: 0,
            nick: nick("carol"),
            added: MemberFlag::Voice.into(),
            removed: MemberFlagSet::new(),
        }
        .into(),
        // Refers to a channel that doesn't exist; both sides must reject it
        CommitMemberList { network: 1, channel: 3 }.into(),
        RenameMember { network: 0, old: nick("bob"), new: nick("robert"), ts: 102 }.into(),
        SetTopic { network: 0, channel: 0, topic: Some("welcome".to_string()) }.into(),
        Part { network: 0, channel: 0, nick: nick("alice"), reason: None, ts: 103 }.into(),
        MemberQuit { network: 0, nick: nick("carol"), reason: Some("bye".to_string()), ts: 104 }.into(),
        SetConnectionState { network: 0, state: state::ConnectionState::Disconnected }.into(),
        RemoveNetwork { network: 1 }.into(),
    ]
}
