use crate::session::tests::Harness;
use skein_network::modes::{ModeEntry, Polarity};
use skein_network::prelude::*;

use pretty_assertions::assert_eq;
use state::ActivityKind;

fn last_activity(harness: &Harness, channel: &str) -> ActivityKind {
    harness.channel(channel).activity.last().unwrap().kind.clone()
}

fn roster(harness: &Harness, channel: &str) -> Vec<(String, MemberFlagSet)> {
    harness
        .channel(channel)
        .members
        .iter()
        .map(|m| (m.nick.to_string(), m.flags))
        .collect()
}

#[test]
fn ping_gets_pong() {
    let mut harness = Harness::connected();
    harness.sent_lines();
    harness.feed("PING :abc123\r\n");
    assert_eq!(harness.sent_lines(), vec!["PONG :abc123"]);
}

#[test]
fn short_and_unknown_messages_are_dropped() {
    let mut harness = Harness::in_channel();
    let before = harness.session.state().clone();

    harness.feed("PING\r\n:x!y@z JOIN\r\n:srv 999 me :whatever\r\n:srv FOO\r\n\r\n:broken\r\n");
    assert!(harness.sent_lines().is_empty());
    assert_eq!(harness.session.state(), &before);
}

#[test]
fn names_exchange_builds_roster() {
    let harness = Harness::in_channel();
    assert_eq!(
        roster(&harness, "#one"),
        vec![
            ("me".to_string(), MemberFlagSet::new()),
            ("alice".to_string(), MemberFlag::Op.into()),
            ("bob".to_string(), MemberFlag::Voice.into()),
        ]
    );
    assert!(harness.channel("#one").pending_members.is_empty());
}

#[test]
fn names_chunks_wait_for_end() {
    let mut harness = Harness::in_channel();
    harness.feed(":srv 353 me = #one :me ~carol &\r\n");
    assert_eq!(harness.channel("#one").members.len(), 3);
    assert_eq!(harness.channel("#one").pending_members.len(), 2);

    harness.feed(":srv 353 me = #one :@+dave\r\n:srv 366 me #one :End\r\n");
    assert_eq!(
        roster(&harness, "#one"),
        vec![
            ("me".to_string(), MemberFlagSet::new()),
            ("carol".to_string(), MemberFlag::Owner.into()),
            ("dave".to_string(), MemberFlag::Op | MemberFlag::Voice),
        ]
    );
}

#[test]
fn names_for_unknown_channel_ignored() {
    let mut harness = Harness::in_channel();
    let before = harness.session.state().clone();
    harness.feed(":srv 353 me = #nowhere :a b\r\n:srv 366 me #nowhere :End\r\n");
    assert_eq!(harness.session.state(), &before);
}

#[test]
fn third_party_join_and_part() {
    let mut harness = Harness::in_channel();

    harness.feed(":carol!c@example.org JOIN #one\r\n");
    let carol = harness.channel("#one").member("carol").unwrap().clone();
    assert_eq!(carol.login.as_deref(), Some("c"));
    assert_eq!(carol.host.as_deref(), Some("example.org"));
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Join {
            nick: "carol".parse().unwrap()
        }
    );

    harness.feed(":CAROL!c@example.org PART #ONE :later\r\n");
    assert!(harness.channel("#one").member("carol").is_none());
    assert_eq!(harness.network().channels.len(), 1);
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Part {
            nick: "CAROL".parse().unwrap(),
            reason: Some("later".to_string())
        }
    );
}

#[test]
fn own_part_removes_channel() {
    let mut harness = Harness::in_channel();
    harness.feed(":me!u@h PART #one\r\n");
    assert!(harness.network().channels.is_empty());

    // Third-party join to a channel we have left
    harness.feed(":x!y@z JOIN #one\r\n");
    assert!(harness.network().channels.is_empty());
}

#[test]
fn kicks() {
    let mut harness = Harness::in_channel();
    harness.feed(":alice!a@h KICK #one bob :behave\r\n");
    assert!(harness.channel("#one").member("bob").is_none());
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Kick {
            nick: "bob".parse().unwrap(),
            by: "alice".to_string(),
            reason: Some("behave".to_string())
        }
    );

    harness.feed(":alice!a@h KICK #one me\r\n");
    assert!(harness.network().channels.is_empty());
    assert!(matches!(
        &harness.network().activity.last().unwrap().kind,
        ActivityKind::Status { text } if text.starts_with("Kicked from #one")
    ));
}

#[test]
fn nick_changes() {
    let mut harness = Harness::in_channel();
    harness.feed(":bob!b@h NICK robert\r\n");
    assert!(harness.channel("#one").member("robert").is_some());
    assert_eq!(harness.channel("#one").member("robert").unwrap().flags, MemberFlag::Voice.into());

    harness.feed(":me!u@h NICK me2\r\n");
    assert_eq!(harness.network().nick.as_str(), "me2");
    assert!(harness.channel("#one").member("me2").is_some());

    // Our own joins are now recognised under the new nick
    harness.feed(":me2!u@h JOIN #three\r\n");
    assert_eq!(harness.network().channels.len(), 2);
}

#[test]
fn nick_change_onto_stale_member() {
    let mut harness = Harness::in_channel();
    harness.feed(":bob!b@h NICK alice\r\n");

    let nicks: Vec<_> = roster(&harness, "#one").into_iter().map(|(nick, _)| nick).collect();
    assert_eq!(nicks, vec!["me", "alice"]);
    assert_eq!(harness.channel("#one").member("alice").unwrap().flags, MemberFlag::Voice.into());
}

#[test]
fn quit_removes_member() {
    let mut harness = Harness::in_channel();
    harness.feed(":alice!a@h QUIT :gone\r\n");
    assert!(harness.channel("#one").member("alice").is_none());
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Quit {
            nick: "alice".parse().unwrap(),
            reason: Some("gone".to_string())
        }
    );
}

#[test]
fn mode_changes_fold_into_flags() {
    let mut harness = Harness::in_channel();
    harness.feed(":alice!a@h MODE #one +o-v+l bob bob 10\r\n");

    assert_eq!(harness.channel("#one").member("bob").unwrap().flags, MemberFlag::Op.into());
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Mode {
            by: "alice".to_string(),
            changes: vec![
                ModeEntry::new('o', Polarity::Plus, Some("bob")),
                ModeEntry::new('v', Polarity::Minus, Some("bob")),
                ModeEntry::new('l', Polarity::Plus, Some("10")),
            ]
        }
    );
}

#[test]
fn bad_mode_string_changes_nothing() {
    let mut harness = Harness::in_channel();
    let before = harness.session.state().clone();

    harness.feed(":alice!a@h MODE #one +oo bob\r\n");
    harness.feed(":alice!a@h MODE #one o bob\r\n");
    assert_eq!(harness.session.state(), &before);
}

#[test]
fn invalid_nick_in_mode_is_skipped_not_fatal() {
    let mut harness = Harness::in_channel();
    harness.feed(":srv MODE #one +oo bob bad@nick\r\n");

    assert_eq!(harness.channel("#one").member("bob").unwrap().flags, MemberFlag::Op | MemberFlag::Voice);
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Mode {
            by: "srv".to_string(),
            changes: vec![
                ModeEntry::new('o', Polarity::Plus, Some("bob")),
                ModeEntry::new('o', Polarity::Plus, Some("bad@nick")),
            ],
        }
    );
    assert_eq!(harness.channel("#one").members.len(), 3);
}

#[test]
fn isupport_changes_mode_arguments() {
    let mut harness = Harness::in_channel();
    // Make 'l' take no argument and 'X' take one
    harness.feed(":srv 005 me CHANMODES=beI,kX,,lmnt PREFIX=(ov)@+ :are supported\r\n");
    harness.feed(":alice!a@h MODE #one +lXo key bob\r\n");

    assert_eq!(harness.channel("#one").member("bob").unwrap().flags, MemberFlag::Op | MemberFlag::Voice);
}

#[test]
fn messages_and_actions() {
    let mut harness = Harness::in_channel();
    harness.feed(":alice!a@h PRIVMSG #one :hello there\r\n");
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Chat {
            from: "alice".to_string(),
            text: "hello there".to_string()
        }
    );

    harness.feed(":alice!a@h PRIVMSG #one :\x01ACTION waves\x01\r\n");
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Action {
            from: "alice".to_string(),
            text: "waves".to_string()
        }
    );

    let before = harness.session.state().clone();
    harness.feed(":alice!a@h PRIVMSG me :psst\r\n");
    harness.feed(":alice!a@h PRIVMSG #one :\x01VERSION\x01\r\n");
    assert_eq!(harness.session.state(), &before);
}

#[test]
fn notices() {
    let mut harness = Harness::in_channel();
    harness.feed(":srv NOTICE * :*** Looking up your hostname\r\n");
    assert_eq!(
        harness.network().activity.last().unwrap().kind,
        ActivityKind::Notice {
            from: "srv".to_string(),
            text: "*** Looking up your hostname".to_string()
        }
    );

    harness.feed(":alice!a@h NOTICE #one :heads up\r\n");
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Notice {
            from: "alice".to_string(),
            text: "heads up".to_string()
        }
    );
}

#[test]
fn topics() {
    let mut harness = Harness::in_channel();
    harness.feed(":srv 332 me #one :Initial topic\r\n");
    assert_eq!(harness.channel("#one").topic.as_deref(), Some("Initial topic"));

    harness.feed(":alice!a@h TOPIC #one :New topic\r\n");
    assert_eq!(harness.channel("#one").topic.as_deref(), Some("New topic"));
    assert_eq!(
        last_activity(&harness, "#one"),
        ActivityKind::Topic {
            by: "alice".to_string(),
            text: "New topic".to_string()
        }
    );

    harness.feed(":alice!a@h TOPIC #one :\r\n");
    assert_eq!(harness.channel("#one").topic, None);
}

#[test]
fn handlers_wait_for_connection() {
    let mut harness = Harness::in_channel();
    harness
        .session
        .disconnect(harness.network, "")
        .unwrap();
    harness.sent_lines();

    // The old connection id is no longer current; nothing gets through
    harness
        .session
        .receive(harness.network, harness.conn, b"PING :late\r\n", &harness.dispatcher)
        .unwrap();
    assert!(harness.sent_lines().is_empty());
}
