//! The per-network session state machine.
//!
//! A [`Session`] owns the authoritative model for its networks, through a
//! [`Replicator`], and one [`NetworkLink`] per network holding whatever is
//! local to the current connection: the line framer, the mode table and the
//! connection handle. Connection events move each network through
//! `Disconnected → Connecting → Connected → Registered → Disconnected`.

use crate::connection::{ConnectionHandle, ConnectionId};
use crate::context::HandlerContext;
use crate::dispatcher::CommandDispatcher;
use crate::errors::*;

use serde::{Deserialize, Serialize};
use skein_network::modes::ModeTable;
use skein_network::network::change::*;
use skein_network::prelude::*;
use skein_network::protocol::{ctcp, outbound, LineFramer, Message};
use skein_network::router;

use state::ConnectionState;
use std::collections::HashMap;
use std::fmt;

/// Names a session, as given in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Source of activity timestamps
pub type Clock = fn() -> i64;

fn utc_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Connection-local state of one network. None of this is replicated.
pub struct NetworkLink {
    pub(crate) framer: LineFramer,
    pub(crate) modes: ModeTable,
    pub(crate) connection: Option<ConnectionHandle>,
}

impl NetworkLink {
    fn new() -> Self {
        Self {
            framer: LineFramer::new(),
            modes: ModeTable::default_channel_modes(),
            connection: None,
        }
    }

    fn is_current(&self, conn: ConnectionId) -> bool {
        self.connection.as_ref().map(|c| c.id) == Some(conn)
    }

    /// Send a quit notice, close the connection, and forget everything
    /// learned from it
    fn tear_down(&mut self, message: &str) {
        if let Some(conn) = self.connection.take() {
            conn.send(outbound::quit(message));
            conn.close();
        }
        self.framer.clear();
        self.modes = ModeTable::default_channel_modes();
    }
}

pub struct Session {
    id: SessionId,
    replicator: Replicator,
    links: HashMap<NetworkId, NetworkLink>,
    network_ids: NetworkIdGenerator,
    clock: Clock,
}

impl Session {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            replicator: Replicator::new(),
            links: HashMap::new(),
            network_ids: NetworkIdGenerator::new(),
            clock: utc_now,
        }
    }

    /// Replace the wall clock used to stamp activity entries
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> &SessionState {
        self.replicator.state()
    }

    /// Register a mirror sink. Only operations applied from now on reach it.
    pub fn add_sink(&mut self, sink: impl ChangeSink + 'static) {
        self.replicator.add_sink(sink);
    }

    pub fn add_network(&mut self, settings: state::NetworkSettings) -> NetworkId {
        let id = self.network_ids.next();
        self.replicator
            .apply(AddNetwork { id, settings })
            .or_log("adding network");
        self.links.insert(id, NetworkLink::new());
        id
    }

    /// IDs of all networks, in model order
    pub fn network_ids(&self) -> Vec<NetworkId> {
        self.state().networks().iter().map(|n| n.id).collect()
    }

    fn index_of(&self, network: NetworkId) -> Result<usize, SessionError> {
        Ok(self.state().network_index(network)?)
    }

    fn set_connection_state(&mut self, index: usize, state: ConnectionState) -> LookupResult<()> {
        if self.state().network(index)?.connection == state {
            return Ok(());
        }
        self.replicator.apply(SetConnectionState {
            network: index,
            state,
        })
    }

    fn status(&mut self, index: usize, text: String) {
        let activity = state::Activity::new((self.clock)(), state::ActivityKind::Status { text });
        self.replicator
            .apply(NetworkActivity {
                network: index,
                activity,
            })
            .or_log("recording network status");
    }

    /// Begin a connection to `network`.
    ///
    /// Any existing connection is sent a quit notice and torn down first;
    /// its buffered input is discarded. `connector` opens the new transport
    /// given the configured host and port.
    pub fn connect(
        &mut self,
        network: NetworkId,
        connector: impl FnOnce(&str, u16) -> ConnectionHandle,
    ) -> Result<ConnectionId, SessionError> {
        let index = self.index_of(network)?;
        let link = self
            .links
            .get_mut(&network)
            .ok_or(SessionError::NoSuchNetwork(network))?;
        link.tear_down("");

        self.set_connection_state(index, ConnectionState::Disconnected)?;

        let settings = &self.state().network(index)?.settings;
        tracing::info!(session = %self.id, %network, host = %settings.host, port = settings.port, "Connecting");
        let handle = connector(&settings.host, settings.port);
        let conn = handle.id;

        if let Some(link) = self.links.get_mut(&network) {
            link.connection = Some(handle);
        }
        self.set_connection_state(index, ConnectionState::Connecting)?;
        Ok(conn)
    }

    /// Tear down the connection to `network`, if there is one
    pub fn disconnect(&mut self, network: NetworkId, message: &str) -> Result<(), SessionError> {
        let index = self.index_of(network)?;
        if let Some(link) = self.links.get_mut(&network) {
            link.tear_down(message);
        }
        self.set_connection_state(index, ConnectionState::Disconnected)?;
        Ok(())
    }

    fn current_link(&mut self, network: NetworkId, conn: ConnectionId) -> Option<&mut NetworkLink> {
        let link = self.links.get_mut(&network)?;
        if link.is_current(conn) {
            Some(link)
        } else {
            tracing::debug!(%network, connection = ?conn, "Dropping event from stale connection");
            None
        }
    }

    /// The transport is up; register with the network
    pub fn connection_established(&mut self, network: NetworkId, conn: ConnectionId) -> Result<(), SessionError> {
        if self.current_link(network, conn).is_none() {
            return Ok(());
        }
        let index = self.index_of(network)?;
        self.set_connection_state(index, ConnectionState::Connected)?;

        let settings = &self.replicator.state().network(index)?.settings;
        let lines = [
            outbound::nick(settings.nick.as_str()),
            outbound::user(&settings.username, &settings.host, &settings.realname),
        ];
        if let Some(conn) = self.links.get(&network).and_then(|l| l.connection.as_ref()) {
            for line in lines {
                conn.send(line);
            }
        }
        Ok(())
    }

    /// Handle bytes received on a connection, dispatching every complete
    /// line in arrival order
    pub fn receive(
        &mut self,
        network: NetworkId,
        conn: ConnectionId,
        data: &[u8],
        dispatcher: &CommandDispatcher,
    ) -> Result<(), SessionError> {
        match self.current_link(network, conn) {
            Some(link) => link.framer.push(data),
            None => return Ok(()),
        }
        let index = self.index_of(network)?;

        loop {
            let Some(link) = self.links.get_mut(&network) else {
                break;
            };
            if !link.is_current(conn) {
                break;
            }
            let Some(line) = link.framer.next_line() else {
                break;
            };
            tracing::trace!(%network, %line, "<- recv");

            let message = match Message::parse(&line) {
                Ok(message) => message,
                Err(e) => {
                    tracing::debug!(%network, %line, "Dropping malformed line: {}", e);
                    continue;
                }
            };

            if !self.replicator.state().network(index)?.connection.is_live() {
                tracing::debug!(%network, command = %message.command, "Not connected; ignoring");
                continue;
            }

            let mut ctx = HandlerContext::new(index, &mut self.replicator, link, (self.clock)());
            dispatcher.dispatch(&mut ctx, &message);
        }
        Ok(())
    }

    /// The transport has gone, for whatever reason
    pub fn connection_closed(
        &mut self,
        network: NetworkId,
        conn: ConnectionId,
        error: &ConnectionError,
    ) -> Result<(), SessionError> {
        match self.current_link(network, conn) {
            Some(link) => {
                link.connection = None;
                link.framer.clear();
            }
            None => return Ok(()),
        }
        let index = self.index_of(network)?;
        tracing::info!(session = %self.id, %network, %error, "Disconnected");
        self.set_connection_state(index, ConnectionState::Disconnected)?;
        self.status(index, format!("Disconnected: {}", error));
        Ok(())
    }

    /// Route one line of user input and send the result.
    ///
    /// `target` is the channel or nick of the window the input was typed in.
    pub fn send_input(&mut self, network: NetworkId, target: Option<&str>, text: &str) -> Result<(), SessionError> {
        let line = router::route(text, target)?;
        let index = self.index_of(network)?;

        let conn = self
            .links
            .get(&network)
            .and_then(|l| l.connection.as_ref())
            .ok_or(SessionError::NotConnected(network))?;
        conn.send(line.clone());

        self.record_own_message(index, &line);
        Ok(())
    }

    /// Networks don't echo our own channel messages back, so record them as
    /// they are sent
    fn record_own_message(&mut self, index: usize, line: &str) {
        let Ok(message) = Message::parse(line) else {
            return;
        };
        if message.command != "PRIVMSG" || message.args.len() < 2 {
            return;
        }
        let Ok(network) = self.state().network(index) else {
            return;
        };
        let Some((channel, _)) = network.channel_by_name(&message.args[0]) else {
            return;
        };

        let from = network.nick.to_string();
        let kind = match ctcp::parse(&message.args[1]) {
            Some(request) if request.command == "ACTION" => state::ActivityKind::Action {
                from,
                text: request.params.to_string(),
            },
            Some(_) => return,
            None => state::ActivityKind::Chat {
                from,
                text: message.args[1].clone(),
            },
        };

        let activity = state::Activity::new((self.clock)(), kind);
        self.replicator
            .apply(ChannelActivity {
                network: index,
                channel,
                activity,
            })
            .or_log("recording own message");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::connection::ConnectionControl;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};

    pub(crate) fn settings() -> state::NetworkSettings {
        state::NetworkSettings {
            name: "testnet".to_string(),
            host: "irc.test.example".to_string(),
            port: 6667,
            nick: Nickname::from_str("me").unwrap(),
            username: "meuser".to_string(),
            realname: "Me Myself".to_string(),
            channels: vec![ChannelName::from_str("#one").unwrap(), ChannelName::from_str("#two").unwrap()],
        }
    }

    /// A session with one network whose connection is a bare channel
    pub(crate) struct Harness {
        pub session: Session,
        pub dispatcher: CommandDispatcher,
        pub network: NetworkId,
        pub conn: ConnectionId,
        sent: UnboundedReceiver<ConnectionControl>,
    }

    impl Harness {
        pub fn connected() -> Self {
            let mut session = Session::new(SessionId::new("test")).with_clock(|| 1000);
            let network = session.add_network(settings());
            let (send, sent) = unbounded_channel();
            let conn = session
                .connect(network, move |_, _| ConnectionHandle::new(ConnectionId::new(1), send))
                .unwrap();
            session.connection_established(network, conn).unwrap();

            Self {
                session,
                dispatcher: CommandDispatcher::new(),
                network,
                conn,
                sent,
            }
        }

        /// Connected, registered, and joined to `#one` with `alice` and `bob`
        pub fn in_channel() -> Self {
            let mut harness = Self::connected();
            harness.feed(":srv 001 me :Welcome\r\n");
            harness.feed(":me!u@h JOIN #one\r\n");
            harness.feed(":srv 353 me = #one :me @alice +bob\r\n:srv 366 me #one :End of /NAMES list.\r\n");
            harness.sent_lines();
            harness
        }

        pub fn feed(&mut self, data: &str) {
            self.session
                .receive(self.network, self.conn, data.as_bytes(), &self.dispatcher)
                .unwrap();
        }

        pub fn sent_lines(&mut self) -> Vec<String> {
            let mut lines = Vec::new();
            while let Ok(control) = self.sent.try_recv() {
                match control {
                    ConnectionControl::Send(line) => lines.push(line),
                    ConnectionControl::Close => lines.push("<close>".to_string()),
                }
            }
            lines
        }

        pub fn network(&self) -> &state::Network {
            self.session.state().network(0).unwrap()
        }

        pub fn channel(&self, name: &str) -> &state::Channel {
            self.network().channel_by_name(name).unwrap().1
        }
    }

    #[test]
    fn registration_sequence() {
        let mut harness = Harness::connected();
        assert_eq!(harness.network().connection, ConnectionState::Connected);
        assert_eq!(
            harness.sent_lines(),
            vec!["NICK me", "USER meuser meuser irc.test.example :Me Myself"]
        );

        harness.feed(":srv 001 me_ :Welcome to the network\r\n");
        assert_eq!(harness.network().connection, ConnectionState::Registered);
        assert_eq!(harness.network().nick.as_str(), "me_");
        assert_eq!(harness.sent_lines(), vec!["JOIN #one", "JOIN #two"]);
    }

    #[test]
    fn lines_split_across_chunks() {
        let mut harness = Harness::connected();
        harness.sent_lines();
        harness.feed("PING :ab");
        assert!(harness.sent_lines().is_empty());
        harness.feed("c123\r");
        harness.feed("\nPING :x\r\n");
        assert_eq!(harness.sent_lines(), vec!["PONG :abc123", "PONG :x"]);
    }

    #[test]
    fn reconnect_discards_old_connection() {
        let mut harness = Harness::in_channel();
        harness.feed("PING :partial");

        let old = harness.conn;
        let (send, _new_sent) = unbounded_channel();
        let new = harness
            .session
            .connect(harness.network, move |_, _| ConnectionHandle::new(ConnectionId::new(2), send))
            .unwrap();

        assert_eq!(harness.sent_lines(), vec!["QUIT :", "<close>"]);
        assert_eq!(harness.network().connection, ConnectionState::Connecting);
        assert!(harness.channel("#one").members.is_empty());

        // Anything still arriving from the old connection is ignored
        harness
            .session
            .receive(harness.network, old, b"\r\n:x!y@z JOIN #one\r\n", &harness.dispatcher)
            .unwrap();
        harness
            .session
            .connection_closed(harness.network, old, &ConnectionError::Closed)
            .unwrap();
        assert_eq!(harness.network().connection, ConnectionState::Connecting);

        harness.session.connection_established(harness.network, new).unwrap();
        assert_eq!(harness.network().connection, ConnectionState::Connected);
    }

    #[test]
    fn transport_close_disconnects() {
        let mut harness = Harness::in_channel();
        harness
            .session
            .connection_closed(harness.network, harness.conn, &ConnectionError::IoError("reset".to_string()))
            .unwrap();

        let network = harness.network();
        assert_eq!(network.connection, ConnectionState::Disconnected);
        assert!(network.channels[0].members.is_empty());
        assert!(matches!(
            &network.activity.last().unwrap().kind,
            state::ActivityKind::Status { text } if text.contains("reset")
        ));
    }

    #[test]
    fn own_input_is_sent_and_recorded() {
        let mut harness = Harness::in_channel();

        harness
            .session
            .send_input(harness.network, Some("#one"), "hello there")
            .unwrap();
        harness
            .session
            .send_input(harness.network, Some("#one"), "/me waves")
            .unwrap();
        harness.session.send_input(harness.network, None, "/whois bob").unwrap();

        assert_eq!(
            harness.sent_lines(),
            vec!["PRIVMSG #one :hello there", "PRIVMSG #one :\x01ACTION waves\x01", "whois bob"]
        );

        let kinds: Vec<_> = harness.channel("#one").activity.iter().map(|a| a.kind.clone()).collect();
        assert_eq!(
            &kinds[kinds.len() - 2..],
            &[
                state::ActivityKind::Chat {
                    from: "me".to_string(),
                    text: "hello there".to_string()
                },
                state::ActivityKind::Action {
                    from: "me".to_string(),
                    text: "waves".to_string()
                },
            ]
        );
    }

    #[test]
    fn input_without_connection_fails() {
        let mut harness = Harness::connected();
        harness.session.disconnect(harness.network, "bye").unwrap();
        assert_eq!(harness.sent_lines().last().map(String::as_str), Some("<close>"));
        assert!(matches!(
            harness.session.send_input(harness.network, Some("#one"), "hi"),
            Err(SessionError::NotConnected(_))
        ));
    }
}
