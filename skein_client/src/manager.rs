//! Owns every session, routes connection events and user input to them,
//! and carries their replication streams out.

use crate::config::{ConfigError, SessionConfig};
use crate::connection::*;
use crate::dispatcher::CommandDispatcher;
use crate::errors::SessionError;
use crate::session::{Session, SessionId};

use serde::{Deserialize, Serialize};
use skein_network::prelude::*;
use std::collections::HashMap;
use tokio::{
    select,
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
};

/// One line of user input, addressed to a network of a session
#[derive(Debug, Clone, Deserialize)]
pub struct InputRequest {
    pub session: SessionId,
    pub network: NetworkId,
    /// Channel or nick of the window the input was typed in
    #[serde(default)]
    pub target: Option<String>,
    pub text: String,
}

/// A replication record, tagged with the session it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRecord {
    pub session: SessionId,
    #[serde(flatten)]
    pub record: ChangeRecord,
}

/// Forwards every operation applied to a session's model to the output
/// stream, in record form
struct RecordSink {
    session: SessionId,
    sender: UnboundedSender<OutputRecord>,
}

impl ChangeSink for RecordSink {
    fn enqueue(&self, op: &ChangeOp) {
        match op.to_record() {
            Ok(record) => {
                let output = OutputRecord {
                    session: self.session.clone(),
                    record,
                };
                if self.sender.send(output).is_err() {
                    tracing::debug!(session = %self.session, "Record receiver has gone");
                }
            }
            Err(e) => tracing::error!(operation = op.name(), "Couldn't encode state change: {}", e),
        }
    }
}

/// Opens a transport for a connection, given its host and port, and returns
/// the handle to it
pub type Connector = dyn FnMut(ConnectionId, &str, u16, UnboundedSender<ConnectionEvent>) -> ConnectionHandle;

pub struct SessionManager {
    sessions: HashMap<SessionId, Session>,
    connections: HashMap<ConnectionId, (SessionId, NetworkId)>,
    connection_ids: ConnectionIdGenerator,
    dispatcher: CommandDispatcher,
    event_send: UnboundedSender<ConnectionEvent>,
    event_recv: UnboundedReceiver<ConnectionEvent>,
    record_send: UnboundedSender<OutputRecord>,
    connector: Box<Connector>,
}

impl SessionManager {
    /// Construct a manager whose replication records go to `records`
    pub fn new(records: UnboundedSender<OutputRecord>) -> Self {
        let (event_send, event_recv) = unbounded_channel();

        Self {
            sessions: HashMap::new(),
            connections: HashMap::new(),
            connection_ids: ConnectionIdGenerator::default(),
            dispatcher: CommandDispatcher::new(),
            event_send,
            event_recv,
            record_send: records,
            connector: Box::new(spawn_tcp),
        }
    }

    /// Replace the TCP connector
    pub fn with_connector(
        mut self,
        connector: impl FnMut(ConnectionId, &str, u16, UnboundedSender<ConnectionEvent>) -> ConnectionHandle + 'static,
    ) -> Self {
        self.connector = Box::new(connector);
        self
    }

    pub fn session(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    /// Create a session and its networks. Nothing is connected yet.
    pub fn add_session(&mut self, config: &SessionConfig) -> Result<SessionId, ConfigError> {
        let id = SessionId::new(config.id.clone());
        if self.sessions.contains_key(&id) {
            return Err(ConfigError::DuplicateSession(config.id.clone()));
        }

        let mut session = Session::new(id.clone());
        session.add_sink(RecordSink {
            session: id.clone(),
            sender: self.record_send.clone(),
        });

        for network in &config.networks {
            session.add_network(network.to_settings()?);
        }

        tracing::info!(session = %id, networks = config.networks.len(), "Added session");
        self.sessions.insert(id.clone(), session);
        Ok(id)
    }

    /// Disconnect every network of a session and drop it
    pub fn remove_session(&mut self, id: &SessionId) -> Result<(), SessionError> {
        let mut session = self
            .sessions
            .remove(id)
            .ok_or_else(|| SessionError::NoSuchSession(id.to_string()))?;

        for network in session.network_ids() {
            session.disconnect(network, "").or_log("disconnecting removed session");
        }
        self.connections.retain(|_, (session_id, _)| session_id != id);
        Ok(())
    }

    /// Open a fresh connection to one network, replacing any existing one
    pub fn connect(&mut self, session_id: &SessionId, network: NetworkId) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::NoSuchSession(session_id.to_string()))?;

        let id = self.connection_ids.next();
        let events = self.event_send.clone();
        let connector = &mut self.connector;
        session.connect(network, |host, port| connector(id, host, port, events))?;

        self.connections
            .retain(|_, (s, n)| !(s == session_id && *n == network));
        self.connections.insert(id, (session_id.clone(), network));
        Ok(())
    }

    /// Connect every network of every session
    pub fn connect_all(&mut self) {
        let targets: Vec<_> = self
            .sessions
            .values()
            .flat_map(|s| s.network_ids().into_iter().map(|n| (s.id().clone(), n)))
            .collect();

        for (session, network) in targets {
            self.connect(&session, network).or_log("connecting");
        }
    }

    /// Process one event from a connection task
    pub fn handle_event(&mut self, event: ConnectionEvent) {
        let id = event.id();
        let Some((session_id, network)) = self.connections.get(&id).cloned() else {
            tracing::debug!(connection = ?id, "Event for unknown connection");
            return;
        };
        let Some(session) = self.sessions.get_mut(&session_id) else {
            return;
        };

        let result = match event {
            ConnectionEvent::Connected(id) => session.connection_established(network, id),
            ConnectionEvent::Data(id, data) => session.receive(network, id, &data, &self.dispatcher),
            ConnectionEvent::Closed(id, error) => {
                self.connections.remove(&id);
                session.connection_closed(network, id, &error)
            }
        };
        result.or_log(format!("handling event on {}/{}", session_id, network));
    }

    /// Route and send one line of user input
    pub fn handle_input(&mut self, request: InputRequest) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&request.session)
            .ok_or_else(|| SessionError::NoSuchSession(request.session.to_string()))?;

        session.send_input(request.network, request.target.as_deref(), &request.text)
    }

    /// Wait for and process the next connection event
    pub async fn process_next_event(&mut self) -> bool {
        match self.event_recv.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Run until the input stream ends, then disconnect everything.
    ///
    /// Events and input are handled one at a time, so no two handlers ever
    /// run concurrently.
    pub async fn run(&mut self, mut input: UnboundedReceiver<InputRequest>) {
        loop {
            select! {
                event = self.event_recv.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => break,
                },
                request = input.recv() => match request {
                    Some(request) => self.handle_input(request).or_warn("handling input"),
                    None => {
                        tracing::info!("Input closed; shutting down");
                        break;
                    }
                },
            }
        }

        self.shutdown();
    }

    /// Disconnect every network of every session
    pub fn shutdown(&mut self) {
        let ids: Vec<_> = self.sessions.keys().cloned().collect();
        for id in ids {
            self.remove_session(&id).or_log("shutting down");
        }
    }
}
