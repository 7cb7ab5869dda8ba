//! Socket I/O for one network connection.
//!
//! Each connection runs as its own task, reading raw byte chunks and writing
//! queued lines. Framing and decoding happen in the owning session, so that
//! tearing a connection down discards whatever it had buffered.

use crate::errors::ConnectionError;

use serde::Serialize;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    net::TcpStream,
    select,
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
};

const READ_CHUNK: usize = 4096;

/// Identifies one connection attempt. A reconnect always gets a fresh ID, so
/// events still in flight from the old connection can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Default)]
pub struct ConnectionIdGenerator {
    next: u64,
}

impl ConnectionIdGenerator {
    pub fn next(&mut self) -> ConnectionId {
        self.next += 1;
        ConnectionId(self.next)
    }
}

#[derive(Debug)]
pub enum ConnectionControl {
    /// Write one line; the terminator is added here
    Send(String),
    Close,
}

/// Reported by a connection task to its owner
#[derive(Debug)]
pub enum ConnectionEvent {
    Connected(ConnectionId),
    Data(ConnectionId, Vec<u8>),
    Closed(ConnectionId, ConnectionError),
}

impl ConnectionEvent {
    pub fn id(&self) -> ConnectionId {
        match self {
            Self::Connected(id) | Self::Data(id, _) | Self::Closed(id, _) => *id,
        }
    }
}

/// The owner's handle to a running connection task
#[derive(Debug)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    send_channel: UnboundedSender<ConnectionControl>,
}

impl ConnectionHandle {
    pub fn new(id: ConnectionId, send_channel: UnboundedSender<ConnectionControl>) -> Self {
        Self { id, send_channel }
    }

    fn send_control(&self, msg: ConnectionControl) {
        if let Err(e) = self.send_channel.send(msg) {
            tracing::debug!(connection = ?self.id, "Connection task has gone: {}", e);
        }
    }

    /// Queue a line for sending
    pub fn send(&self, line: String) {
        tracing::trace!(connection = ?self.id, %line, "-> send");
        self.send_control(ConnectionControl::Send(line));
    }

    /// Close the connection once everything queued so far has been written
    pub fn close(&self) {
        self.send_control(ConnectionControl::Close);
    }
}

pub struct ConnectionTask<S> {
    id: ConnectionId,
    conn: S,
    control_channel: UnboundedReceiver<ConnectionControl>,
    event_channel: UnboundedSender<ConnectionEvent>,
}

impl<S> ConnectionTask<S>
where
    S: AsyncRead + AsyncWrite,
{
    pub fn new(
        id: ConnectionId,
        stream: S,
        control: UnboundedReceiver<ConnectionControl>,
        events: UnboundedSender<ConnectionEvent>,
    ) -> Self {
        Self {
            id,
            conn: stream,
            control_channel: control,
            event_channel: events,
        }
    }

    pub async fn run(mut self) {
        let (mut reader, mut writer) = tokio::io::split(self.conn);
        let mut buf = vec![0u8; READ_CHUNK];

        let reason = loop {
            select! {
                control = self.control_channel.recv() => match control {
                    None | Some(ConnectionControl::Close) => break ConnectionError::Closed,
                    Some(ConnectionControl::Send(line)) => {
                        let framed = format!("{}\r\n", line);
                        if let Err(e) = writer.write_all(framed.as_bytes()).await {
                            break e.into();
                        }
                    }
                },
                read = reader.read(&mut buf) => match read {
                    Ok(0) => break ConnectionError::Closed,
                    Ok(n) => {
                        if self.event_channel.send(ConnectionEvent::Data(self.id, buf[..n].to_vec())).is_err() {
                            tracing::error!("Error notifying socket data on connection {:?}", self.id);
                            return;
                        }
                    }
                    Err(e) => break e.into(),
                }
            }
        };

        if let Err(e) = writer.shutdown().await {
            tracing::debug!(connection = ?self.id, "Error shutting down writer: {}", e);
        }

        tracing::info!(connection = ?self.id, %reason, "closing");
        if self.event_channel.send(ConnectionEvent::Closed(self.id, reason)).is_err() {
            tracing::error!("Error notifying connection closed on {:?}", self.id);
        }
    }
}

/// Start a connection task over an already-open stream
pub fn spawn_stream<S>(
    id: ConnectionId,
    stream: S,
    events: UnboundedSender<ConnectionEvent>,
) -> ConnectionHandle
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (control_send, control_recv) = unbounded_channel();

    tokio::spawn(async move {
        if events.send(ConnectionEvent::Connected(id)).is_ok() {
            ConnectionTask::new(id, stream, control_recv, events).run().await;
        }
    });

    ConnectionHandle::new(id, control_send)
}

/// Connect to `host:port` in the background and start a connection task.
///
/// Lines queued on the returned handle before the connect completes are
/// written once it does.
pub fn spawn_tcp(
    id: ConnectionId,
    host: &str,
    port: u16,
    events: UnboundedSender<ConnectionEvent>,
) -> ConnectionHandle {
    let (control_send, control_recv) = unbounded_channel();
    let host = host.to_string();

    tokio::spawn(async move {
        match TcpStream::connect((host.as_str(), port)).await {
            Ok(stream) => {
                tracing::info!(connection = ?id, %host, port, "connected");
                if events.send(ConnectionEvent::Connected(id)).is_ok() {
                    ConnectionTask::new(id, stream, control_recv, events).run().await;
                }
            }
            Err(e) => {
                tracing::warn!(connection = ?id, %host, port, "Connect failed: {}", e);
                if events.send(ConnectionEvent::Closed(id, e.into())).is_err() {
                    tracing::error!("Error notifying connect failure on {:?}", id);
                }
            }
        }
    });

    ConnectionHandle::new(id, control_send)
}
