//! Keeps an authoritative [`SessionState`] and its mirrors in step

use crate::network::change::*;
use crate::prelude::*;

use std::sync::mpsc::{channel, Receiver, Sender};

/// Trait to be implemented by anything that wants to receive every operation
/// applied to an authoritative model, in order.
///
/// This exists to avoid the model library depending on tokio or any other
/// async runtime for channel types.
pub trait ChangeSink {
    /// Queue one applied operation for delivery
    fn enqueue(&self, op: &ChangeOp);
}

/// Owns the authoritative model for a session.
///
/// [`apply`](Self::apply) is the sole path by which the model changes: the
/// operation is applied locally, then queued for every registered sink.
#[derive(Default)]
pub struct Replicator {
    state: SessionState,
    sinks: Vec<Box<dyn ChangeSink>>,
}

impl Replicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the authoritative model
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Register a sink. It will see every operation applied from now on;
    /// anything earlier must come from a [`snapshot`](Self::snapshot).
    pub fn add_sink(&mut self, sink: impl ChangeSink + 'static) {
        self.sinks.push(Box::new(sink));
    }

    /// A copy of the current model, for seeding a mirror that attaches late
    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    /// Apply an operation to the authoritative model and queue it for every
    /// sink.
    ///
    /// The operation is queued whether or not it applied cleanly: a mirror
    /// replaying it reaches the same outcome, including the same lookup
    /// failure.
    pub fn apply(&mut self, op: impl Into<ChangeOp>) -> LookupResult<()> {
        let op = op.into();
        let result = self.state.apply(&op);

        if let Err(e) = &result {
            tracing::error!(operation = op.name(), error = %e, "Failed to apply state change");
        }

        for sink in &self.sinks {
            sink.enqueue(&op);
        }

        result
    }
}

/// An independently held copy of a session model, kept consistent only by
/// replaying operation records.
#[derive(Debug, Clone, Default)]
pub struct Mirror {
    state: SessionState,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a snapshot of the authoritative model
    pub fn from_snapshot(state: SessionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Replay one record received across the replication boundary.
    ///
    /// Records this build doesn't understand are logged and skipped, so that
    /// a newer authority can't crash an older mirror.
    pub fn apply_record(&mut self, record: &ChangeRecord) {
        match ChangeOp::from_record(record) {
            Ok(op) => self.apply(&op),
            Err(ChangeRecordError::UnknownOperation(name)) => {
                tracing::warn!(operation = %name, "Ignoring unknown state change");
            }
            Err(e) => {
                tracing::warn!(operation = %record.name, error = %e, "Ignoring malformed state change");
            }
        }
    }

    /// Replay one operation directly
    pub fn apply(&mut self, op: &ChangeOp) {
        if let Err(e) = self.state.apply(op) {
            // The authority saw the same failure when it applied this
            tracing::debug!(operation = op.name(), error = %e, "State change did not apply");
        }
    }
}

/// A [`ChangeSink`] which stores operations for later playback
pub struct SavedChanges {
    sender: Sender<ChangeOp>,
    receiver: Receiver<ChangeOp>,
}

impl ChangeSink for SavedChanges {
    fn enqueue(&self, op: &ChangeOp) {
        self.sender.send(op.clone()).or_log("saving state change");
    }
}

impl SavedChanges {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Drain every stored operation, in order
    pub fn drain(&self) -> Vec<ChangeOp> {
        self.receiver.try_iter().collect()
    }
}

impl Default for SavedChanges {
    fn default() -> Self {
        Self::new()
    }
}

/// Lets one sink be registered with a replicator while a clone is kept for
/// reading.
impl<T: ChangeSink + ?Sized> ChangeSink for std::rc::Rc<T> {
    fn enqueue(&self, op: &ChangeOp) {
        (**self).enqueue(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::tests::fixtures::*;
    use pretty_assertions::assert_eq;
    use std::rc::Rc;

    #[test]
    fn sinks_see_every_operation_in_order() {
        let saved = Rc::new(SavedChanges::new());
        let mut replicator = Replicator::new();
        replicator.add_sink(Rc::clone(&saved));

        replicator.apply(add_network_op(0)).unwrap();
        replicator
            .apply(AddChannel {
                network: 0,
                name: chan("#a"),
            })
            .unwrap();

        let names: Vec<_> = saved.drain().iter().map(ChangeOp::name).collect();
        assert_eq!(names, vec!["AddNetwork", "AddChannel"]);
    }

    #[test]
    fn failed_operations_are_still_replicated() {
        let saved = Rc::new(SavedChanges::new());
        let mut replicator = Replicator::new();
        replicator.add_sink(Rc::clone(&saved));

        let result = replicator.apply(CommitMemberList {
            network: 3,
            channel: 0,
        });
        assert_eq!(result, Err(LookupError::NoSuchNetwork(3)));
        assert_eq!(saved.drain().len(), 1);
    }

    #[test]
    fn mirror_ignores_unknown_records() {
        let mut mirror = Mirror::new();
        mirror.apply_record(&ChangeRecord {
            name: "FromTheFuture".to_string(),
            args: vec![serde_json::json!(1)],
        });
        assert_eq!(mirror.state(), &SessionState::new());
    }

    #[test]
    fn late_mirror_from_snapshot() {
        let saved = Rc::new(SavedChanges::new());
        let mut replicator = Replicator::new();
        replicator.apply(add_network_op(0)).unwrap();

        let mut mirror = Mirror::from_snapshot(replicator.snapshot());
        replicator.add_sink(Rc::clone(&saved));
        replicator
            .apply(AddChannel {
                network: 0,
                name: chan("#late"),
            })
            .unwrap();

        for op in saved.drain() {
            mirror.apply_record(&op.to_record().unwrap());
        }
        assert_eq!(mirror.state(), replicator.state());
    }
}
