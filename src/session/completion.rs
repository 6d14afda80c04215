use tokio::sync::oneshot;

use crate::client::err::{PublishError, SubscribeError, UnsubscribeError};
use crate::packet::v5::publish_packet::QualityOfService;
use crate::session::pid::PacketIdentifier;

/// A caller blocked on the acknowledgement that completes its operation,
/// discriminated by operation kind.
pub(crate) enum Completion {
    Subscribe(oneshot::Sender<Result<QualityOfService, SubscribeError>>),
    Unsubscribe(oneshot::Sender<Result<(), UnsubscribeError>>),
    Publish(oneshot::Sender<Result<(), PublishError>>),
}

impl Completion {
    /// The operation was aborted by `disconnect()`.
    pub fn abort(self) {
        match self {
            Completion::Subscribe(tx) => {
                let _ = tx.send(Err(SubscribeError::Closed));
            }
            Completion::Unsubscribe(tx) => {
                let _ = tx.send(Err(UnsubscribeError::Closed));
            }
            Completion::Publish(tx) => {
                let _ = tx.send(Err(PublishError::Closed));
            }
        }
    }

    /// The session the operation was riding on is gone; its ack can never
    /// arrive.
    pub fn fail_session_lost(self) {
        match self {
            Completion::Subscribe(tx) => {
                let _ = tx.send(Err(SubscribeError::Unspecified));
            }
            Completion::Unsubscribe(tx) => {
                let _ = tx.send(Err(UnsubscribeError::Unspecified));
            }
            Completion::Publish(tx) => {
                let _ = tx.send(Err(PublishError::Unspecified));
            }
        }
    }
}

/// Pending operations keyed by packet identifier. Same linear-probe layout
/// as the flight table.
pub(crate) struct CompletionTable {
    entries: Vec<(PacketIdentifier, Completion)>,
}

impl CompletionTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_used(&self, packet_identifier: PacketIdentifier) -> bool {
        self.entries.iter().any(|(id, _)| *id == packet_identifier)
    }

    pub fn insert(&mut self, packet_identifier: PacketIdentifier, completion: Completion) -> bool {
        if self.is_used(packet_identifier) {
            return false;
        }
        self.entries.push((packet_identifier, completion));
        true
    }

    pub fn remove(&mut self, packet_identifier: PacketIdentifier) -> Option<Completion> {
        self.entries
            .iter()
            .position(|(id, _)| *id == packet_identifier)
            .map(|index| self.entries.remove(index).1)
    }

    /// Removes every pending operation.
    pub fn drain_all(&mut self) -> Vec<Completion> {
        self.entries.drain(..).map(|(_, completion)| completion).collect()
    }

    /// Removes subscribe/unsubscribe operations, which cannot complete
    /// across a reconnect; QoS publish operations stay pending.
    pub fn drain_non_publish(&mut self) -> Vec<Completion> {
        let mut drained = Vec::new();
        let mut index = 0;
        while index < self.entries.len() {
            if matches!(self.entries[index].1, Completion::Publish(_)) {
                index += 1;
            } else {
                drained.push(self.entries.remove(index).1);
            }
        }
        drained
    }
}
