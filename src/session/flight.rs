use crate::session::pid::PacketIdentifier;

/// State of one incomplete QoS 1 or QoS 2 handshake.
#[derive(Debug)]
pub(crate) enum FlightState {
    /// A QoS 1 PUBLISH has been sent. The encoded packet is kept so a
    /// session-resumed reconnect can resend it with DUP set.
    AwaitingPuback { packet: Vec<u8> },
    /// A QoS 2 PUBLISH has been sent, same retention as above.
    AwaitingPubrec { packet: Vec<u8> },
    /// A PUBREC has been answered with PUBREL; PUBCOMP finishes the
    /// handshake.
    AwaitingPubcomp,
    /// An inbound QoS 2 PUBLISH held back until its PUBREL arrives, at
    /// which point it is delivered exactly once.
    AwaitingPubrel { topic: String, payload: Vec<u8> },
}

/// In-flight records keyed by packet identifier.
///
/// Backed by a vector with linear probing: in-flight sets are small and
/// insertion order doubles as the resend order after a session resume.
pub(crate) struct FlightTable {
    entries: Vec<(PacketIdentifier, FlightState)>,
}

impl FlightTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn is_used(&self, packet_identifier: PacketIdentifier) -> bool {
        self.entries.iter().any(|(id, _)| *id == packet_identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn insert(&mut self, packet_identifier: PacketIdentifier, state: FlightState) -> bool {
        if self.is_used(packet_identifier) {
            return false;
        }
        self.entries.push((packet_identifier, state));
        true
    }

    /// Tracks an outbound QoS 1 publish awaiting its PUBACK.
    pub fn await_puback(&mut self, packet_identifier: PacketIdentifier, packet: Vec<u8>) -> bool {
        self.insert(packet_identifier, FlightState::AwaitingPuback { packet })
    }

    /// Tracks an outbound QoS 2 publish awaiting its PUBREC.
    pub fn await_pubrec(&mut self, packet_identifier: PacketIdentifier, packet: Vec<u8>) -> bool {
        self.insert(packet_identifier, FlightState::AwaitingPubrec { packet })
    }

    /// Tracks a sent PUBREL awaiting its PUBCOMP.
    pub fn await_pubcomp(&mut self, packet_identifier: PacketIdentifier) -> bool {
        self.insert(packet_identifier, FlightState::AwaitingPubcomp)
    }

    /// Holds an inbound QoS 2 message until its PUBREL.
    pub fn await_pubrel(
        &mut self,
        packet_identifier: PacketIdentifier,
        topic: String,
        payload: Vec<u8>,
    ) -> bool {
        self.insert(
            packet_identifier,
            FlightState::AwaitingPubrel { topic, payload },
        )
    }

    pub fn get(&self, packet_identifier: PacketIdentifier) -> Option<&FlightState> {
        self.entries
            .iter()
            .find(|(id, _)| *id == packet_identifier)
            .map(|(_, state)| state)
    }

    pub fn remove(&mut self, packet_identifier: PacketIdentifier) -> Option<FlightState> {
        self.entries
            .iter()
            .position(|(id, _)| *id == packet_identifier)
            .map(|index| self.entries.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Records in insertion order, which is the order resends go out in.
    pub fn iter(&self) -> impl Iterator<Item = &(PacketIdentifier, FlightState)> {
        self.entries.iter()
    }
}
