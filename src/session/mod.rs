//! The session engine: a single actor task owning all connection state.
//!
//! Every state transition, in-flight record and pending completion lives on
//! this task. Public API calls post [`Command`]s onto it over a channel and
//! transport bytes are pulled in the same `select!` loop, so no external
//! locking is needed anywhere. The loop also drives the keep-alive timer
//! and the 5-second reconnect cadence after an unexpected transport drop.

pub(crate) mod completion;
pub(crate) mod flight;
pub(crate) mod pid;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error, info, trace, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};

use crate::client::client_config::{ClientOptions, SubscriptionOptions};
use crate::client::err::{ConnectError, PublishError, SubscribeError, UnsubscribeError};
use crate::network::{Transport, TransportError};
use crate::packet::v5::connack_packet::ConnackPacket;
use crate::packet::v5::connect_packet::ConnectPacket;
use crate::packet::v5::disconnect_packet::DisconnectPacket;
use crate::packet::v5::decoder::PacketDecoder;
use crate::packet::v5::mqtt_packet::{encode_to_vec, Packet};
use crate::packet::v5::pingreq_packet::PingreqPacket;
use crate::packet::v5::puback_packet::{
    PubackPacket, PubcompPacket, PubrecPacket, PubrelPacket,
};
use crate::packet::v5::publish_packet::{PublishPacket, QualityOfService, DUP_FLAG};
use crate::packet::v5::reason_codes::{
    ConnectReasonCode, PubackReasonCode, PubrelReasonCode, SubackReasonCode, UnsubackReasonCode,
};
use crate::packet::v5::rx::{decode_packet, RxPacket};
use crate::packet::v5::suback_packet::SubackPacket;
use crate::packet::v5::subscription_packet::SubscriptionPacket;
use crate::packet::v5::unsuback_packet::UnsubackPacket;
use crate::packet::v5::unsubscription_packet::UnsubscriptionPacket;
use crate::session::completion::{Completion, CompletionTable};
use crate::session::flight::{FlightState, FlightTable};
use crate::session::pid::{PacketIdAllocator, PacketIdentifier};

/// Delay between reconnect attempts after an unexpected transport drop.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Connection state as reported through the state callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    NotConnected,
    Connecting,
    Connected,
    Disconnecting,
    Reconnecting,
    Dropped,
    Disconnected,
}

pub type ReceiveHandler = Box<dyn FnMut(&str, Option<&[u8]>) + Send>;
pub type StateHandler = Box<dyn FnMut(ConnectionState) + Send>;

/// Callback slots shared between the client handle and the session task so
/// they can be (re)registered at any time.
pub(crate) struct Callbacks {
    pub on_receive: Option<ReceiveHandler>,
    pub on_state: Option<StateHandler>,
}

/// Work posted onto the session task by the public API.
pub(crate) enum Command {
    Subscribe {
        filter: String,
        options: SubscriptionOptions,
        reply: oneshot::Sender<Result<QualityOfService, SubscribeError>>,
    },
    Unsubscribe {
        filter: String,
        reply: oneshot::Sender<Result<(), UnsubscribeError>>,
    },
    Publish {
        topic: String,
        qos: QualityOfService,
        payload: Option<Vec<u8>>,
        reply: oneshot::Sender<Result<(), PublishError>>,
    },
    Disconnect,
}

/// Why the connected loop ended.
enum Exit {
    /// `disconnect()` was called or the client handle is gone.
    Shutdown,
    /// The transport failed or the peer closed; reconnect.
    Dropped,
    /// The broker rejected us or broke the protocol; no reconnect.
    Fatal,
}

pub(crate) struct Session {
    options: ClientOptions,
    client_id: String,
    username: Option<String>,
    password: Option<Vec<u8>>,
    callbacks: Arc<Mutex<Callbacks>>,
    state: ConnectionState,
    decoder: PacketDecoder,
    flights: FlightTable,
    completions: CompletionTable,
    pids: PacketIdAllocator,
    /// Topic Alias Maximum negotiated by the broker; aliases themselves are
    /// not used.
    topic_alias_maximum: u16,
    /// Whether the broker is believed to hold session state for us.
    session_tracked: bool,
    pending_connect: Option<oneshot::Sender<Result<bool, ConnectError>>>,
}

impl Session {
    pub fn new(
        options: ClientOptions,
        client_id: String,
        username: Option<String>,
        password: Option<Vec<u8>>,
        callbacks: Arc<Mutex<Callbacks>>,
        pending_connect: oneshot::Sender<Result<bool, ConnectError>>,
    ) -> Self {
        Self {
            options,
            client_id,
            username,
            password,
            callbacks,
            state: ConnectionState::NotConnected,
            decoder: PacketDecoder::new(),
            flights: FlightTable::new(),
            completions: CompletionTable::new(),
            pids: PacketIdAllocator::new(),
            topic_alias_maximum: 0,
            session_tracked: false,
            pending_connect: Some(pending_connect),
        }
    }

    /// Whether the configuration asks the broker to keep session state
    /// across connections.
    fn persistent_session(&self) -> bool {
        !self.options.clean_start && self.options.session_expiry > 0
    }

    fn set_state(&mut self, state: ConnectionState) {
        if self.state == state {
            return;
        }
        debug!("connection state {:?} -> {:?}", self.state, state);
        self.state = state;
        if let Ok(mut callbacks) = self.callbacks.lock() {
            if let Some(on_state) = callbacks.on_state.as_mut() {
                on_state(state);
            }
        }
    }

    fn deliver(&mut self, topic: &str, payload: Option<&[u8]>) {
        let payload = payload.filter(|payload| !payload.is_empty());
        if let Ok(mut callbacks) = self.callbacks.lock() {
            if let Some(on_receive) = callbacks.on_receive.as_mut() {
                on_receive(topic, payload);
            }
        }
    }

    fn fail_connect(&mut self, error: ConnectError) {
        match self.pending_connect.take() {
            Some(reply) => {
                let _ = reply.send(Err(error));
            }
            None => error!("connection rejected during reconnect: {}", error),
        }
    }

    fn allocate_pid(&mut self) -> Option<PacketIdentifier> {
        let flights = &self.flights;
        let completions = &self.completions;
        self.pids
            .allocate(|id| flights.is_used(id) || completions.is_used(id))
    }

    /// Fails every pending operation with `Closed` and clears all stores.
    fn abort_pending(&mut self) {
        if let Some(reply) = self.pending_connect.take() {
            let _ = reply.send(Err(ConnectError::Closed));
        }
        for completion in self.completions.drain_all() {
            completion.abort();
        }
        self.flights.clear();
        self.pids.reset();
        self.session_tracked = false;
    }

    /// Clears all session state after the broker-side session is gone.
    fn reset_session_lost(&mut self) {
        for completion in self.completions.drain_all() {
            completion.fail_session_lost();
        }
        self.flights.clear();
        self.pids.reset();
        self.session_tracked = false;
    }

    /// Cleanup between a drop and the next reconnect attempt.
    fn prepare_reconnect(&mut self) {
        self.decoder.clear();
        for completion in self.completions.drain_non_publish() {
            completion.fail_session_lost();
        }
        if !(self.persistent_session() && self.session_tracked) {
            self.reset_session_lost();
        }
    }

    fn reject_offline(&mut self, command: Command) {
        match command {
            Command::Subscribe { reply, .. } => {
                let _ = reply.send(Err(SubscribeError::Transport(TransportError::NotConnected)));
            }
            Command::Unsubscribe { reply, .. } => {
                let _ = reply.send(Err(UnsubscribeError::Transport(
                    TransportError::NotConnected,
                )));
            }
            Command::Publish { reply, .. } => {
                let _ = reply.send(Err(PublishError::Transport(TransportError::NotConnected)));
            }
            Command::Disconnect => {}
        }
    }

    /// Drives one `connect()` invocation to its terminal `Disconnected`
    /// state, reconnecting through transport drops along the way.
    pub(crate) async fn run<T: Transport>(
        mut self,
        mut transport: T,
        mut commands: mpsc::Receiver<Command>,
    ) {
        let mut initial = true;
        loop {
            self.set_state(if initial {
                ConnectionState::Connecting
            } else {
                ConnectionState::Reconnecting
            });

            if let Err(error) = transport.connect().await {
                if initial {
                    self.fail_connect(error.into());
                    self.set_state(ConnectionState::Disconnected);
                    return;
                }
                warn!("reconnect attempt failed: {}", error);
                if self.wait_reconnect(&mut commands).await {
                    self.finish_shutdown();
                    return;
                }
                continue;
            }

            self.set_state(ConnectionState::Connecting);
            if self.options.clean_start {
                // Stores are cleared before CONNECT goes out.
                self.reset_session_lost();
            }
            if let Err(error) = self.send_connect(&mut transport).await {
                transport.close().await;
                if initial {
                    self.fail_connect(error);
                    self.set_state(ConnectionState::Disconnected);
                    return;
                }
                warn!("reconnect attempt failed: {}", error);
                if self.wait_reconnect(&mut commands).await {
                    self.finish_shutdown();
                    return;
                }
                continue;
            }
            initial = false;

            match self.connected_loop(&mut transport, &mut commands).await {
                Exit::Shutdown => {
                    self.finish_shutdown();
                    return;
                }
                Exit::Fatal => {
                    transport.close().await;
                    self.set_state(ConnectionState::Disconnected);
                    self.abort_pending();
                    return;
                }
                Exit::Dropped => {
                    transport.close().await;
                    self.set_state(ConnectionState::Dropped);
                    self.prepare_reconnect();
                    if self.wait_reconnect(&mut commands).await {
                        self.finish_shutdown();
                        return;
                    }
                }
            }
        }
    }

    fn finish_shutdown(&mut self) {
        self.set_state(ConnectionState::Disconnected);
        self.abort_pending();
    }

    /// Sleeps out the reconnect delay while still serving the command
    /// channel. Returns true when shutdown was requested.
    async fn wait_reconnect(&mut self, commands: &mut mpsc::Receiver<Command>) -> bool {
        let deadline = Instant::now() + RECONNECT_DELAY;
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => return false,
                command = commands.recv() => match command {
                    None | Some(Command::Disconnect) => return true,
                    Some(command) => self.reject_offline(command),
                },
            }
        }
    }

    async fn send_connect<T: Transport>(&mut self, transport: &mut T) -> Result<(), ConnectError> {
        let mut connect = ConnectPacket::new();
        connect.keep_alive = self.options.ping_interval;
        connect.add_clean_start(self.options.clean_start);
        if self.options.session_expiry > 0 {
            connect.add_session_expiry(self.options.session_expiry);
        }
        connect.add_client_id(&self.client_id);
        if let Some(username) = self.username.as_deref() {
            connect.add_username(username);
        }
        if let Some(password) = self.password.as_deref() {
            connect.add_password(password);
        }
        let bytes = encode_to_vec(&connect)?;
        trace!("sending CONNECT, client id {:?}", self.client_id);
        transport.send(&bytes).await?;
        Ok(())
    }

    async fn connected_loop<T: Transport>(
        &mut self,
        transport: &mut T,
        commands: &mut mpsc::Receiver<Command>,
    ) -> Exit {
        let mut chunk = vec![0u8; self.options.max_buffer.max(64)];
        let period = Duration::from_secs(((self.options.ping_interval as u64) / 2).max(1));
        let mut keepalive = interval_at(Instant::now() + period, period);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                received = transport.receive(&mut chunk) => match received {
                    Ok(0) => {
                        warn!("transport closed by peer");
                        return Exit::Dropped;
                    }
                    Ok(len) => {
                        self.decoder.feed(&chunk[..len]);
                        loop {
                            match self.decoder.next_frame() {
                                Ok(Some(frame)) => {
                                    if let Some(exit) = self.handle_frame(&frame, transport).await {
                                        return exit;
                                    }
                                }
                                Ok(None) => break,
                                Err(error) => {
                                    // Packet boundaries are gone, the stream
                                    // cannot be resynchronized.
                                    error!("lost packet framing: {}", error);
                                    return Exit::Dropped;
                                }
                            }
                        }
                    }
                    Err(error) => {
                        warn!("transport failure: {}", error);
                        return Exit::Dropped;
                    }
                },
                command = commands.recv() => match command {
                    None | Some(Command::Disconnect) => {
                        self.set_state(ConnectionState::Disconnecting);
                        if let Ok(bytes) = encode_to_vec(&DisconnectPacket::new()) {
                            let _ = transport.send(&bytes).await;
                        }
                        transport.close().await;
                        return Exit::Shutdown;
                    }
                    Some(command) => {
                        if let Some(exit) = self.handle_command(command, transport).await {
                            return exit;
                        }
                    }
                },
                _ = keepalive.tick() => {
                    if self.state == ConnectionState::Connected {
                        if let Some(exit) = self.send_keepalive(transport).await {
                            return exit;
                        }
                    }
                },
            }
        }
    }

    async fn send_keepalive<T: Transport>(&mut self, transport: &mut T) -> Option<Exit> {
        trace!("sending PINGREQ");
        match encode_to_vec(&PingreqPacket::new()) {
            Ok(bytes) => {
                if let Err(error) = transport.send(&bytes).await {
                    warn!("keep-alive ping failed: {}", error);
                    return Some(Exit::Dropped);
                }
                None
            }
            Err(error) => {
                error!("could not encode PINGREQ: {}", error);
                None
            }
        }
    }

    /// Sends an already built packet, mapping a transport failure to the
    /// `Dropped` exit.
    async fn send_packet<'p, T: Transport, P: Packet<'p>>(
        &mut self,
        transport: &mut T,
        packet: &P,
    ) -> Option<Exit> {
        let bytes = match encode_to_vec(packet) {
            Ok(bytes) => bytes,
            Err(error) => {
                error!("could not encode outbound packet: {}", error);
                return None;
            }
        };
        match transport.send(&bytes).await {
            Ok(()) => None,
            Err(error) => {
                warn!("transport failure: {}", error);
                Some(Exit::Dropped)
            }
        }
    }

    async fn handle_frame<T: Transport>(
        &mut self,
        frame: &[u8],
        transport: &mut T,
    ) -> Option<Exit> {
        let packet = match decode_packet(frame) {
            Ok(packet) => packet,
            Err(error) => {
                // One malformed packet does not tear down the session.
                warn!("discarding malformed inbound packet: {}", error);
                return None;
            }
        };
        match packet {
            RxPacket::Connack(connack) => self.handle_connack(connack, transport).await,
            RxPacket::Publish(publish) => self.handle_publish_in(publish, transport).await,
            RxPacket::Puback(puback) => {
                self.handle_puback(puback);
                None
            }
            RxPacket::Pubrec(pubrec) => self.handle_pubrec(pubrec, transport).await,
            RxPacket::Pubrel(pubrel) => self.handle_pubrel(pubrel, transport).await,
            RxPacket::Pubcomp(pubcomp) => {
                self.handle_pubcomp(pubcomp);
                None
            }
            RxPacket::Suback(suback) => {
                self.handle_suback(suback);
                None
            }
            RxPacket::Unsuback(unsuback) => {
                self.handle_unsuback(unsuback);
                None
            }
            RxPacket::Pingresp(_) => {
                trace!("received PINGRESP");
                None
            }
            RxPacket::Disconnect(disconnect) => {
                warn!(
                    "server sent DISCONNECT, reason 0x{:02X}",
                    disconnect.reason_code
                );
                Some(Exit::Dropped)
            }
        }
    }

    async fn handle_connack<T: Transport>(
        &mut self,
        connack: ConnackPacket,
        transport: &mut T,
    ) -> Option<Exit> {
        if self.state != ConnectionState::Connecting {
            warn!("discarding CONNACK outside of connection setup");
            return None;
        }
        if connack.reason_code != ConnectReasonCode::Success {
            let error = ConnectError::from(connack.reason_code);
            warn!("broker refused connection: {}", error);
            self.fail_connect(error);
            return Some(Exit::Fatal);
        }

        let session_present = connack.session_present();
        if !self.persistent_session() && session_present {
            // The broker must not report a session we asked it to forget.
            self.fail_connect(ConnectError::ProtocolError);
            return Some(Exit::Fatal);
        }
        if session_present && !self.session_tracked {
            self.fail_connect(ConnectError::ProtocolError);
            return Some(Exit::Fatal);
        }
        if !session_present && self.session_tracked {
            self.fail_connect(ConnectError::ProtocolError);
            return Some(Exit::Fatal);
        }

        if session_present {
            info!(
                "session resumed, resending {} in-flight packets",
                self.flights.len()
            );
            if let Some(exit) = self.resend_inflight(transport).await {
                return Some(exit);
            }
        }

        self.topic_alias_maximum = connack.topic_alias_maximum().unwrap_or(0);
        if self.topic_alias_maximum > 0 {
            debug!("broker topic alias maximum: {}", self.topic_alias_maximum);
        }
        if self.persistent_session() {
            self.session_tracked = true;
        }
        self.set_state(ConnectionState::Connected);
        if let Some(reply) = self.pending_connect.take() {
            let _ = reply.send(Ok(session_present));
        }
        None
    }

    /// Resends everything the QoS handshakes still owe the broker:
    /// unacknowledged publishes with DUP set, and PUBRELs for handshakes
    /// stopped between PUBREC and PUBCOMP.
    async fn resend_inflight<T: Transport>(&mut self, transport: &mut T) -> Option<Exit> {
        let mut frames: Vec<Vec<u8>> = Vec::new();
        for (id, state) in self.flights.iter() {
            match state {
                FlightState::AwaitingPuback { packet } | FlightState::AwaitingPubrec { packet } => {
                    let mut dup = packet.clone();
                    if let Some(first) = dup.first_mut() {
                        *first |= DUP_FLAG;
                    }
                    frames.push(dup);
                }
                FlightState::AwaitingPubcomp => {
                    let pubrel = PubrelPacket::new_with(id.get(), PubrelReasonCode::Success);
                    match encode_to_vec(&pubrel) {
                        Ok(bytes) => frames.push(bytes),
                        Err(error) => error!("could not encode PUBREL for resend: {}", error),
                    }
                }
                FlightState::AwaitingPubrel { .. } => {
                    // The peer owes us the PUBREL; nothing to resend.
                }
            }
        }
        for frame in frames {
            if let Err(error) = transport.send(&frame).await {
                warn!("transport failure during resend: {}", error);
                return Some(Exit::Dropped);
            }
        }
        None
    }

    async fn handle_publish_in<T: Transport>(
        &mut self,
        publish: PublishPacket<'_>,
        transport: &mut T,
    ) -> Option<Exit> {
        let qos = publish.qos();
        let topic = publish.topic_name.string.to_owned();
        let payload = publish.message.map(|message| message.to_vec());

        match qos {
            QualityOfService::QoS0 => {
                self.deliver(&topic, payload.as_deref());
                None
            }
            QualityOfService::QoS1 => {
                let Some(id) = PacketIdentifier::from_u16(publish.packet_identifier) else {
                    warn!("discarding QoS 1 publish with reserved packet id 0");
                    return None;
                };
                self.deliver(&topic, payload.as_deref());
                let puback = PubackPacket::new_with(id.get(), PubackReasonCode::Success);
                self.send_packet(transport, &puback).await
            }
            QualityOfService::QoS2 => {
                let Some(id) = PacketIdentifier::from_u16(publish.packet_identifier) else {
                    warn!("discarding QoS 2 publish with reserved packet id 0");
                    return None;
                };
                if matches!(self.flights.get(id), Some(FlightState::AwaitingPubrel { .. })) {
                    // Retransmission; acknowledge again but deliver nothing.
                    debug!("duplicate QoS 2 publish for packet id {}", id);
                } else {
                    self.flights
                        .await_pubrel(id, topic, payload.unwrap_or_default());
                }
                let pubrec = PubrecPacket::new_with(id.get(), PubackReasonCode::Success);
                self.send_packet(transport, &pubrec).await
            }
            QualityOfService::INVALID => {
                warn!("discarding publish with invalid QoS bits");
                None
            }
        }
    }

    fn handle_puback(&mut self, puback: PubackPacket) {
        let Some(id) = PacketIdentifier::from_u16(puback.packet_identifier) else {
            warn!("discarding PUBACK with reserved packet id 0");
            return;
        };
        if !matches!(self.flights.get(id), Some(FlightState::AwaitingPuback { .. })) {
            warn!("discarding PUBACK with unknown packet id {}", id);
            return;
        }
        self.flights.remove(id);
        match self.completions.remove(id) {
            Some(Completion::Publish(reply)) => {
                let result = if puback.reason_code == PubackReasonCode::Success {
                    Ok(())
                } else {
                    Err(PublishError::from_puback_reason(puback.reason_code))
                };
                let _ = reply.send(result);
            }
            Some(other) => {
                warn!("packet id {} bound to a non-publish operation", id);
                other.abort();
            }
            None => warn!("no pending operation for PUBACK packet id {}", id),
        }
    }

    async fn handle_pubrec<T: Transport>(
        &mut self,
        pubrec: PubrecPacket,
        transport: &mut T,
    ) -> Option<Exit> {
        let Some(id) = PacketIdentifier::from_u16(pubrec.packet_identifier) else {
            warn!("discarding PUBREC with reserved packet id 0");
            return None;
        };
        if !matches!(self.flights.get(id), Some(FlightState::AwaitingPubrec { .. })) {
            warn!("discarding PUBREC with unknown packet id {}", id);
            return None;
        }
        self.flights.remove(id);

        if pubrec.reason_code.is_error() {
            match self.completions.remove(id) {
                Some(Completion::Publish(reply)) => {
                    let _ = reply.send(Err(PublishError::from_puback_reason(pubrec.reason_code)));
                }
                Some(other) => {
                    warn!("packet id {} bound to a non-publish operation", id);
                    other.abort();
                }
                None => warn!("no pending operation for PUBREC packet id {}", id),
            }
            return None;
        }

        self.flights.await_pubcomp(id);
        let pubrel = PubrelPacket::new_with(id.get(), PubrelReasonCode::Success);
        self.send_packet(transport, &pubrel).await
    }

    async fn handle_pubrel<T: Transport>(
        &mut self,
        pubrel: PubrelPacket,
        transport: &mut T,
    ) -> Option<Exit> {
        let Some(id) = PacketIdentifier::from_u16(pubrel.packet_identifier) else {
            warn!("discarding PUBREL with reserved packet id 0");
            return None;
        };
        if matches!(self.flights.get(id), Some(FlightState::AwaitingPubrel { .. })) {
            if let Some(FlightState::AwaitingPubrel { topic, payload }) = self.flights.remove(id) {
                self.deliver(&topic, Some(payload.as_slice()));
                let pubcomp = PubcompPacket::new_with(id.get(), PubrelReasonCode::Success);
                return self.send_packet(transport, &pubcomp).await;
            }
            None
        } else {
            debug!("PUBREL for unknown packet id {}", id);
            let pubcomp =
                PubcompPacket::new_with(id.get(), PubrelReasonCode::PacketIdentifierNotFound);
            self.send_packet(transport, &pubcomp).await
        }
    }

    fn handle_pubcomp(&mut self, pubcomp: PubcompPacket) {
        let Some(id) = PacketIdentifier::from_u16(pubcomp.packet_identifier) else {
            warn!("discarding PUBCOMP with reserved packet id 0");
            return;
        };
        if !matches!(self.flights.get(id), Some(FlightState::AwaitingPubcomp)) {
            warn!("discarding PUBCOMP with unknown packet id {}", id);
            return;
        }
        self.flights.remove(id);
        match self.completions.remove(id) {
            Some(Completion::Publish(reply)) => {
                let result = if pubcomp.reason_code == PubrelReasonCode::Success {
                    Ok(())
                } else {
                    Err(PublishError::PacketIdNotFound)
                };
                let _ = reply.send(result);
            }
            Some(other) => {
                warn!("packet id {} bound to a non-publish operation", id);
                other.abort();
            }
            None => warn!("no pending operation for PUBCOMP packet id {}", id),
        }
    }

    fn handle_suback(&mut self, suback: SubackPacket) {
        let Some(id) = PacketIdentifier::from_u16(suback.packet_identifier) else {
            warn!("discarding SUBACK with reserved packet id 0");
            return;
        };
        let Some(completion) = self.completions.remove(id) else {
            warn!("discarding SUBACK with unknown packet id {}", id);
            return;
        };
        let reply = match completion {
            Completion::Subscribe(reply) => reply,
            other => {
                warn!("packet id {} bound to a non-subscribe operation", id);
                other.abort();
                return;
            }
        };
        let Some(reason_code) = suback.reason_codes.first().copied() else {
            warn!("SUBACK without reason codes for packet id {}", id);
            let _ = reply.send(Err(SubscribeError::Unspecified));
            return;
        };
        let result = match reason_code {
            SubackReasonCode::GrantedQoS0 => Ok(QualityOfService::QoS0),
            SubackReasonCode::GrantedQoS1 => Ok(QualityOfService::QoS1),
            SubackReasonCode::GrantedQoS2 => Ok(QualityOfService::QoS2),
            error => Err(SubscribeError::from_reason(error)),
        };
        let _ = reply.send(result);
    }

    fn handle_unsuback(&mut self, unsuback: UnsubackPacket) {
        let Some(id) = PacketIdentifier::from_u16(unsuback.packet_identifier) else {
            warn!("discarding UNSUBACK with reserved packet id 0");
            return;
        };
        let Some(completion) = self.completions.remove(id) else {
            warn!("discarding UNSUBACK with unknown packet id {}", id);
            return;
        };
        let reply = match completion {
            Completion::Unsubscribe(reply) => reply,
            other => {
                warn!("packet id {} bound to a non-unsubscribe operation", id);
                other.abort();
                return;
            }
        };
        let Some(reason_code) = unsuback.reason_codes.first().copied() else {
            warn!("UNSUBACK without reason codes for packet id {}", id);
            let _ = reply.send(Err(UnsubscribeError::Unspecified));
            return;
        };
        let result = match reason_code {
            UnsubackReasonCode::Success => Ok(()),
            error => Err(UnsubscribeError::from_reason(error)),
        };
        let _ = reply.send(result);
    }

    async fn handle_command<T: Transport>(
        &mut self,
        command: Command,
        transport: &mut T,
    ) -> Option<Exit> {
        if self.state != ConnectionState::Connected {
            self.reject_offline(command);
            return None;
        }
        match command {
            Command::Publish {
                topic,
                qos,
                payload,
                reply,
            } => self.handle_publish_cmd(topic, qos, payload, reply, transport).await,
            Command::Subscribe {
                filter,
                options,
                reply,
            } => self.handle_subscribe_cmd(filter, options, reply, transport).await,
            Command::Unsubscribe { filter, reply } => {
                self.handle_unsubscribe_cmd(filter, reply, transport).await
            }
            Command::Disconnect => Some(Exit::Shutdown),
        }
    }

    async fn handle_publish_cmd<T: Transport>(
        &mut self,
        topic: String,
        qos: QualityOfService,
        payload: Option<Vec<u8>>,
        reply: oneshot::Sender<Result<(), PublishError>>,
        transport: &mut T,
    ) -> Option<Exit> {
        if qos == QualityOfService::QoS0 {
            let mut publish = PublishPacket::new();
            publish.add_topic_name(&topic);
            if let Some(payload) = payload.as_deref() {
                publish.add_message(payload);
            }
            let bytes = match encode_to_vec(&publish) {
                Ok(bytes) => bytes,
                Err(error) => {
                    let _ = reply.send(Err(PublishError::Codec(error)));
                    return None;
                }
            };
            return match transport.send(&bytes).await {
                Ok(()) => {
                    let _ = reply.send(Ok(()));
                    None
                }
                Err(error) => {
                    let _ = reply.send(Err(PublishError::Transport(error)));
                    Some(Exit::Dropped)
                }
            };
        }

        let Some(id) = self.allocate_pid() else {
            let _ = reply.send(Err(PublishError::PacketIdInUse));
            return None;
        };
        let mut publish = PublishPacket::new();
        publish.add_topic_name(&topic);
        publish.add_qos(qos);
        publish.add_identifier(id.get());
        if let Some(payload) = payload.as_deref() {
            publish.add_message(payload);
        }
        let bytes = match encode_to_vec(&publish) {
            Ok(bytes) => bytes,
            Err(error) => {
                let _ = reply.send(Err(PublishError::Codec(error)));
                return None;
            }
        };

        // The record exists before any byte reaches the transport, so a
        // drop mid-send still resends after a session resume.
        if qos == QualityOfService::QoS1 {
            self.flights.await_puback(id, bytes.clone());
        } else {
            self.flights.await_pubrec(id, bytes.clone());
        }
        self.completions.insert(id, Completion::Publish(reply));

        match transport.send(&bytes).await {
            Ok(()) => None,
            Err(error) => {
                warn!("transport failure: {}", error);
                Some(Exit::Dropped)
            }
        }
    }

    async fn handle_subscribe_cmd<T: Transport>(
        &mut self,
        filter: String,
        options: SubscriptionOptions,
        reply: oneshot::Sender<Result<QualityOfService, SubscribeError>>,
        transport: &mut T,
    ) -> Option<Exit> {
        let Some(id) = self.allocate_pid() else {
            let _ = reply.send(Err(SubscribeError::PacketIdInUse));
            return None;
        };
        let mut subscribe = SubscriptionPacket::new();
        subscribe.add_identifier(id.get());
        if let Err(error) = subscribe.add_topic_filter(&filter, options.to_option_bits()) {
            let _ = reply.send(Err(SubscribeError::Codec(error)));
            return None;
        }
        let bytes = match encode_to_vec(&subscribe) {
            Ok(bytes) => bytes,
            Err(error) => {
                let _ = reply.send(Err(SubscribeError::Codec(error)));
                return None;
            }
        };
        self.completions.insert(id, Completion::Subscribe(reply));
        match transport.send(&bytes).await {
            Ok(()) => None,
            Err(error) => {
                warn!("transport failure: {}", error);
                Some(Exit::Dropped)
            }
        }
    }

    async fn handle_unsubscribe_cmd<T: Transport>(
        &mut self,
        filter: String,
        reply: oneshot::Sender<Result<(), UnsubscribeError>>,
        transport: &mut T,
    ) -> Option<Exit> {
        let Some(id) = self.allocate_pid() else {
            let _ = reply.send(Err(UnsubscribeError::PacketIdInUse));
            return None;
        };
        let mut unsubscribe = UnsubscriptionPacket::new();
        unsubscribe.add_identifier(id.get());
        if let Err(error) = unsubscribe.add_topic_filter(&filter) {
            let _ = reply.send(Err(UnsubscribeError::Codec(error)));
            return None;
        }
        let bytes = match encode_to_vec(&unsubscribe) {
            Ok(bytes) => bytes,
            Err(error) => {
                let _ = reply.send(Err(UnsubscribeError::Codec(error)));
                return None;
            }
        };
        self.completions.insert(id, Completion::Unsubscribe(reply));
        match transport.send(&bytes).await {
            Ok(()) => None,
            Err(error) => {
                warn!("transport failure: {}", error);
                Some(Exit::Dropped)
            }
        }
    }
}
