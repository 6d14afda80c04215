//! Shared test harness: an in-memory duplex transport and raw broker-side
//! packet plumbing built on the crate's own codec.

#![allow(dead_code)]


use std::io;
use std::sync::Once;

use bytes::Bytes;
use tokio::io::{duplex, AsyncReadExt, AsyncWriteExt, DuplexStream};
use tokio::sync::mpsc;

use mqtt5_client::packet::v5::connack_packet::ConnackPacket;
use mqtt5_client::packet::v5::decoder::PacketDecoder;
use mqtt5_client::packet::v5::mqtt_packet::{encode_to_vec, Packet};
use mqtt5_client::packet::v5::reason_codes::ConnectReasonCode;
use mqtt5_client::{Transport, TransportError};

static INIT: Once = Once::new();

pub fn setup() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// In-memory transport. Every `connect()` creates a fresh duplex pipe and
/// hands the broker side to the acceptor channel, which makes reconnect
/// flows observable from tests.
pub struct MemoryTransport {
    accept_tx: mpsc::UnboundedSender<DuplexStream>,
    stream: Option<DuplexStream>,
}

pub fn transport_pair() -> (MemoryTransport, mpsc::UnboundedReceiver<DuplexStream>) {
    let (accept_tx, accept_rx) = mpsc::unbounded_channel();
    (
        MemoryTransport {
            accept_tx,
            stream: None,
        },
        accept_rx,
    )
}

impl Transport for MemoryTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        let (client_end, broker_end) = duplex(16 * 1024);
        self.accept_tx.send(broker_end).map_err(|_| {
            TransportError::Connect(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "broker gone",
            ))
        })?;
        self.stream = Some(client_end);
        Ok(())
    }

    async fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        stream.write_all(buf).await?;
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::NotConnected)?;
        Ok(stream.read(buf).await?)
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
    }
}

/// Broker-side view of one accepted connection.
pub struct BrokerConn {
    stream: DuplexStream,
    decoder: PacketDecoder,
}

impl BrokerConn {
    pub fn new(stream: DuplexStream) -> Self {
        Self {
            stream,
            decoder: PacketDecoder::new(),
        }
    }

    /// Next complete frame, or `None` once the client hung up.
    pub async fn next_frame(&mut self) -> Option<Bytes> {
        loop {
            if let Some(frame) = self.decoder.next_frame().expect("client sent garbage") {
                return Some(frame);
            }
            let mut chunk = [0u8; 1024];
            match self.stream.read(&mut chunk).await {
                Ok(0) | Err(_) => return None,
                Ok(len) => self.decoder.feed(&chunk[..len]),
            }
        }
    }

    pub async fn send_packet<'a, P: Packet<'a>>(&mut self, packet: &P) {
        let bytes = encode_to_vec(packet).expect("encodable test packet");
        self.stream
            .write_all(&bytes)
            .await
            .expect("client reachable");
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) {
        self.stream
            .write_all(bytes)
            .await
            .expect("client reachable");
    }
}

pub fn connack(session_present: bool, reason_code: ConnectReasonCode) -> ConnackPacket {
    let mut connack = ConnackPacket::new();
    connack.set_session_present(session_present);
    connack.reason_code = reason_code;
    connack
}
