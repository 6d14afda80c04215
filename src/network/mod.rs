//! Duplex byte transports the session engine runs over.
//!
//! The engine treats the transport as opaque: it dials, hands it encoded
//! packets, and receives raw chunks back. Anything implementing
//! [`Transport`] plugs in; TCP ships by default and TLS behind the `tls`
//! feature.

pub mod tcp;
#[cfg(feature = "tls")]
pub mod tls;

use std::future::Future;

use thiserror::Error;

pub use tcp::TcpTransport;
#[cfg(feature = "tls")]
pub use tls::TlsTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Establishing the connection failed.
    #[error("connection failed: {0}")]
    Connect(#[source] std::io::Error),
    /// The established stream failed mid-flight.
    #[error("transport i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// An operation was attempted without an established stream.
    #[error("transport is not connected")]
    NotConnected,
    /// A secure connection was requested but TLS support or configuration
    /// is missing.
    #[error("secure connection requested without tls support or configuration")]
    TlsUnavailable,
    /// The host name is not usable as a TLS server name.
    #[cfg(feature = "tls")]
    #[error("invalid tls server name")]
    InvalidServerName,
}

/// Abstract duplex byte channel between the session engine and the broker.
///
/// `connect` may be called again after a failure to establish a fresh
/// stream; the reconnect loop relies on it. `receive` must be cancel-safe:
/// the session races it against its command channel and keep-alive timer,
/// and a cancelled call must not lose buffered bytes. `receive` returning
/// `Ok(0)` signals an orderly close by the peer.
pub trait Transport: Send {
    fn connect(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn send(&mut self, buf: &[u8]) -> impl Future<Output = Result<(), TransportError>> + Send;

    fn receive(
        &mut self,
        buf: &mut [u8],
    ) -> impl Future<Output = Result<usize, TransportError>> + Send;

    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

/// The transport [`MqttClient::new`](crate::client::MqttClient::new)
/// instantiates from its options: plain TCP, or TLS when
/// `secure_connection` is set and the `tls` feature is enabled.
pub enum NetTransport {
    Tcp(TcpTransport),
    #[cfg(feature = "tls")]
    Tls(TlsTransport),
}

impl Transport for NetTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        match self {
            NetTransport::Tcp(transport) => transport.connect().await,
            #[cfg(feature = "tls")]
            NetTransport::Tls(transport) => transport.connect().await,
        }
    }

    async fn send(&mut self, buf: &[u8]) -> Result<(), TransportError> {
        match self {
            NetTransport::Tcp(transport) => transport.send(buf).await,
            #[cfg(feature = "tls")]
            NetTransport::Tls(transport) => transport.send(buf).await,
        }
    }

    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize, TransportError> {
        match self {
            NetTransport::Tcp(transport) => transport.receive(buf).await,
            #[cfg(feature = "tls")]
            NetTransport::Tls(transport) => transport.receive(buf).await,
        }
    }

    async fn close(&mut self) {
        match self {
            NetTransport::Tcp(transport) => transport.close().await,
            #[cfg(feature = "tls")]
            NetTransport::Tls(transport) => transport.close().await,
        }
    }
}
