use std::sync::Arc;

use log::trace;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::ClientConfig;
use tokio_rustls::TlsConnector;

use crate::network::{Transport, TransportError};

/// TLS transport over tokio-rustls.
///
/// Certificate policy stays with the caller: the `ClientConfig` (roots,
/// client auth, ALPN) is supplied, the transport only performs the
/// handshake against it.
pub struct TlsTransport {
    host: String,
    port: u16,
    config: Arc<ClientConfig>,
    stream: Option<TlsStream<TcpStream>>,
}

impl TlsTransport {
    pub fn new(host: impl Into<String>, port: u16, config: Arc<ClientConfig>) -> Self {
        Self {
            host: host.into(),
            port,
            config,
            stream: None,
        }
    }
}

impl Transport for TlsTransport {
    async fn connect(&mut self) -> Result<(), TransportError> {
        trace!("dialing {}:{} with tls", self.host, self.port);
        let server_name = ServerName::try_from(self.host.clone())
            .map_err(|_| TransportError::InvalidServerName)?;
        let tcp = TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(TransportError::Connect)?;
        let _ = tcp.set_nodelay(true);
        let connector = TlsConnector::from(self.config.clone());
        let stream = connector
            .connect(server_name, tcp)
            .await
            .map_err(TransportError::Connect)?;
        self.stream = Some(stream);
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
