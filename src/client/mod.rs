//! Public client surface.
//!
//! [`MqttClient`] is a thin handle: `connect()` spawns the session task and
//! every operation posts a command onto it, completing when the matching
//! acknowledgement (or failure) comes back.

pub mod client_config;
pub mod err;

use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, oneshot};

use crate::client::client_config::{expand_client_id, ClientOptions, SubscriptionOptions};
use crate::client::err::{ConnectError, PublishError, SubscribeError, UnsubscribeError};
use crate::network::{NetTransport, TcpTransport, Transport, TransportError};
#[cfg(feature = "tls")]
use crate::network::TlsTransport;
use crate::packet::v5::publish_packet::QualityOfService;
use crate::session::{Callbacks, Command, ConnectionState, Session};
use crate::utils::types::CodecError;

const COMMAND_QUEUE_DEPTH: usize = 32;

fn build_net_transport(
    host: &str,
    port: u16,
    options: &ClientOptions,
) -> Result<NetTransport, ConnectError> {
    if options.secure_connection {
        #[cfg(feature = "tls")]
        {
            let config = options
                .tls_config
                .clone()
                .ok_or(ConnectError::Transport(TransportError::TlsUnavailable))?;
            return Ok(NetTransport::Tls(TlsTransport::new(host, port, config)));
        }
        #[cfg(not(feature = "tls"))]
        {
            return Err(ConnectError::Transport(TransportError::TlsUnavailable));
        }
    }
    Ok(NetTransport::Tcp(TcpTransport::new(host, port)))
}

/// Asynchronous MQTT v5 client.
///
/// Constructed with broker coordinates and [`ClientOptions`]; generic over
/// the [`Transport`] for callers that bring their own byte channel.
/// Dropping the client disconnects implicitly.
pub struct MqttClient<T: Transport = NetTransport> {
    options: ClientOptions,
    client_id: String,
    username: Option<String>,
    password: Option<Vec<u8>>,
    transport: Option<T>,
    rebuild: Option<Box<dyn Fn() -> Result<T, ConnectError> + Send>>,
    callbacks: Arc<Mutex<Callbacks>>,
    commands: Option<mpsc::Sender<Command>>,
}

impl MqttClient<NetTransport> {
    /// Client for an anonymous connection to `host:port`.
    pub fn new(host: impl Into<String>, port: u16, options: ClientOptions) -> Self {
        Self::build(host.into(), port, None, None, options)
    }

    /// Client authenticating with a user name and password.
    pub fn new_with_credentials(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl AsRef<[u8]>,
        options: ClientOptions,
    ) -> Self {
        Self::build(
            host.into(),
            port,
            Some(username.into()),
            Some(password.as_ref().to_vec()),
            options,
        )
    }

    fn build(
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<Vec<u8>>,
        options: ClientOptions,
    ) -> Self {
        let client_id = expand_client_id(&options.client_id);
        let rebuild_options = options.clone();
        let rebuild: Box<dyn Fn() -> Result<NetTransport, ConnectError> + Send> =
            Box::new(move || build_net_transport(&host, port, &rebuild_options));
        Self {
            options,
            client_id,
            username,
            password,
            transport: None,
            rebuild: Some(rebuild),
            callbacks: Arc::new(Mutex::new(Callbacks {
                on_receive: None,
                on_state: None,
            })),
            commands: None,
        }
    }
}

impl<T: Transport + 'static> MqttClient<T> {
    /// Client over a caller-supplied transport.
    pub fn with_transport(transport: T, options: ClientOptions) -> Self {
        let client_id = expand_client_id(&options.client_id);
        Self {
            options,
            client_id,
            username: None,
            password: None,
            transport: Some(transport),
            rebuild: None,
            callbacks: Arc::new(Mutex::new(Callbacks {
                on_receive: None,
                on_state: None,
            })),
            commands: None,
        }
    }

    /// Registers the handler invoked for every delivered application
    /// message. An empty payload arrives as `None`.
    pub fn on_receive(&self, handler: impl FnMut(&str, Option<&[u8]>) + Send + 'static) {
        if let Ok(mut callbacks) = self.callbacks.lock() {
            callbacks.on_receive = Some(Box::new(handler));
        }
    }

    /// Registers the handler invoked on every connection state change.
    pub fn on_connection_state(&self, handler: impl FnMut(ConnectionState) + Send + 'static) {
        if let Ok(mut callbacks) = self.callbacks.lock() {
            callbacks.on_state = Some(Box::new(handler));
        }
    }

    /// Connects to the broker, resolving once CONNACK arrives. Returns the
    /// broker's session-present flag.
    ///
    /// The session task keeps running after this resolves, reconnecting on
    /// its own after unexpected transport drops, until [`disconnect`](Self::disconnect)
    /// is called or the client is dropped.
    pub async fn connect(&mut self) -> Result<bool, ConnectError> {
        if let Some(commands) = &self.commands {
            if !commands.is_closed() {
                return Err(ConnectError::Closed);
            }
        }
        let transport = match self.transport.take() {
            Some(transport) => transport,
            None => match &self.rebuild {
                Some(rebuild) => rebuild()?,
                None => return Err(ConnectError::Closed),
            },
        };

        let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let (connect_tx, connect_rx) = oneshot::channel();
        let session = Session::new(
            self.options.clone(),
            self.client_id.clone(),
            self.username.clone(),
            self.password.clone(),
            self.callbacks.clone(),
            connect_tx,
        );
        tokio::spawn(session.run(transport, command_rx));
        self.commands = Some(command_tx);

        let result = match connect_rx.await {
            Ok(result) => result,
            Err(_) => Err(ConnectError::Closed),
        };
        if result.is_err() {
            self.commands = None;
        }
        result
    }

    /// Subscribes with a single topic filter, resolving with the granted
    /// QoS from SUBACK.
    pub async fn subscribe(
        &self,
        filter: impl Into<String>,
        options: SubscriptionOptions,
    ) -> Result<QualityOfService, SubscribeError> {
        let commands = self.commands.as_ref().ok_or(SubscribeError::Closed)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        commands
            .send(Command::Subscribe {
                filter: filter.into(),
                options,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SubscribeError::Closed)?;
        reply_rx.await.map_err(|_| SubscribeError::Closed)?
    }

    /// Removes a single topic filter subscription.
    pub async fn unsubscribe(&self, filter: impl Into<String>) -> Result<(), UnsubscribeError> {
        let commands = self.commands.as_ref().ok_or(UnsubscribeError::Closed)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        commands
            .send(Command::Unsubscribe {
                filter: filter.into(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| UnsubscribeError::Closed)?;
        reply_rx.await.map_err(|_| UnsubscribeError::Closed)?
    }

    /// Publishes a message. QoS 0 resolves once the bytes are handed to
    /// the transport, QoS 1 on PUBACK and QoS 2 on PUBCOMP.
    pub async fn publish(
        &self,
        topic: impl Into<String>,
        qos: QualityOfService,
        payload: Option<&[u8]>,
    ) -> Result<(), PublishError> {
        if qos == QualityOfService::INVALID {
            return Err(PublishError::Codec(CodecError::MalformedPacket));
        }
        let commands = self.commands.as_ref().ok_or(PublishError::Closed)?;
        let (reply_tx, reply_rx) = oneshot::channel();
        commands
            .send(Command::Publish {
                topic: topic.into(),
                qos,
                payload: payload.map(|payload| payload.to_vec()),
                reply: reply_tx,
            })
            .await
            .map_err(|_| PublishError::Closed)?;
        reply_rx.await.map_err(|_| PublishError::Closed)?
    }

    /// Fire-and-forget orderly shutdown: DISCONNECT is sent, the transport
    /// stopped and every pending operation cancelled with `Closed`.
    pub fn disconnect(&self) {
        if let Some(commands) = &self.commands {
            let _ = commands.try_send(Command::Disconnect);
        }
    }
}

impl<T: Transport> Drop for MqttClient<T> {
    fn drop(&mut self) {
        if let Some(commands) = &self.commands {
            let _ = commands.try_send(Command::Disconnect);
        }
    }
}
