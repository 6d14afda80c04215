//! Asynchronous MQTT v5 client with full session state tracking.
//!
//! The crate splits into a bit-exact control-packet codec
//! ([`packet`], [`encoding`], [`utils`]) and a session engine
//! ([`session`]) that drives connect/reconnect, keep-alive, the QoS 1 and
//! QoS 2 acknowledgement flows and resend-after-resume semantics over a
//! pluggable byte [`transport`](network::Transport).
//!
//! ```no_run
//! use mqtt5_client::{ClientOptions, MqttClient, QualityOfService, SubscriptionOptions};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut client = MqttClient::new("broker.local", 1883, ClientOptions::new());
//!     client.on_receive(|topic, payload| {
//!         println!("{}: {:?}", topic, payload);
//!     });
//!     let session_present = client.connect().await.unwrap();
//!     assert!(!session_present);
//!     client
//!         .subscribe("sensors/#", SubscriptionOptions::new(QualityOfService::QoS1))
//!         .await
//!         .unwrap();
//!     client
//!         .publish("sensors/hall", QualityOfService::QoS1, Some(b"24.1".as_slice()))
//!         .await
//!         .unwrap();
//!     client.disconnect();
//! }
//! ```

pub mod client;
pub mod encoding;
pub mod network;
pub mod packet;
pub mod session;
pub mod utils;

#[cfg(test)]
mod tests;

pub use client::client_config::{ClientOptions, RetainHandling, SubscriptionOptions};
pub use client::err::{ConnectError, PublishError, SubscribeError, UnsubscribeError};
pub use client::MqttClient;
pub use network::{NetTransport, TcpTransport, Transport, TransportError};
#[cfg(feature = "tls")]
pub use network::TlsTransport;
pub use packet::v5::publish_packet::QualityOfService;
pub use session::ConnectionState;
pub use utils::types::CodecError;
