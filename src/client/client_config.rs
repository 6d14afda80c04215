//! Typed client configuration.

#[cfg(feature = "tls")]
use std::sync::Arc;

use crate::packet::v5::publish_packet::QualityOfService;

/// How the broker should handle retained messages on a new subscription,
/// bits 5-4 of the subscription options byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetainHandling {
    #[default]
    AlwaysSend = 0,
    SendIfNotSubscribedBefore = 1,
    NeverSend = 2,
}

/// Options for one subscription, encoded into the SUBSCRIBE options byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriptionOptions {
    pub qos: QualityOfService,
    pub no_local: bool,
    pub retain_as_published: bool,
    pub retain_handling: RetainHandling,
}

impl SubscriptionOptions {
    pub fn new(qos: QualityOfService) -> Self {
        Self {
            qos,
            ..Self::default()
        }
    }

    pub fn qos(mut self, qos: QualityOfService) -> Self {
        self.qos = qos;
        self
    }

    pub fn no_local(mut self, no_local: bool) -> Self {
        self.no_local = no_local;
        self
    }

    pub fn retain_as_published(mut self, retain_as_published: bool) -> Self {
        self.retain_as_published = retain_as_published;
        self
    }

    pub fn retain_handling(mut self, retain_handling: RetainHandling) -> Self {
        self.retain_handling = retain_handling;
        self
    }

    /// QoS (bits 1-0) | No Local (bit 2) | Retain As Published (bit 3) |
    /// Retain Handling (bits 5-4).
    pub(crate) fn to_option_bits(self) -> u8 {
        let mut bits = self.qos.into_subscribe_bits();
        if self.no_local {
            bits |= 0x04;
        }
        if self.retain_as_published {
            bits |= 0x08;
        }
        bits | ((self.retain_handling as u8) << 4)
    }
}

/// Client configuration. Built with defaults and adjusted through the
/// builder methods.
#[derive(Clone)]
pub struct ClientOptions {
    /// Client identifier template. Every `%` is replaced with two uppercase
    /// hex digits of a random byte when the client is constructed.
    pub(crate) client_id: String,
    /// Seconds between keep-alive evaluations; PINGREQ goes out every half
    /// interval. Also sent to the broker as the CONNECT keep alive.
    pub(crate) ping_interval: u16,
    /// Size of the inbound read chunk handed to the transport.
    pub(crate) max_buffer: usize,
    /// Connect over TLS. Requires the `tls` feature and a
    /// [`tls_config`](Self::tls_config).
    pub(crate) secure_connection: bool,
    /// Ask the broker to discard any previous session.
    pub(crate) clean_start: bool,
    /// Session expiry interval in seconds; zero means the session ends with
    /// the connection.
    pub(crate) session_expiry: u32,
    #[cfg(feature = "tls")]
    pub(crate) tls_config: Option<Arc<tokio_rustls::rustls::ClientConfig>>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            client_id: String::from("mqtt5-%%%%%%%%"),
            ping_interval: 20,
            max_buffer: 4096,
            secure_connection: false,
            clean_start: false,
            session_expiry: 0,
            #[cfg(feature = "tls")]
            tls_config: None,
        }
    }
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn ping_interval(mut self, seconds: u16) -> Self {
        self.ping_interval = seconds;
        self
    }

    pub fn max_buffer(mut self, bytes: usize) -> Self {
        self.max_buffer = bytes;
        self
    }

    pub fn secure_connection(mut self, secure: bool) -> Self {
        self.secure_connection = secure;
        self
    }

    pub fn clean_start(mut self, clean_start: bool) -> Self {
        self.clean_start = clean_start;
        self
    }

    pub fn session_expiry(mut self, seconds: u32) -> Self {
        self.session_expiry = seconds;
        self
    }

    /// TLS configuration used when [`secure_connection`](Self::secure_connection)
    /// is set. Root certificates and verification policy stay with the
    /// caller.
    #[cfg(feature = "tls")]
    pub fn tls_config(mut self, config: Arc<tokio_rustls::rustls::ClientConfig>) -> Self {
        self.tls_config = Some(config);
        self
    }
}

/// Replaces every `%` in the client id template with two uppercase hex
/// digits of a random byte.
pub(crate) fn expand_client_id(template: &str) -> String {
    let mut expanded = String::with_capacity(template.len() + template.len());
    for character in template.chars() {
        if character == '%' {
            let byte: u8 = rand::random();
            expanded.push_str(&format!("{:02X}", byte));
        } else {
            expanded.push(character);
        }
    }
    expanded
}
