//! Per-operation error enums mirroring the MQTT v5 reason codes, plus the
//! client-side failure modes every operation shares.

use thiserror::Error;

use crate::network::TransportError;
use crate::packet::v5::reason_codes::{
    ConnectReasonCode, PubackReasonCode, SubackReasonCode, UnsubackReasonCode,
};
use crate::utils::types::CodecError;

/// Failure of a `connect()` invocation. The reason-code variants mirror
/// CONNACK codes 0x80 and above.
#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("connection refused: unspecified error")]
    Unspecified,
    #[error("connection refused: malformed packet")]
    MalformedPacket,
    #[error("protocol error")]
    ProtocolError,
    #[error("connection refused: implementation specific error")]
    ImplementationError,
    #[error("connection refused: unsupported protocol version")]
    UnsupportedVersion,
    #[error("connection refused: client identifier not valid")]
    InvalidClientId,
    #[error("connection refused: bad user name or password")]
    InvalidCredentials,
    #[error("connection refused: not authorized")]
    Unauthorized,
    #[error("connection refused: server unavailable")]
    Unavailable,
    #[error("connection refused: server busy")]
    Busy,
    #[error("connection refused: banned")]
    Banned,
    #[error("connection refused: bad authentication method")]
    BadAuthMethod,
    #[error("connection refused: topic name invalid")]
    TopicNameInvalid,
    #[error("connection refused: packet too large")]
    PacketTooLarge,
    #[error("connection refused: quota exceeded")]
    QuotaExceeded,
    #[error("connection refused: payload format invalid")]
    PayloadFormatInvalid,
    #[error("connection refused: retain not supported")]
    RetainNotSupported,
    #[error("connection refused: qos not supported")]
    QoSNotSupported,
    #[error("connection refused: use another server")]
    UseAnotherServer,
    #[error("connection refused: server moved")]
    ServerMoved,
    #[error("connection refused: connection rate exceeded")]
    RateLimitExceeded,
    /// The client was closed, or a session is already running.
    #[error("client closed")]
    Closed,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl From<ConnectReasonCode> for ConnectError {
    fn from(reason_code: ConnectReasonCode) -> Self {
        match reason_code {
            ConnectReasonCode::Success | ConnectReasonCode::UnspecifiedError => Self::Unspecified,
            ConnectReasonCode::MalformedPacket => Self::MalformedPacket,
            ConnectReasonCode::ProtocolError => Self::ProtocolError,
            ConnectReasonCode::ImplementationSpecificError => Self::ImplementationError,
            ConnectReasonCode::UnsupportedProtocolVersion => Self::UnsupportedVersion,
            ConnectReasonCode::ClientIdentifierNotValid => Self::InvalidClientId,
            ConnectReasonCode::BadUserNameOrPassword => Self::InvalidCredentials,
            ConnectReasonCode::NotAuthorized => Self::Unauthorized,
            ConnectReasonCode::ServerUnavailable => Self::Unavailable,
            ConnectReasonCode::ServerBusy => Self::Busy,
            ConnectReasonCode::Banned => Self::Banned,
            ConnectReasonCode::BadAuthenticationMethod => Self::BadAuthMethod,
            ConnectReasonCode::TopicNameInvalid => Self::TopicNameInvalid,
            ConnectReasonCode::PacketTooLarge => Self::PacketTooLarge,
            ConnectReasonCode::QuotaExceeded => Self::QuotaExceeded,
            ConnectReasonCode::PayloadFormatInvalid => Self::PayloadFormatInvalid,
            ConnectReasonCode::RetainNotSupported => Self::RetainNotSupported,
            ConnectReasonCode::QosNotSupported => Self::QoSNotSupported,
            ConnectReasonCode::UseAnotherServer => Self::UseAnotherServer,
            ConnectReasonCode::ServerMoved => Self::ServerMoved,
            ConnectReasonCode::ConnectionRateExceeded => Self::RateLimitExceeded,
        }
    }
}

/// Failure of a `subscribe()` operation.
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("subscribe failed: unspecified error")]
    Unspecified,
    #[error("subscribe failed: implementation specific error")]
    ImplementationSpecific,
    #[error("subscribe failed: not authorized")]
    NotAuthorized,
    #[error("subscribe failed: topic filter invalid")]
    TopicFilterInvalid,
    #[error("subscribe failed: packet identifier in use")]
    PacketIdInUse,
    #[error("subscribe failed: quota exceeded")]
    QuotaExceeded,
    #[error("subscribe failed: shared subscriptions not supported")]
    SharedSubscriptionsUnsupported,
    #[error("subscribe failed: subscription identifiers not supported")]
    SubscriptionIdsUnsupported,
    #[error("subscribe failed: wildcard subscriptions not supported")]
    WildcardsUnsupported,
    #[error("client closed")]
    Closed,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl SubscribeError {
    pub(crate) fn from_reason(reason_code: SubackReasonCode) -> Self {
        match reason_code {
            SubackReasonCode::GrantedQoS0
            | SubackReasonCode::GrantedQoS1
            | SubackReasonCode::GrantedQoS2
            | SubackReasonCode::UnspecifiedError => Self::Unspecified,
            SubackReasonCode::ImplementationSpecificError => Self::ImplementationSpecific,
            SubackReasonCode::NotAuthorized => Self::NotAuthorized,
            SubackReasonCode::TopicFilterInvalid => Self::TopicFilterInvalid,
            SubackReasonCode::PacketIdentifierInUse => Self::PacketIdInUse,
            SubackReasonCode::QuotaExceeded => Self::QuotaExceeded,
            SubackReasonCode::SharedSubscriptionsNotSupported => {
                Self::SharedSubscriptionsUnsupported
            }
            SubackReasonCode::SubscriptionIdentifiersNotSupported => {
                Self::SubscriptionIdsUnsupported
            }
            SubackReasonCode::WildcardSubscriptionsNotSupported => Self::WildcardsUnsupported,
        }
    }
}

/// Failure of an `unsubscribe()` operation.
#[derive(Debug, Error)]
pub enum UnsubscribeError {
    #[error("unsubscribe failed: no subscription existed")]
    NoSubscriptionExisted,
    #[error("unsubscribe failed: unspecified error")]
    Unspecified,
    #[error("unsubscribe failed: implementation specific error")]
    ImplementationSpecific,
    #[error("unsubscribe failed: not authorized")]
    NotAuthorized,
    #[error("unsubscribe failed: topic filter invalid")]
    TopicFilterInvalid,
    #[error("unsubscribe failed: packet identifier in use")]
    PacketIdInUse,
    #[error("client closed")]
    Closed,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl UnsubscribeError {
    pub(crate) fn from_reason(reason_code: UnsubackReasonCode) -> Self {
        match reason_code {
            UnsubackReasonCode::NoSubscriptionExisted => Self::NoSubscriptionExisted,
            UnsubackReasonCode::Success | UnsubackReasonCode::UnspecifiedError => Self::Unspecified,
            UnsubackReasonCode::ImplementationSpecificError => Self::ImplementationSpecific,
            UnsubackReasonCode::NotAuthorized => Self::NotAuthorized,
            UnsubackReasonCode::TopicFilterInvalid => Self::TopicFilterInvalid,
            UnsubackReasonCode::PacketIdentifierInUse => Self::PacketIdInUse,
        }
    }
}

/// Failure of a `publish()` operation.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish delivered to no matching subscribers")]
    NoMatchingSubscribers,
    #[error("publish failed: unspecified error")]
    Unspecified,
    #[error("publish failed: implementation specific error")]
    ImplementationSpecific,
    #[error("publish failed: not authorized")]
    NotAuthorized,
    #[error("publish failed: topic name invalid")]
    TopicNameInvalid,
    #[error("publish failed: packet identifier in use")]
    PacketIdInUse,
    #[error("publish failed: packet identifier not found")]
    PacketIdNotFound,
    #[error("publish failed: quota exceeded")]
    QuotaExceeded,
    #[error("publish failed: payload format invalid")]
    PayloadFormatInvalid,
    #[error("client closed")]
    Closed,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl PublishError {
    pub(crate) fn from_puback_reason(reason_code: PubackReasonCode) -> Self {
        match reason_code {
            PubackReasonCode::NoMatchingSubscribers => Self::NoMatchingSubscribers,
            PubackReasonCode::Success | PubackReasonCode::UnspecifiedError => Self::Unspecified,
            PubackReasonCode::ImplementationSpecificError => Self::ImplementationSpecific,
            PubackReasonCode::NotAuthorized => Self::NotAuthorized,
            PubackReasonCode::TopicNameInvalid => Self::TopicNameInvalid,
            PubackReasonCode::PacketIdentifierInUse => Self::PacketIdInUse,
            PubackReasonCode::QuotaExceeded => Self::QuotaExceeded,
            PubackReasonCode::PayloadFormatInvalid => Self::PayloadFormatInvalid,
        }
    }
}
