//! MQTT v5 control packet model and codec.
//!
//! Each packet kind maps to its own struct implementing [`mqtt_packet::Packet`].
//! [`decoder::PacketDecoder`] separates packets from the inbound byte stream
//! and [`rx::decode_packet`] turns a single frame into a typed packet.

pub mod connack_packet;
pub mod connect_packet;
pub mod decoder;
pub mod disconnect_packet;
pub mod mqtt_packet;
pub mod packet_type;
pub mod pingreq_packet;
pub mod pingresp_packet;
pub mod property;
pub mod puback_packet;
pub mod publish_packet;
pub mod reason_codes;
pub mod rx;
pub mod suback_packet;
pub mod subscription_packet;
pub mod unsuback_packet;
pub mod unsubscription_packet;

/// Upper bound for the property list a single packet may carry.
pub const MAX_PROPERTIES: usize = 4;

/// Upper bound for topic filters in one SUBSCRIBE/UNSUBSCRIBE. The codec
/// accepts up to this many; the session engine issues single-filter
/// operations only.
pub const MAX_TOPIC_FILTERS: usize = 4;
