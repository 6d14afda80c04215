use log::warn;

use crate::packet::v5::connack_packet::ConnackPacket;
use crate::packet::v5::disconnect_packet::DisconnectPacket;
use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::pingresp_packet::PingrespPacket;
use crate::packet::v5::puback_packet::{PubackPacket, PubcompPacket, PubrecPacket, PubrelPacket};
use crate::packet::v5::publish_packet::PublishPacket;
use crate::packet::v5::suback_packet::SubackPacket;
use crate::packet::v5::unsuback_packet::UnsubackPacket;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::types::CodecError;

/// A decoded packet arriving from the broker, borrowing string and payload
/// data from the frame it was parsed out of.
pub enum RxPacket<'a> {
    Connack(ConnackPacket),
    Publish(PublishPacket<'a>),
    Puback(PubackPacket),
    Pubrec(PubrecPacket),
    Pubrel(PubrelPacket),
    Pubcomp(PubcompPacket),
    Suback(SubackPacket),
    Unsuback(UnsubackPacket),
    Pingresp(PingrespPacket),
    Disconnect(DisconnectPacket),
}

fn decode_body<'a, P: Packet<'a>>(frame: &'a [u8]) -> Result<P, CodecError> {
    let mut packet = P::new();
    let mut buff_reader = BuffReader::new(frame, frame.len());
    packet.decode(&mut buff_reader)?;
    Ok(packet)
}

/// Parses exactly one complete frame, as produced by
/// [`decoder::PacketDecoder`](super::decoder::PacketDecoder), into its typed
/// form. Packet kinds a broker never sends to a client are rejected.
pub fn decode_packet(frame: &[u8]) -> Result<RxPacket<'_>, CodecError> {
    let first_byte = *frame.first().ok_or(CodecError::PrematureEndOfData)?;
    match PacketType::from(first_byte) {
        PacketType::Connack => Ok(RxPacket::Connack(decode_body(frame)?)),
        PacketType::Publish => Ok(RxPacket::Publish(decode_body(frame)?)),
        PacketType::Puback => Ok(RxPacket::Puback(decode_body(frame)?)),
        PacketType::Pubrec => Ok(RxPacket::Pubrec(decode_body(frame)?)),
        PacketType::Pubrel => Ok(RxPacket::Pubrel(decode_body(frame)?)),
        PacketType::Pubcomp => Ok(RxPacket::Pubcomp(decode_body(frame)?)),
        PacketType::Suback => Ok(RxPacket::Suback(decode_body(frame)?)),
        PacketType::Unsuback => Ok(RxPacket::Unsuback(decode_body(frame)?)),
        PacketType::Pingresp => Ok(RxPacket::Pingresp(decode_body(frame)?)),
        PacketType::Disconnect => Ok(RxPacket::Disconnect(decode_body(frame)?)),
        other => {
            warn!("received client-to-server packet type {:?}", other);
            Err(CodecError::MalformedPacket)
        }
    }
}
