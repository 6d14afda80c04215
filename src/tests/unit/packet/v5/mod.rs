mod connack_packet_unit;
mod connect_packet_unit;
mod control_packet_unit;
mod decoder_unit;
mod puback_packet_unit;
mod publish_packet_unit;
mod suback_packet_unit;

use crate::packet::v5::mqtt_packet::{encode_to_vec, Packet};
use crate::utils::buffer_reader::BuffReader;

/// Encodes a packet and decodes the bytes back into a fresh instance.
pub(crate) fn round_trip<'a, P: Packet<'a>>(packet: &P, buffer: &'a mut Vec<u8>) -> P {
    *buffer = encode_to_vec(packet).unwrap();
    let bytes: &'a [u8] = buffer;
    let mut decoded = P::new();
    let mut reader = BuffReader::new(bytes, bytes.len());
    decoded.decode(&mut reader).unwrap();
    decoded
}
