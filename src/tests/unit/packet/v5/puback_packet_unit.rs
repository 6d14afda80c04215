use crate::packet::v5::mqtt_packet::{encode_to_vec, Packet};
use crate::packet::v5::puback_packet::{PubackPacket, PubcompPacket, PubrecPacket, PubrelPacket};
use crate::packet::v5::reason_codes::{PubackReasonCode, PubrelReasonCode};
use crate::utils::buffer_reader::BuffReader;
use crate::utils::types::CodecError;

fn decode<P: for<'a> Packet<'a>>(bytes: &[u8]) -> Result<P, CodecError> {
    let mut packet = P::new();
    let mut reader = BuffReader::new(bytes, bytes.len());
    packet.decode(&mut reader).map(|_| packet)
}

#[test]
fn bare_puback_means_success() {
    let puback: PubackPacket = decode(&[0x40, 0x02, 0x00, 0x07]).unwrap();
    assert_eq!(puback.packet_identifier, 7);
    assert_eq!(puback.reason_code, PubackReasonCode::Success);
}

#[test]
fn puback_with_reason_code() {
    let puback: PubackPacket = decode(&[0x40, 0x03, 0x00, 0x07, 0x10]).unwrap();
    assert_eq!(puback.reason_code, PubackReasonCode::NoMatchingSubscribers);
    let puback: PubackPacket = decode(&[0x40, 0x03, 0x00, 0x07, 0x87]).unwrap();
    assert_eq!(puback.reason_code, PubackReasonCode::NotAuthorized);
}

#[test]
fn rejects_unknown_reason_code() {
    let result: Result<PubackPacket, _> = decode(&[0x40, 0x03, 0x00, 0x07, 0x55]);
    assert_eq!(result.err(), Some(CodecError::UnknownReasonCode(0x55)));
}

#[test]
fn success_puback_encodes_two_byte_body() {
    let puback = PubackPacket::new_with(7, PubackReasonCode::Success);
    assert_eq!(encode_to_vec(&puback).unwrap(), [0x40, 0x02, 0x00, 0x07]);
}

#[test]
fn error_puback_encodes_reason_byte() {
    let puback = PubackPacket::new_with(7, PubackReasonCode::QuotaExceeded);
    assert_eq!(
        encode_to_vec(&puback).unwrap(),
        [0x40, 0x03, 0x00, 0x07, 0x97]
    );
}

#[test]
fn pubrel_carries_reserved_flag_bits() {
    let pubrel = PubrelPacket::new_with(9, PubrelReasonCode::Success);
    assert_eq!(encode_to_vec(&pubrel).unwrap(), [0x62, 0x02, 0x00, 0x09]);
}

#[test]
fn pubrel_with_wrong_flags_is_malformed() {
    let result: Result<PubrelPacket, _> = decode(&[0x60, 0x02, 0x00, 0x09]);
    assert_eq!(result.err(), Some(CodecError::MalformedPacket));
}

#[test]
fn pubcomp_not_found_round_trips() {
    let pubcomp = PubcompPacket::new_with(3, PubrelReasonCode::PacketIdentifierNotFound);
    let bytes = encode_to_vec(&pubcomp).unwrap();
    assert_eq!(bytes, [0x70, 0x03, 0x00, 0x03, 0x92]);
    let decoded: PubcompPacket = decode(&bytes).unwrap();
    assert_eq!(
        decoded.reason_code,
        PubrelReasonCode::PacketIdentifierNotFound
    );
}

#[test]
fn pubrec_decodes_like_puback() {
    let pubrec: PubrecPacket = decode(&[0x50, 0x03, 0x00, 0x01, 0x97]).unwrap();
    assert_eq!(pubrec.packet_identifier, 1);
    assert_eq!(pubrec.reason_code, PubackReasonCode::QuotaExceeded);
    assert!(pubrec.reason_code.is_error());
}
