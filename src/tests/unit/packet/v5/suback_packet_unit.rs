use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::reason_codes::{SubackReasonCode, UnsubackReasonCode};
use crate::packet::v5::suback_packet::SubackPacket;
use crate::packet::v5::unsuback_packet::UnsubackPacket;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::types::CodecError;

fn decode_suback(bytes: &[u8]) -> Result<SubackPacket, CodecError> {
    let mut packet = SubackPacket::new();
    let mut reader = BuffReader::new(bytes, bytes.len());
    packet.decode(&mut reader).map(|_| packet)
}

#[test]
fn decodes_granted_qos() {
    let suback = decode_suback(&[0x90, 0x04, 0x00, 0x0A, 0x00, 0x01]).unwrap();
    assert_eq!(suback.packet_identifier, 10);
    assert_eq!(suback.reason_codes.len(), 1);
    assert_eq!(suback.reason_codes[0], SubackReasonCode::GrantedQoS1);
}

#[test]
fn decodes_error_reason() {
    let suback = decode_suback(&[0x90, 0x04, 0x00, 0x0A, 0x00, 0x8F]).unwrap();
    assert_eq!(suback.reason_codes[0], SubackReasonCode::TopicFilterInvalid);
}

#[test]
fn rejects_properties() {
    // Reason String (0x1F) inside the property list.
    let result = decode_suback(&[0x90, 0x09, 0x00, 0x0A, 0x05, 0x1F, 0x00, 0x02, 0x68, 0x69, 0x00]);
    assert_eq!(result.err(), Some(CodecError::UnsupportedProperty(0x1F)));
}

#[test]
fn rejects_unknown_reason_code() {
    let result = decode_suback(&[0x90, 0x04, 0x00, 0x0A, 0x00, 0x55]);
    assert_eq!(result.err(), Some(CodecError::UnknownReasonCode(0x55)));
}

#[test]
fn decodes_unsuback_no_subscription_existed() {
    let mut packet = UnsubackPacket::new();
    let bytes = [0xB0, 0x04, 0x00, 0x05, 0x00, 0x11];
    let mut reader = BuffReader::new(&bytes, bytes.len());
    packet.decode(&mut reader).unwrap();
    assert_eq!(packet.packet_identifier, 5);
    assert_eq!(
        packet.reason_codes[0],
        UnsubackReasonCode::NoSubscriptionExisted
    );
}
