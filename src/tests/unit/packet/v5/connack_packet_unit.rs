use crate::packet::v5::connack_packet::ConnackPacket;
use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::reason_codes::ConnectReasonCode;
use crate::tests::unit::packet::v5::round_trip;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::types::CodecError;

fn decode(bytes: &[u8]) -> Result<ConnackPacket, CodecError> {
    let mut packet = ConnackPacket::new();
    let mut reader = BuffReader::new(bytes, bytes.len());
    packet.decode(&mut reader).map(|_| packet)
}

#[test]
fn decodes_connack_with_topic_alias_maximum() {
    let connack = decode(&[0x20, 0x06, 0x00, 0x00, 0x03, 0x22, 0x00, 0x0A]).unwrap();
    assert!(!connack.session_present());
    assert_eq!(connack.reason_code, ConnectReasonCode::Success);
    assert_eq!(connack.topic_alias_maximum(), Some(10));
}

#[test]
fn decodes_session_present_flag() {
    let connack = decode(&[0x20, 0x03, 0x01, 0x00, 0x00]).unwrap();
    assert!(connack.session_present());
    assert_eq!(connack.topic_alias_maximum(), None);
}

#[test]
fn decodes_error_reason_code() {
    let connack = decode(&[0x20, 0x03, 0x00, 0x86, 0x00]).unwrap();
    assert_eq!(connack.reason_code, ConnectReasonCode::BadUserNameOrPassword);
}

#[test]
fn rejects_unknown_reason_code() {
    assert_eq!(
        decode(&[0x20, 0x03, 0x00, 0x21, 0x00]).err(),
        Some(CodecError::UnknownReasonCode(0x21))
    );
}

#[test]
fn rejects_unsupported_property() {
    // 0x21 is Receive Maximum, outside the supported set.
    assert_eq!(
        decode(&[0x20, 0x06, 0x00, 0x00, 0x03, 0x21, 0x00, 0x14]).err(),
        Some(CodecError::UnsupportedProperty(0x21))
    );
}

#[test]
fn rejects_truncated_packet() {
    assert_eq!(
        decode(&[0x20, 0x06, 0x00, 0x00]).err(),
        Some(CodecError::PrematureEndOfData)
    );
}

#[test]
fn connack_round_trips() {
    let mut connack = ConnackPacket::new();
    connack.set_session_present(true);
    connack.add_topic_alias_maximum(32);
    let mut buffer = Vec::new();
    let decoded = round_trip(&connack, &mut buffer);
    assert!(decoded.session_present());
    assert_eq!(decoded.reason_code, ConnectReasonCode::Success);
    assert_eq!(decoded.topic_alias_maximum(), Some(32));
}
