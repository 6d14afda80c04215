use crate::packet::v5::mqtt_packet::{encode_to_vec, Packet};
use crate::packet::v5::publish_packet::{PublishPacket, QualityOfService};
use crate::tests::unit::packet::v5::round_trip;
use crate::utils::buffer_reader::BuffReader;

#[test]
fn decodes_qos0_publish() {
    let bytes = [
        0x30, 0x10, 0x00, 0x05, 0x2F, 0x70, 0x6F, 0x6E, 0x67, 0x00, 0x54, 0x72, 0x79, 0x20, 0x54,
        0x68, 0x69, 0x73,
    ];
    let mut publish = PublishPacket::new();
    let mut reader = BuffReader::new(&bytes, bytes.len());
    publish.decode(&mut reader).unwrap();
    assert_eq!(publish.topic_name.string, "/pong");
    assert_eq!(publish.qos(), QualityOfService::QoS0);
    assert_eq!(publish.message, Some("Try This".as_bytes()));
    assert!(!publish.dup());
    assert!(!publish.retain());
}

#[test]
fn qos0_encoding_omits_packet_identifier() {
    let mut publish = PublishPacket::new();
    publish.add_topic_name("/pong");
    publish.add_message(b"Try This");
    assert_eq!(
        encode_to_vec(&publish).unwrap(),
        [
            0x30, 0x10, 0x00, 0x05, 0x2F, 0x70, 0x6F, 0x6E, 0x67, 0x00, 0x54, 0x72, 0x79, 0x20,
            0x54, 0x68, 0x69, 0x73,
        ]
    );
}

#[test]
fn qos1_publish_round_trips() {
    let mut publish = PublishPacket::new();
    publish.add_topic_name("/ping");
    publish.add_qos(QualityOfService::QoS1);
    publish.add_identifier(42);
    publish.add_message(b"hello");

    let mut buffer = Vec::new();
    let decoded = round_trip(&publish, &mut buffer);
    assert_eq!(decoded.topic_name.string, "/ping");
    assert_eq!(decoded.qos(), QualityOfService::QoS1);
    assert_eq!(decoded.packet_identifier, 42);
    assert_eq!(decoded.message, Some("hello".as_bytes()));
}

#[test]
fn empty_payload_decodes_as_none() {
    let mut publish = PublishPacket::new();
    publish.add_topic_name("/ping");
    publish.add_qos(QualityOfService::QoS2);
    publish.add_identifier(7);

    let mut buffer = Vec::new();
    let decoded = round_trip(&publish, &mut buffer);
    assert_eq!(decoded.qos(), QualityOfService::QoS2);
    assert_eq!(decoded.packet_identifier, 7);
    assert_eq!(decoded.message, None);
}

#[test]
fn dup_and_retain_flags_round_trip() {
    let mut publish = PublishPacket::new();
    publish.add_topic_name("t");
    publish.add_qos(QualityOfService::QoS1);
    publish.add_identifier(1);
    publish.add_dup(true);
    publish.add_retain(true);

    let bytes = encode_to_vec(&publish).unwrap();
    assert_eq!(bytes[0], 0x30 | 0x08 | 0x02 | 0x01);

    let mut decoded = PublishPacket::new();
    let mut reader = BuffReader::new(&bytes, bytes.len());
    decoded.decode(&mut reader).unwrap();
    assert!(decoded.dup());
    assert!(decoded.retain());
    assert_eq!(decoded.qos(), QualityOfService::QoS1);
}
