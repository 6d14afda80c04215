use crate::packet::v5::decoder::PacketDecoder;
use crate::packet::v5::mqtt_packet::{encode_to_vec, Packet};
use crate::packet::v5::pingresp_packet::PingrespPacket;
use crate::packet::v5::publish_packet::{PublishPacket, QualityOfService};
use crate::packet::v5::puback_packet::PubackPacket;
use crate::packet::v5::reason_codes::PubackReasonCode;
use crate::packet::v5::rx::{decode_packet, RxPacket};
use crate::utils::types::CodecError;

fn sample_stream() -> (Vec<Vec<u8>>, Vec<u8>) {
    let mut publish = PublishPacket::new();
    publish.add_topic_name("/pong");
    publish.add_qos(QualityOfService::QoS1);
    publish.add_identifier(3);
    publish.add_message(b"Try This");

    let frames = vec![
        encode_to_vec(&publish).unwrap(),
        encode_to_vec(&PubackPacket::new_with(3, PubackReasonCode::Success)).unwrap(),
        encode_to_vec(&PingrespPacket::new()).unwrap(),
    ];
    let stream = frames.concat();
    (frames, stream)
}

#[test]
fn splits_concatenated_packets_fed_byte_by_byte() {
    let (frames, stream) = sample_stream();
    let mut decoder = PacketDecoder::new();
    let mut collected = Vec::new();

    for byte in stream {
        decoder.feed(&[byte]);
        while let Some(frame) = decoder.next_frame().unwrap() {
            collected.push(frame.to_vec());
        }
    }
    assert_eq!(collected, frames);
    assert_eq!(decoder.buffered(), 0);
}

#[test]
fn splits_packets_fed_in_one_chunk() {
    let (frames, stream) = sample_stream();
    let mut decoder = PacketDecoder::new();
    decoder.feed(&stream);

    let mut collected = Vec::new();
    while let Some(frame) = decoder.next_frame().unwrap() {
        collected.push(frame.to_vec());
    }
    assert_eq!(collected, frames);
}

#[test]
fn keeps_partial_trailer_buffered() {
    let (frames, stream) = sample_stream();
    let cut = frames[0].len() + 2;
    let mut decoder = PacketDecoder::new();
    decoder.feed(&stream[..cut]);

    let first = decoder.next_frame().unwrap().unwrap();
    assert_eq!(first.to_vec(), frames[0]);
    assert_eq!(decoder.next_frame().unwrap(), None);
    assert_eq!(decoder.buffered(), 2);

    decoder.feed(&stream[cut..]);
    assert_eq!(decoder.next_frame().unwrap().unwrap().to_vec(), frames[1]);
    assert_eq!(decoder.next_frame().unwrap().unwrap().to_vec(), frames[2]);
}

#[test]
fn decoded_frames_parse_into_typed_packets() {
    let (_, stream) = sample_stream();
    let mut decoder = PacketDecoder::new();
    decoder.feed(&stream);

    let frame = decoder.next_frame().unwrap().unwrap();
    match decode_packet(&frame).unwrap() {
        RxPacket::Publish(publish) => {
            assert_eq!(publish.topic_name.string, "/pong");
            assert_eq!(publish.packet_identifier, 3);
        }
        _ => panic!("expected a publish packet"),
    }
    let frame = decoder.next_frame().unwrap().unwrap();
    assert!(matches!(decode_packet(&frame).unwrap(), RxPacket::Puback(_)));
}

#[test]
fn over_long_length_integer_is_unrecoverable() {
    let mut decoder = PacketDecoder::new();
    decoder.feed(&[0x30, 0x80, 0x80, 0x80, 0x80]);
    assert_eq!(
        decoder.next_frame().err(),
        Some(CodecError::InvalidVariableByteInteger)
    );
}

#[test]
fn waits_for_length_continuation_bytes() {
    let mut decoder = PacketDecoder::new();
    decoder.feed(&[0x30, 0x80]);
    assert_eq!(decoder.next_frame().unwrap(), None);
    decoder.feed(&[0x01]);
    // 128 payload bytes are still outstanding.
    assert_eq!(decoder.next_frame().unwrap(), None);
    decoder.feed(&vec![0u8; 128]);
    let frame = decoder.next_frame().unwrap().unwrap();
    assert_eq!(frame.len(), 131);
}
