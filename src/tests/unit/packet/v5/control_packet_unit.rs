use crate::packet::v5::disconnect_packet::DisconnectPacket;
use crate::packet::v5::mqtt_packet::{encode_to_vec, Packet};
use crate::packet::v5::pingreq_packet::PingreqPacket;
use crate::packet::v5::pingresp_packet::PingrespPacket;
use crate::utils::buffer_reader::BuffReader;

#[test]
fn pingreq_is_two_bytes() {
    assert_eq!(encode_to_vec(&PingreqPacket::new()).unwrap(), [0xC0, 0x00]);
}

#[test]
fn pingresp_decodes() {
    let bytes = [0xD0, 0x00];
    let mut packet = PingrespPacket::new();
    let mut reader = BuffReader::new(&bytes, bytes.len());
    packet.decode(&mut reader).unwrap();
    assert_eq!(packet.remain_len, 0);
}

#[test]
fn disconnect_is_emitted_bare() {
    assert_eq!(
        encode_to_vec(&DisconnectPacket::new()).unwrap(),
        [0xE0, 0x00]
    );
}

#[test]
fn disconnect_with_reason_decodes() {
    let bytes = [0xE0, 0x01, 0x8E];
    let mut packet = DisconnectPacket::new();
    let mut reader = BuffReader::new(&bytes, bytes.len());
    packet.decode(&mut reader).unwrap();
    assert_eq!(packet.reason_code, 0x8E);
}
