use crate::packet::v5::connect_packet::ConnectPacket;
use crate::packet::v5::mqtt_packet::{encode_to_vec, Packet};
use crate::tests::unit::packet::v5::round_trip;

#[test]
fn encodes_minimal_connect() {
    let mut connect = ConnectPacket::new();
    connect.add_client_id("123");
    assert_eq!(
        encode_to_vec(&connect).unwrap(),
        [
            0x10, 0x10, 0x00, 0x04, 0x4D, 0x51, 0x54, 0x54, 0x05, 0x00, 0x00, 0x0A, 0x00, 0x00,
            0x03, 0x31, 0x32, 0x33
        ]
    );
}

#[test]
fn encodes_connect_with_credentials() {
    let mut connect = ConnectPacket::new();
    connect.add_client_id("123");
    connect.add_username("A");
    connect.add_password(b"B");
    connect.keep_alive = 22;
    assert_eq!(
        encode_to_vec(&connect).unwrap(),
        [
            0x10, 0x16, 0x00, 0x04, 0x4D, 0x51, 0x54, 0x54, 0x05, 0xC0, 0x00, 0x16, 0x00, 0x00,
            0x03, 0x31, 0x32, 0x33, 0x00, 0x01, 0x41, 0x00, 0x01, 0x42
        ]
    );
}

#[test]
fn clean_start_sets_flag_bit() {
    let mut connect = ConnectPacket::new();
    connect.add_client_id("c");
    connect.add_clean_start(true);
    let bytes = encode_to_vec(&connect).unwrap();
    assert_eq!(bytes[9], 0x02);
}

#[test]
fn session_expiry_property_round_trips() {
    let mut connect = ConnectPacket::new();
    connect.add_client_id("yin");
    connect.add_username("user");
    connect.add_password(b"secret");
    connect.add_clean_start(false);
    connect.add_session_expiry(3600);
    connect.keep_alive = 30;

    let mut buffer = Vec::new();
    let decoded = round_trip(&connect, &mut buffer);
    assert_eq!(decoded.client_id.string, "yin");
    assert_eq!(decoded.keep_alive, 30);
    assert!(!decoded.clean_start());
    assert_eq!(decoded.username.unwrap().string, "user");
    assert_eq!(decoded.password.unwrap().bin, b"secret");
    assert_eq!(decoded.property_len, 5);
    assert_eq!(decoded.properties.len(), 1);
}
