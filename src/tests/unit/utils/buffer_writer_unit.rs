use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::{CodecError, EncodedString};

#[test]
fn writes_integers_big_endian() {
    let mut buffer = [0u8; 7];
    let mut writer = BuffWriter::new(&mut buffer);
    writer.write_u8(0x01).unwrap();
    writer.write_u16(0x0203).unwrap();
    writer.write_u32(0x04050607).unwrap();
    assert_eq!(writer.position, 7);
    assert_eq!(buffer, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07]);
}

#[test]
fn writes_length_prefixed_string() {
    let mut buffer = [0u8; 5];
    let mut writer = BuffWriter::new(&mut buffer);
    writer
        .write_string_ref(&EncodedString::from_str("a/b"))
        .unwrap();
    assert_eq!(buffer, [0x00, 0x03, b'a', b'/', b'b']);
}

#[test]
fn writes_variable_byte_int() {
    let mut buffer = [0u8; 2];
    let mut writer = BuffWriter::new(&mut buffer);
    writer.write_variable_byte_int(321).unwrap();
    assert_eq!(buffer, [0xC1, 0x02]);
}

#[test]
fn refuses_to_overrun_the_buffer() {
    let mut buffer = [0u8; 2];
    let mut writer = BuffWriter::new(&mut buffer);
    assert_eq!(writer.write_u32(1), Err(CodecError::MalformedPacket));
    writer.write_u16(0xBEEF).unwrap();
    assert_eq!(writer.write_u8(0), Err(CodecError::MalformedPacket));
}
