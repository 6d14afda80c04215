use crate::encoding::variable_byte_integer::{
    VariableByteIntegerDecoder, VariableByteIntegerEncoder, MAX_VARIABLE_BYTE_INTEGER,
};
use crate::utils::buffer_reader::BuffReader;
use crate::utils::types::CodecError;

#[test]
fn round_trip_boundary_values() {
    for value in [
        0u32,
        1,
        127,
        128,
        16_383,
        16_384,
        2_097_151,
        2_097_152,
        268_435_455,
    ] {
        let encoded = VariableByteIntegerEncoder::encode(value).unwrap();
        assert_eq!(VariableByteIntegerDecoder::decode(encoded).unwrap(), value);
    }
}

#[test]
fn encoded_lengths() {
    let cases = [
        (0u32, 1usize),
        (127, 1),
        (128, 2),
        (16_383, 2),
        (16_384, 3),
        (2_097_151, 3),
        (2_097_152, 4),
        (268_435_455, 4),
    ];
    for (value, expected_len) in cases {
        let encoded = VariableByteIntegerEncoder::encode(value).unwrap();
        assert_eq!(VariableByteIntegerEncoder::len(encoded), expected_len);
    }
}

#[test]
fn known_encodings() {
    assert_eq!(
        VariableByteIntegerEncoder::encode(128).unwrap(),
        [0x80, 0x01, 0x00, 0x00]
    );
    assert_eq!(
        VariableByteIntegerEncoder::encode(16_384).unwrap(),
        [0x80, 0x80, 0x01, 0x00]
    );
    assert_eq!(
        VariableByteIntegerEncoder::encode(268_435_455).unwrap(),
        [0xFF, 0xFF, 0xFF, 0x7F]
    );
}

#[test]
fn rejects_value_above_maximum() {
    assert_eq!(
        VariableByteIntegerEncoder::encode(MAX_VARIABLE_BYTE_INTEGER + 1),
        Err(CodecError::ValueTooLarge)
    );
}

#[test]
fn rejects_continuation_in_fourth_byte() {
    assert_eq!(
        VariableByteIntegerDecoder::decode([0xFF, 0xFF, 0xFF, 0x80]),
        Err(CodecError::InvalidVariableByteInteger)
    );
}

#[test]
fn reader_leaves_trailing_bytes() {
    let buffer = [0xFF, 0xFF, 0xFF, 0x7F, 0x80];
    let mut reader = BuffReader::new(&buffer, buffer.len());
    assert_eq!(reader.read_variable_byte_int().unwrap(), 268_435_455);
    assert_eq!(reader.position, 4);
    assert_eq!(reader.peek_u8().unwrap(), 0x80);
}

#[test]
fn reader_rejects_truncated_integer() {
    let buffer = [0x80];
    let mut reader = BuffReader::new(&buffer, buffer.len());
    assert_eq!(
        reader.read_variable_byte_int(),
        Err(CodecError::PrematureEndOfData)
    );
}
