//! Variable byte integer transcoding as introduced in the MQTT 5.0 OASIS
//! standard, <https://docs.oasis-open.org/mqtt/mqtt/v5.0/os/mqtt-v5.0-os.html#_Toc3901107>.

use crate::utils::types::CodecError;

/// Encoded form: up to four bytes, unused trailing bytes zeroed.
pub type VariableByteInteger = [u8; 4];

/// Largest value a variable byte integer can carry.
pub const MAX_VARIABLE_BYTE_INTEGER: u32 = 268_435_455;

/// Encodes integers into the little-endian base-128 format used for packet
/// lengths and property identifiers. The MSb of every byte flags whether a
/// continuation byte follows.
pub struct VariableByteIntegerEncoder;

impl VariableByteIntegerEncoder {
    pub fn encode(mut target: u32) -> Result<VariableByteInteger, CodecError> {
        if target > MAX_VARIABLE_BYTE_INTEGER {
            return Err(CodecError::ValueTooLarge);
        }

        let mut encoded: VariableByteInteger = [0; 4];
        let mut i: usize = 0;
        loop {
            let mut byte = (target % 128) as u8;
            target /= 128;
            if target > 0 {
                byte |= 0x80;
            }
            encoded[i] = byte;
            i += 1;
            if target == 0 {
                break;
            }
        }
        Ok(encoded)
    }

    /// Number of significant bytes in an encoded integer.
    pub fn len(encoded: VariableByteInteger) -> usize {
        let mut i: usize = 0;
        loop {
            if encoded[i] & 0x80 == 0 || i == 3 {
                return i + 1;
            }
            i += 1;
        }
    }
}

/// Decodes the four-byte encoded form back into an integer.
pub struct VariableByteIntegerDecoder;

impl VariableByteIntegerDecoder {
    pub fn decode(encoded: VariableByteInteger) -> Result<u32, CodecError> {
        let mut multiplier: u32 = 1;
        let mut value: u32 = 0;
        let mut i: usize = 0;

        loop {
            let byte = encoded[i];
            value += (byte & 0x7F) as u32 * multiplier;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            i += 1;
            if i == 4 {
                // Continuation bit set in the fourth byte.
                return Err(CodecError::InvalidVariableByteInteger);
            }
            multiplier *= 128;
        }
    }
}
