use crate::utils::buffer_reader::BuffReader;
use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::CodecError;

/// The property identifiers this implementation speaks.
///
/// Everything else raises [`CodecError::UnsupportedProperty`] on decode so
/// that future identifiers get wired up intentionally instead of being
/// silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    /// 0x11, four byte integer. Carried in CONNECT for persistent sessions.
    SessionExpiryInterval(u32),
    /// 0x22, two byte integer. Negotiated by the broker in CONNACK.
    TopicAliasMaximum(u16),
}

impl Property {
    pub const SESSION_EXPIRY_INTERVAL: u8 = 0x11;
    pub const TOPIC_ALIAS_MAXIMUM: u8 = 0x22;

    pub fn identifier(&self) -> u8 {
        match self {
            Property::SessionExpiryInterval(_) => Self::SESSION_EXPIRY_INTERVAL,
            Property::TopicAliasMaximum(_) => Self::TOPIC_ALIAS_MAXIMUM,
        }
    }

    /// Length of the property value, excluding the identifier byte.
    pub fn encoded_len(&self) -> u16 {
        match self {
            Property::SessionExpiryInterval(_) => 4,
            Property::TopicAliasMaximum(_) => 2,
        }
    }

    pub fn encode(&self, buff_writer: &mut BuffWriter) -> Result<(), CodecError> {
        match self {
            Property::SessionExpiryInterval(value) => buff_writer.write_u32(*value),
            Property::TopicAliasMaximum(value) => buff_writer.write_u16(*value),
        }
    }

    pub fn decode(buff_reader: &mut BuffReader) -> Result<Self, CodecError> {
        let identifier = buff_reader.read_u8()?;
        match identifier {
            Self::SESSION_EXPIRY_INTERVAL => {
                Ok(Property::SessionExpiryInterval(buff_reader.read_u32()?))
            }
            Self::TOPIC_ALIAS_MAXIMUM => Ok(Property::TopicAliasMaximum(buff_reader.read_u16()?)),
            other => Err(CodecError::UnsupportedProperty(other)),
        }
    }
}
