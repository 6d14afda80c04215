use thiserror::Error;

/// Errors raised while encoding or decoding MQTT control packets.
///
/// Inbound codec errors cause the offending packet to be logged and
/// discarded; outbound codec errors are reported to the caller. Neither
/// tears down the session on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A value does not fit the variable byte integer range (0..=268,435,455).
    #[error("value exceeds the variable byte integer range")]
    ValueTooLarge,
    /// The packet body ended before its advertised length.
    #[error("premature end of packet data")]
    PrematureEndOfData,
    /// A length-prefixed string field is not valid UTF-8.
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,
    /// A variable byte integer carried a continuation bit in its fourth byte.
    #[error("malformed variable byte integer")]
    InvalidVariableByteInteger,
    /// A property identifier this implementation does not speak.
    #[error("unsupported property identifier 0x{0:02X}")]
    UnsupportedProperty(u8),
    /// A reason code outside the closed set accepted for the packet kind.
    #[error("unknown reason code 0x{0:02X}")]
    UnknownReasonCode(u8),
    /// Anything else that makes the packet undecodable or unencodable.
    #[error("malformed packet")]
    MalformedPacket,
}

/// UTF-8 string as it appears on the wire: two length bytes, then the bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodedString<'a> {
    pub string: &'a str,
    pub len: u16,
}

impl<'a> EncodedString<'a> {
    pub fn new() -> Self {
        Self { string: "", len: 0 }
    }

    pub fn from_str(string: &'a str) -> Self {
        Self {
            string,
            len: string.len() as u16,
        }
    }

    /// Length including the two-byte prefix.
    pub fn encoded_len(&self) -> u16 {
        self.len + 2
    }
}

/// MQTT binary data: two length bytes, then the bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryData<'a> {
    pub bin: &'a [u8],
    pub len: u16,
}

impl<'a> BinaryData<'a> {
    pub fn new() -> Self {
        Self { bin: &[], len: 0 }
    }

    pub fn from_slice(bin: &'a [u8]) -> Self {
        Self {
            bin,
            len: bin.len() as u16,
        }
    }

    /// Length including the two-byte prefix.
    pub fn encoded_len(&self) -> u16 {
        self.len + 2
    }
}

/// Topic filter plus its subscription options byte, as carried by SUBSCRIBE.
///
/// UNSUBSCRIBE reuses the type with the options byte ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicFilter<'a> {
    pub filter: EncodedString<'a>,
    pub sub_options: u8,
}

impl<'a> TopicFilter<'a> {
    pub fn new(filter: &'a str, sub_options: u8) -> Self {
        Self {
            filter: EncodedString::from_str(filter),
            sub_options,
        }
    }

    /// Length including the length prefix and the options byte.
    pub fn encoded_len(&self) -> u16 {
        self.filter.len + 3
    }
}
