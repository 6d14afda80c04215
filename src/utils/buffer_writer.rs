use heapless::Vec;

use crate::encoding::variable_byte_integer::{VariableByteInteger, VariableByteIntegerEncoder};
use crate::packet::v5::property::Property;
use crate::utils::types::{BinaryData, CodecError, EncodedString, TopicFilter};

/// Cursor-style writer over a caller-provided buffer.
///
/// All writes are bounds checked; running out of buffer is an encoder bug
/// surfaced as `MalformedPacket` rather than a panic.
pub struct BuffWriter<'a> {
    buffer: &'a mut [u8],
    pub position: usize,
    len: usize,
}

impl<'a> BuffWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        let len = buffer.len();
        Self {
            buffer,
            position: 0,
            len,
        }
    }

    fn increment_position(&mut self, increment: usize) {
        self.position += increment;
    }

    pub fn insert_ref(&mut self, len: usize, array: &[u8]) -> Result<(), CodecError> {
        if self.position + len > self.len {
            return Err(CodecError::MalformedPacket);
        }
        self.buffer[self.position..self.position + len].copy_from_slice(&array[..len]);
        self.increment_position(len);
        Ok(())
    }

    pub fn write_u8(&mut self, byte: u8) -> Result<(), CodecError> {
        if self.position >= self.len {
            return Err(CodecError::MalformedPacket);
        }
        self.buffer[self.position] = byte;
        self.increment_position(1);
        Ok(())
    }

    pub fn write_u16(&mut self, two_bytes: u16) -> Result<(), CodecError> {
        let bytes = two_bytes.to_be_bytes();
        self.insert_ref(2, &bytes)
    }

    pub fn write_u32(&mut self, four_bytes: u32) -> Result<(), CodecError> {
        let bytes = four_bytes.to_be_bytes();
        self.insert_ref(4, &bytes)
    }

    pub fn write_string_ref(&mut self, string: &EncodedString<'a>) -> Result<(), CodecError> {
        self.write_u16(string.len)?;
        self.insert_ref(string.len as usize, string.string.as_bytes())
    }

    pub fn write_binary_ref(&mut self, bin: &BinaryData<'a>) -> Result<(), CodecError> {
        self.write_u16(bin.len)?;
        self.insert_ref(bin.len as usize, bin.bin)
    }

    pub fn write_variable_byte_int(&mut self, int: u32) -> Result<(), CodecError> {
        let encoded: VariableByteInteger = VariableByteIntegerEncoder::encode(int)?;
        let len = VariableByteIntegerEncoder::len(encoded);
        self.insert_ref(len, &encoded)
    }

    pub fn write_property(&mut self, property: &Property) -> Result<(), CodecError> {
        self.write_u8(property.identifier())?;
        property.encode(self)
    }

    pub fn write_properties<const LEN: usize>(
        &mut self,
        properties: &Vec<Property, LEN>,
    ) -> Result<(), CodecError> {
        for property in properties.iter() {
            self.write_property(property)?;
        }
        Ok(())
    }

    fn write_topic_filter_ref(
        &mut self,
        sub: bool,
        topic_filter: &TopicFilter<'a>,
    ) -> Result<(), CodecError> {
        self.write_string_ref(&topic_filter.filter)?;
        if sub {
            self.write_u8(topic_filter.sub_options)?;
        }
        Ok(())
    }

    /// Writes the topic filter list of a SUBSCRIBE (`sub = true`, with the
    /// options byte) or UNSUBSCRIBE (`sub = false`) payload.
    pub fn write_topic_filters_ref<const MAX: usize>(
        &mut self,
        sub: bool,
        filters: &Vec<TopicFilter<'a>, MAX>,
    ) -> Result<(), CodecError> {
        for filter in filters.iter() {
            self.write_topic_filter_ref(sub, filter)?;
        }
        Ok(())
    }
}
