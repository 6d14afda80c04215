use log::trace;

use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::property::Property;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::types::CodecError;

/// Maps MQTT v5 control packets to structures that can be built, encoded to
/// a byte buffer and decoded back from one.
pub trait Packet<'a> {
    fn new() -> Self;

    /// Serializes the packet into `buffer`, returning the number of bytes
    /// written. Pure; performs no I/O.
    fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError>;

    /// Parses the packet out of `buff_reader`, which is bounded by the
    /// exact packet length.
    fn decode(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError>;

    /// Upper bound on the encoded size, used to size encode buffers.
    fn encoded_len(&self) -> usize;

    fn set_property_len(&mut self, value: u32);
    fn property_len(&self) -> u32;
    fn push_property(&mut self, property: Property) -> Result<(), CodecError>;
    /// Whether the property may appear in this packet kind.
    fn property_allowed(&self, property: &Property) -> bool;
    fn set_fixed_header(&mut self, header: u8);
    fn set_remaining_len(&mut self, remaining_len: u32);

    /// Decodes the property-length prefix and the identifier/value sequence
    /// behind it. Properties outside the packet's allowed set fail with
    /// `UnsupportedProperty`.
    fn decode_properties(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError> {
        let property_len = buff_reader.read_variable_byte_int()?;
        self.set_property_len(property_len);
        let mut consumed: u32 = 0;
        while consumed < property_len {
            let property = Property::decode(buff_reader)?;
            trace!("decoded property {:?}", property);
            if !self.property_allowed(&property) {
                return Err(CodecError::UnsupportedProperty(property.identifier()));
            }
            consumed += property.encoded_len() as u32 + 1;
            self.push_property(property)?;
        }
        if consumed != property_len {
            return Err(CodecError::MalformedPacket);
        }
        Ok(())
    }

    /// Decodes the first header byte and the remaining-length integer.
    fn decode_fixed_header(
        &mut self,
        buff_reader: &mut BuffReader,
    ) -> Result<PacketType, CodecError> {
        let first_byte = buff_reader.read_u8()?;
        trace!("first byte of accepted packet: {:02X}", first_byte);
        self.set_fixed_header(first_byte);
        self.set_remaining_len(buff_reader.read_variable_byte_int()?);
        Ok(PacketType::from(first_byte))
    }
}

/// Encodes a packet into a freshly allocated vector.
pub fn encode_to_vec<'a, P: Packet<'a>>(packet: &P) -> Result<Vec<u8>, CodecError> {
    let mut buffer = vec![0u8; packet.encoded_len()];
    let written = packet.encode(&mut buffer)?;
    buffer.truncate(written);
    Ok(buffer)
}
