use log::error;

use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::property::Property;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::CodecError;

/// PINGREQ. Header only.
pub struct PingreqPacket {
    pub fixed_header: u8,
    pub remain_len: u32,
}

impl<'a> Packet<'a> for PingreqPacket {
    fn new() -> Self {
        Self {
            fixed_header: PacketType::Pingreq.into(),
            remain_len: 0,
        }
    }

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        let mut buff_writer = BuffWriter::new(buffer);
        buff_writer.write_u8(self.fixed_header)?;
        buff_writer.write_variable_byte_int(0)?;
        Ok(buff_writer.position)
    }

    fn decode(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError> {
        if self.decode_fixed_header(buff_reader)? != PacketType::Pingreq {
            error!("packet being decoded is not PINGREQ");
            return Err(CodecError::MalformedPacket);
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2
    }

    fn set_property_len(&mut self, _value: u32) {}

    fn property_len(&self) -> u32 {
        0
    }

    fn push_property(&mut self, property: Property) -> Result<(), CodecError> {
        Err(CodecError::UnsupportedProperty(property.identifier()))
    }

    fn property_allowed(&self, _property: &Property) -> bool {
        false
    }

    fn set_fixed_header(&mut self, header: u8) {
        self.fixed_header = header;
    }

    fn set_remaining_len(&mut self, remaining_len: u32) {
        self.remain_len = remaining_len;
    }
}
