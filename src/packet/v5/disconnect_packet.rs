use heapless::Vec;
use log::error;

use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::property::Property;
use crate::packet::v5::MAX_PROPERTIES;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::CodecError;

/// DISCONNECT. The client emits the bare two-byte form; a broker may
/// attach a reason code and properties, which decode tolerantly (the reason
/// code stays a raw byte so every broker value can at least be logged).
pub struct DisconnectPacket {
    pub fixed_header: u8,
    pub remain_len: u32,
    pub reason_code: u8,
    pub property_len: u32,
    pub properties: Vec<Property, MAX_PROPERTIES>,
}

impl<'a> Packet<'a> for DisconnectPacket {
    fn new() -> Self {
        Self {
            fixed_header: PacketType::Disconnect.into(),
            remain_len: 0,
            reason_code: 0,
            property_len: 0,
            properties: Vec::new(),
        }
    }

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        let mut buff_writer = BuffWriter::new(buffer);
        buff_writer.write_u8(self.fixed_header)?;
        buff_writer.write_variable_byte_int(0)?;
        Ok(buff_writer.position)
    }

    fn decode(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError> {
        if self.decode_fixed_header(buff_reader)? != PacketType::Disconnect {
            error!("packet being decoded is not DISCONNECT");
            return Err(CodecError::MalformedPacket);
        }
        if self.remain_len >= 1 {
            self.reason_code = buff_reader.read_u8()?;
        }
        if self.remain_len >= 2 {
            self.decode_properties(buff_reader)?;
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2
    }

    fn set_property_len(&mut self, value: u32) {
        self.property_len = value;
    }

    fn property_len(&self) -> u32 {
        self.property_len
    }

    fn push_property(&mut self, property: Property) -> Result<(), CodecError> {
        self.properties
            .push(property)
            .map_err(|_| CodecError::MalformedPacket)
    }

    fn property_allowed(&self, property: &Property) -> bool {
        matches!(property, Property::SessionExpiryInterval(_))
    }

    fn set_fixed_header(&mut self, header: u8) {
        self.fixed_header = header;
    }

    fn set_remaining_len(&mut self, remaining_len: u32) {
        self.remain_len = remaining_len;
    }
}
