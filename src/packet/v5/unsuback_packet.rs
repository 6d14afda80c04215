use heapless::Vec;
use log::error;

use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::property::Property;
use crate::packet::v5::reason_codes::UnsubackReasonCode;
use crate::packet::v5::{MAX_PROPERTIES, MAX_TOPIC_FILTERS};
use crate::utils::buffer_reader::BuffReader;
use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::CodecError;

/// UNSUBACK. Mirrors SUBACK with its own reason-code set.
pub struct UnsubackPacket {
    pub fixed_header: u8,
    pub remain_len: u32,
    pub packet_identifier: u16,
    pub property_len: u32,
    pub properties: Vec<Property, MAX_PROPERTIES>,
    pub reason_codes: Vec<UnsubackReasonCode, MAX_TOPIC_FILTERS>,
}

impl UnsubackPacket {
    pub fn new_with(packet_identifier: u16, reason_code: UnsubackReasonCode) -> Self {
        let mut packet = <Self as Packet>::new();
        packet.packet_identifier = packet_identifier;
        let _ = packet.reason_codes.push(reason_code);
        packet
    }

    fn remaining_len(&self) -> u32 {
        3 + self.property_len + self.reason_codes.len() as u32
    }
}

impl<'a> Packet<'a> for UnsubackPacket {
    fn new() -> Self {
        Self {
            fixed_header: PacketType::Unsuback.into(),
            remain_len: 0,
            packet_identifier: 0,
            property_len: 0,
            properties: Vec::new(),
            reason_codes: Vec::new(),
        }
    }

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        let mut buff_writer = BuffWriter::new(buffer);
        buff_writer.write_u8(self.fixed_header)?;
        buff_writer.write_variable_byte_int(self.remaining_len())?;
        buff_writer.write_u16(self.packet_identifier)?;
        buff_writer.write_variable_byte_int(self.property_len)?;
        buff_writer.write_properties(&self.properties)?;
        for reason_code in self.reason_codes.iter() {
            buff_writer.write_u8((*reason_code).into())?;
        }
        Ok(buff_writer.position)
    }

    fn decode(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError> {
        if self.decode_fixed_header(buff_reader)? != PacketType::Unsuback {
            error!("packet being decoded is not UNSUBACK");
            return Err(CodecError::MalformedPacket);
        }
        self.packet_identifier = buff_reader.read_u16()?;
        self.decode_properties(buff_reader)?;
        while buff_reader.remaining() > 0 {
            let reason_code = UnsubackReasonCode::try_from(buff_reader.read_u8()?)?;
            self.reason_codes
                .push(reason_code)
                .map_err(|_| CodecError::MalformedPacket)?;
        }
        if self.reason_codes.is_empty() {
            return Err(CodecError::MalformedPacket);
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        5 + self.remaining_len() as usize
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
