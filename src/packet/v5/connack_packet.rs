use heapless::Vec;
use log::error;

use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::property::Property;
use crate::packet::v5::reason_codes::ConnectReasonCode;
use crate::packet::v5::MAX_PROPERTIES;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::CodecError;

const SESSION_PRESENT_FLAG: u8 = 0x01;

/// CONNACK. Carries the session-present flag, a reason code and the
/// broker's negotiated properties.
pub struct ConnackPacket {
    pub fixed_header: u8,
    pub remain_len: u32,
    pub ack_flags: u8,
    pub reason_code: ConnectReasonCode,
    pub property_len: u32,
    pub properties: Vec<Property, MAX_PROPERTIES>,
}

impl ConnackPacket {
    pub fn session_present(&self) -> bool {
        self.ack_flags & SESSION_PRESENT_FLAG != 0
    }

    pub fn set_session_present(&mut self, present: bool) {
        if present {
            self.ack_flags |= SESSION_PRESENT_FLAG;
        } else {
            self.ack_flags &= !SESSION_PRESENT_FLAG;
        }
    }

    /// Topic Alias Maximum negotiated by the broker, if it sent one.
    pub fn topic_alias_maximum(&self) -> Option<u16> {
        self.properties.iter().find_map(|property| match property {
            Property::TopicAliasMaximum(value) => Some(*value),
            _ => None,
        })
    }

    pub fn add_topic_alias_maximum(&mut self, maximum: u16) {
        if self
            .properties
            .push(Property::TopicAliasMaximum(maximum))
            .is_ok()
        {
            self.property_len += 3;
        }
    }

    fn remaining_len(&self) -> u32 {
        // ack flags + reason code + property length byte
        3 + self.property_len
    }
}

impl<'a> Packet<'a> for ConnackPacket {
    fn new() -> Self {
        Self {
            fixed_header: PacketType::Connack.into(),
            remain_len: 0,
            ack_flags: 0,
            reason_code: ConnectReasonCode::Success,
            property_len: 0,
            properties: Vec::new(),
        }
    }

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        let mut buff_writer = BuffWriter::new(buffer);
        buff_writer.write_u8(self.fixed_header)?;
        buff_writer.write_variable_byte_int(self.remaining_len())?;
        buff_writer.write_u8(self.ack_flags)?;
        buff_writer.write_u8(self.reason_code.into())?;
        buff_writer.write_variable_byte_int(self.property_len)?;
        buff_writer.write_properties(&self.properties)?;
        Ok(buff_writer.position)
    }

    fn decode(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError> {
        if self.decode_fixed_header(buff_reader)? != PacketType::Connack {
            error!("packet being decoded is not CONNACK");
            return Err(CodecError::MalformedPacket);
        }
        self.ack_flags = buff_reader.read_u8()?;
        self.reason_code = ConnectReasonCode::try_from(buff_reader.read_u8()?)?;
        self.decode_properties(buff_reader)
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

    fn property_allowed(&self, property: &Property) -> bool {
        matches!(
            property,
            Property::TopicAliasMaximum(_) | Property::SessionExpiryInterval(_)
        )
    }

    fn set_fixed_header(&mut self, header: u8) {
        self.fixed_header = header;
    }

    fn set_remaining_len(&mut self, remaining_len: u32) {
        self.remain_len = remaining_len;
    }
}
