use heapless::Vec;
use log::error;

use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::property::Property;
use crate::packet::v5::{MAX_PROPERTIES, MAX_TOPIC_FILTERS};
use crate::utils::buffer_reader::BuffReader;
use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::{CodecError, TopicFilter};

/// SUBSCRIBE. Carries one or more topic filters, each with its options
/// byte: QoS (bits 1-0), No Local (bit 2), Retain As Published (bit 3) and
/// Retain Handling (bits 5-4).
pub struct SubscriptionPacket<'a> {
    pub fixed_header: u8,
    pub remain_len: u32,
    pub packet_identifier: u16,
    pub property_len: u32,
    pub properties: Vec<Property, MAX_PROPERTIES>,
    pub topic_filters: Vec<TopicFilter<'a>, MAX_TOPIC_FILTERS>,
}

impl<'a> SubscriptionPacket<'a> {
    pub fn add_identifier(&mut self, identifier: u16) {
        self.packet_identifier = identifier;
    }

    pub fn add_topic_filter(&mut self, filter: &'a str, sub_options: u8) -> Result<(), CodecError> {
        self.topic_filters
            .push(TopicFilter::new(filter, sub_options))
            .map_err(|_| CodecError::MalformedPacket)
    }

    fn remaining_len(&self) -> u32 {
        let mut len: u32 = 3; // packet identifier + property length byte
        len += self.property_len;
        for filter in self.topic_filters.iter() {
            len += filter.encoded_len() as u32;
        }
        len
    }
}

impl<'a> Packet<'a> for SubscriptionPacket<'a> {
    fn new() -> Self {
        Self {
            fixed_header: PacketType::Subscribe.into(),
            remain_len: 0,
            packet_identifier: 0,
            property_len: 0,
            properties: Vec::new(),
            topic_filters: Vec::new(),
        }
    }

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        if self.topic_filters.is_empty() {
            return Err(CodecError::MalformedPacket);
        }
        let mut buff_writer = BuffWriter::new(buffer);
        buff_writer.write_u8(self.fixed_header)?;
        buff_writer.write_variable_byte_int(self.remaining_len())?;
        buff_writer.write_u16(self.packet_identifier)?;
        buff_writer.write_variable_byte_int(self.property_len)?;
        buff_writer.write_properties(&self.properties)?;
        buff_writer.write_topic_filters_ref(true, &self.topic_filters)?;
        Ok(buff_writer.position)
    }

    fn decode(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError> {
        if self.decode_fixed_header(buff_reader)? != PacketType::Subscribe {
            error!("packet being decoded is not SUBSCRIBE");
            return Err(CodecError::MalformedPacket);
        }
        self.packet_identifier = buff_reader.read_u16()?;
        self.decode_properties(buff_reader)?;
        while buff_reader.remaining() > 0 {
            let filter = buff_reader.read_string()?;
            let sub_options = buff_reader.read_u8()?;
            self.topic_filters
                .push(TopicFilter {
                    filter,
                    sub_options,
                })
                .map_err(|_| CodecError::MalformedPacket)?;
        }
        if self.topic_filters.is_empty() {
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
        // SUBSCRIBE carries no properties in this implementation.
        false
    }

    fn set_fixed_header(&mut self, header: u8) {
        self.fixed_header = header;
    }

    fn set_remaining_len(&mut self, remaining_len: u32) {
        self.remain_len = remaining_len;
    }
}
