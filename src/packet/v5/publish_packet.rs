use heapless::Vec;
use log::error;

use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::property::Property;
use crate::packet::v5::MAX_PROPERTIES;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::{CodecError, EncodedString};

pub const DUP_FLAG: u8 = 0x08;
pub const QOS_MASK: u8 = 0x06;
pub const RETAIN_FLAG: u8 = 0x01;

/// Delivery guarantee level of a publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum QualityOfService {
    /// At most once.
    #[default]
    QoS0 = 0,
    /// At least once.
    QoS1 = 1,
    /// Exactly once.
    QoS2 = 2,
    INVALID = 3,
}

impl QualityOfService {
    /// Bits 2-1 of the PUBLISH fixed header.
    pub fn into_publish_bits(self) -> u8 {
        match self {
            Self::QoS0 => 0x00,
            Self::QoS1 => 0x02,
            Self::QoS2 => 0x04,
            Self::INVALID => 0x06,
        }
    }

    /// Bits 1-0 of the SUBSCRIBE options byte.
    pub fn into_subscribe_bits(self) -> u8 {
        match self {
            Self::QoS0 => 0x00,
            Self::QoS1 => 0x01,
            Self::QoS2 => 0x02,
            Self::INVALID => 0x03,
        }
    }

    pub fn from_publish_fixed_header(bits: u8) -> Self {
        match bits & QOS_MASK {
            0x00 => Self::QoS0,
            0x02 => Self::QoS1,
            0x04 => Self::QoS2,
            _ => Self::INVALID,
        }
    }

    pub fn from_subscribe_options(bits: u8) -> Self {
        match bits & 0x03 {
            0x00 => Self::QoS0,
            0x01 => Self::QoS1,
            0x02 => Self::QoS2,
            _ => Self::INVALID,
        }
    }
}

/// PUBLISH. DUP, QoS and RETAIN live in the fixed-header flag nibble; the
/// packet identifier is present only for QoS 1 and 2; the payload is
/// whatever remains after the variable header.
pub struct PublishPacket<'a> {
    pub fixed_header: u8,
    pub remain_len: u32,
    pub topic_name: EncodedString<'a>,
    pub packet_identifier: u16,
    pub property_len: u32,
    pub properties: Vec<Property, MAX_PROPERTIES>,
    pub message: Option<&'a [u8]>,
}

impl<'a> PublishPacket<'a> {
    pub fn add_topic_name(&mut self, topic_name: &'a str) {
        self.topic_name = EncodedString::from_str(topic_name);
    }

    pub fn add_message(&mut self, message: &'a [u8]) {
        self.message = Some(message);
    }

    pub fn add_qos(&mut self, qos: QualityOfService) {
        self.fixed_header = (self.fixed_header & !QOS_MASK) | qos.into_publish_bits();
    }

    pub fn add_retain(&mut self, retain: bool) {
        if retain {
            self.fixed_header |= RETAIN_FLAG;
        } else {
            self.fixed_header &= !RETAIN_FLAG;
        }
    }

    pub fn add_dup(&mut self, dup: bool) {
        if dup {
            self.fixed_header |= DUP_FLAG;
        } else {
            self.fixed_header &= !DUP_FLAG;
        }
    }

    pub fn add_identifier(&mut self, identifier: u16) {
        self.packet_identifier = identifier;
    }

    pub fn qos(&self) -> QualityOfService {
        QualityOfService::from_publish_fixed_header(self.fixed_header)
    }

    pub fn dup(&self) -> bool {
        self.fixed_header & DUP_FLAG != 0
    }

    pub fn retain(&self) -> bool {
        self.fixed_header & RETAIN_FLAG != 0
    }

    fn message_len(&self) -> u32 {
        self.message.map(|message| message.len() as u32).unwrap_or(0)
    }

    fn remaining_len(&self) -> u32 {
        let mut len = self.topic_name.encoded_len() as u32;
        if self.qos() != QualityOfService::QoS0 {
            len += 2;
        }
        len += 1; // property length, single VBI byte for this set
        len += self.property_len;
        len + self.message_len()
    }
}

impl<'a> Packet<'a> for PublishPacket<'a> {
    fn new() -> Self {
        Self {
            fixed_header: PacketType::Publish.into(),
            remain_len: 0,
            topic_name: EncodedString::new(),
            packet_identifier: 0,
            property_len: 0,
            properties: Vec::new(),
            message: None,
        }
    }

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        let mut buff_writer = BuffWriter::new(buffer);

        buff_writer.write_u8(self.fixed_header)?;
        buff_writer.write_variable_byte_int(self.remaining_len())?;
        buff_writer.write_string_ref(&self.topic_name)?;
        if self.qos() != QualityOfService::QoS0 {
            buff_writer.write_u16(self.packet_identifier)?;
        }
        buff_writer.write_variable_byte_int(self.property_len)?;
        buff_writer.write_properties(&self.properties)?;
        if let Some(message) = self.message {
            buff_writer.insert_ref(message.len(), message)?;
        }
        Ok(buff_writer.position)
    }

    fn decode(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError> {
        if self.decode_fixed_header(buff_reader)? != PacketType::Publish {
            error!("packet being decoded is not PUBLISH");
            return Err(CodecError::MalformedPacket);
        }
        self.topic_name = buff_reader.read_string()?;
        if self.qos() != QualityOfService::QoS0 {
            self.packet_identifier = buff_reader.read_u16()?;
        }
        self.decode_properties(buff_reader)?;
        let payload = buff_reader.read_payload();
        self.message = if payload.is_empty() {
            None
        } else {
            Some(payload)
        };
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        // fixed header byte + worst-case remaining length integer
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
        // Neither supported identifier is a PUBLISH property.
        false
    }

    fn set_fixed_header(&mut self, header: u8) {
        self.fixed_header = header;
    }

    fn set_remaining_len(&mut self, remaining_len: u32) {
        self.remain_len = remaining_len;
    }
}
