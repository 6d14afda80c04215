//! PUBACK, PUBREC, PUBREL and PUBCOMP share one layout, so a single generic
//! packet transcodes all four and marker types pin down the header byte and
//! the accepted reason-code set.

use core::marker::PhantomData;

use heapless::Vec;
use log::error;

use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::property::Property;
use crate::packet::v5::reason_codes::{PubackReasonCode, PubrelReasonCode};
use crate::packet::v5::MAX_PROPERTIES;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::CodecError;

pub trait AckPacketType {
    const PACKET_TYPE: PacketType;
    type Reason: Copy
        + Default
        + PartialEq
        + core::fmt::Debug
        + Into<u8>
        + TryFrom<u8, Error = CodecError>;
}

#[derive(Debug)]
pub struct Ack;
#[derive(Debug)]
pub struct Rec;
#[derive(Debug)]
pub struct Rel;
#[derive(Debug)]
pub struct Comp;

impl AckPacketType for Ack {
    const PACKET_TYPE: PacketType = PacketType::Puback;
    type Reason = PubackReasonCode;
}

impl AckPacketType for Rec {
    const PACKET_TYPE: PacketType = PacketType::Pubrec;
    type Reason = PubackReasonCode;
}

impl AckPacketType for Rel {
    const PACKET_TYPE: PacketType = PacketType::Pubrel;
    type Reason = PubrelReasonCode;
}

impl AckPacketType for Comp {
    const PACKET_TYPE: PacketType = PacketType::Pubcomp;
    type Reason = PubrelReasonCode;
}

pub type PubackPacket = GenericAckPacket<Ack>;
pub type PubrecPacket = GenericAckPacket<Rec>;
pub type PubrelPacket = GenericAckPacket<Rel>;
pub type PubcompPacket = GenericAckPacket<Comp>;

pub struct GenericAckPacket<T: AckPacketType> {
    pub fixed_header: u8,
    pub remain_len: u32,
    pub packet_identifier: u16,
    pub reason_code: T::Reason,
    pub property_len: u32,
    pub properties: Vec<Property, MAX_PROPERTIES>,
    _marker: PhantomData<T>,
}

impl<T: AckPacketType> GenericAckPacket<T> {
    pub fn new_with(packet_identifier: u16, reason_code: T::Reason) -> Self {
        let mut packet = <Self as Packet>::new();
        packet.packet_identifier = packet_identifier;
        packet.reason_code = reason_code;
        packet
    }

    fn success(&self) -> bool {
        self.reason_code == T::Reason::default()
    }

    fn remaining_len(&self) -> u32 {
        // The reason code is omitted for success, the property length for an
        // empty property list.
        if self.properties.is_empty() {
            if self.success() {
                2
            } else {
                3
            }
        } else {
            4 + self.property_len
        }
    }
}

impl<'a, T: AckPacketType> Packet<'a> for GenericAckPacket<T> {
    fn new() -> Self {
        Self {
            fixed_header: T::PACKET_TYPE.into(),
            remain_len: 0,
            packet_identifier: 0,
            reason_code: T::Reason::default(),
            property_len: 0,
            properties: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        let mut buff_writer = BuffWriter::new(buffer);
        let remaining_len = self.remaining_len();

        buff_writer.write_u8(self.fixed_header)?;
        buff_writer.write_variable_byte_int(remaining_len)?;
        buff_writer.write_u16(self.packet_identifier)?;
        if remaining_len >= 3 {
            buff_writer.write_u8(self.reason_code.into())?;
        }
        if remaining_len >= 4 {
            buff_writer.write_variable_byte_int(self.property_len)?;
            buff_writer.write_properties(&self.properties)?;
        }
        Ok(buff_writer.position)
    }

    fn decode(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError> {
        if self.decode_fixed_header(buff_reader)? != T::PACKET_TYPE {
            error!("packet being decoded is not {:?}", T::PACKET_TYPE);
            return Err(CodecError::MalformedPacket);
        }
        if self.fixed_header & 0x0F != u8::from(T::PACKET_TYPE) & 0x0F {
            error!("reserved flag bits do not match for {:?}", T::PACKET_TYPE);
            return Err(CodecError::MalformedPacket);
        }
        self.packet_identifier = buff_reader.read_u16()?;
        if self.remain_len >= 3 {
            self.reason_code = T::Reason::try_from(buff_reader.read_u8()?)?;
        } else {
            self.reason_code = T::Reason::default();
        }
        if self.remain_len >= 4 {
            self.decode_properties(buff_reader)?;
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
        // Reason String and User Property are outside the supported set.
        false
    }

    fn set_fixed_header(&mut self, header: u8) {
        self.fixed_header = header;
    }

    fn set_remaining_len(&mut self, remaining_len: u32) {
        self.remain_len = remaining_len;
    }
}
