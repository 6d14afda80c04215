use heapless::Vec;
use log::error;

use crate::packet::v5::mqtt_packet::Packet;
use crate::packet::v5::packet_type::PacketType;
use crate::packet::v5::property::Property;
use crate::packet::v5::MAX_PROPERTIES;
use crate::utils::buffer_reader::BuffReader;
use crate::utils::buffer_writer::BuffWriter;
use crate::utils::types::{BinaryData, CodecError, EncodedString};

pub const CLEAN_START_FLAG: u8 = 0x02;
pub const PASSWORD_FLAG: u8 = 0x40;
pub const USERNAME_FLAG: u8 = 0x80;

/// CONNECT. Protocol name "MQTT", level 5; Will flags are never set.
pub struct ConnectPacket<'a> {
    pub fixed_header: u8,
    pub remain_len: u32,
    pub protocol_name: EncodedString<'a>,
    pub protocol_version: u8,
    pub connect_flags: u8,
    pub keep_alive: u16,
    pub property_len: u32,
    pub properties: Vec<Property, MAX_PROPERTIES>,
    pub client_id: EncodedString<'a>,
    pub username: Option<EncodedString<'a>>,
    pub password: Option<BinaryData<'a>>,
}

impl<'a> ConnectPacket<'a> {
    pub fn add_client_id(&mut self, client_id: &'a str) {
        self.client_id = EncodedString::from_str(client_id);
    }

    pub fn add_username(&mut self, username: &'a str) {
        self.username = Some(EncodedString::from_str(username));
        self.connect_flags |= USERNAME_FLAG;
    }

    pub fn add_password(&mut self, password: &'a [u8]) {
        self.password = Some(BinaryData::from_slice(password));
        self.connect_flags |= PASSWORD_FLAG;
    }

    pub fn add_clean_start(&mut self, clean_start: bool) {
        if clean_start {
            self.connect_flags |= CLEAN_START_FLAG;
        } else {
            self.connect_flags &= !CLEAN_START_FLAG;
        }
    }

    pub fn add_session_expiry(&mut self, interval: u32) {
        if self
            .properties
            .push(Property::SessionExpiryInterval(interval))
            .is_ok()
        {
            self.property_len += 5;
        }
    }

    pub fn clean_start(&self) -> bool {
        self.connect_flags & CLEAN_START_FLAG != 0
    }

    fn remaining_len(&self) -> u32 {
        // protocol name (6) + version + flags + keep alive
        let mut len: u32 = 10;
        len += 1; // property length, always a single VBI byte for this set
        len += self.property_len;
        len += self.client_id.encoded_len() as u32;
        if let Some(username) = &self.username {
            len += username.encoded_len() as u32;
        }
        if let Some(password) = &self.password {
            len += password.encoded_len() as u32;
        }
        len
    }
}

impl<'a> Packet<'a> for ConnectPacket<'a> {
    fn new() -> Self {
        Self {
            fixed_header: PacketType::Connect.into(),
            remain_len: 0,
            protocol_name: EncodedString::from_str("MQTT"),
            protocol_version: 5,
            connect_flags: 0,
            keep_alive: 10,
            property_len: 0,
            properties: Vec::new(),
            client_id: EncodedString::new(),
            username: None,
            password: None,
        }
    }

    fn encode(&self, buffer: &mut [u8]) -> Result<usize, CodecError> {
        let mut buff_writer = BuffWriter::new(buffer);

        buff_writer.write_u8(self.fixed_header)?;
        buff_writer.write_variable_byte_int(self.remaining_len())?;
        buff_writer.write_string_ref(&self.protocol_name)?;
        buff_writer.write_u8(self.protocol_version)?;
        buff_writer.write_u8(self.connect_flags)?;
        buff_writer.write_u16(self.keep_alive)?;
        buff_writer.write_variable_byte_int(self.property_len)?;
        buff_writer.write_properties(&self.properties)?;
        buff_writer.write_string_ref(&self.client_id)?;
        if let Some(username) = &self.username {
            buff_writer.write_string_ref(username)?;
        }
        if let Some(password) = &self.password {
            buff_writer.write_binary_ref(password)?;
        }
        Ok(buff_writer.position)
    }

    fn decode(&mut self, buff_reader: &mut BuffReader<'a>) -> Result<(), CodecError> {
        if self.decode_fixed_header(buff_reader)? != PacketType::Connect {
            error!("packet being decoded is not CONNECT");
            return Err(CodecError::MalformedPacket);
        }
        self.protocol_name = buff_reader.read_string()?;
        self.protocol_version = buff_reader.read_u8()?;
        self.connect_flags = buff_reader.read_u8()?;
        self.keep_alive = buff_reader.read_u16()?;
        self.decode_properties(buff_reader)?;
        self.client_id = buff_reader.read_string()?;
        if self.connect_flags & USERNAME_FLAG != 0 {
            self.username = Some(buff_reader.read_string()?);
        }
        if self.connect_flags & PASSWORD_FLAG != 0 {
            self.password = Some(buff_reader.read_binary()?);
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
