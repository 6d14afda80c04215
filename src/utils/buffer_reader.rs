use core::mem;
use core::str;

use crate::utils::types::{BinaryData, CodecError, EncodedString};

/// Cursor-style reader over a single packet slice.
///
/// The reader is bounded by `len`, which the streaming decoder sets to the
/// exact packet length, so body parsers cannot read past the packet
/// boundary. Every read past the end fails with `PrematureEndOfData`.
pub struct BuffReader<'a> {
    buffer: &'a [u8],
    pub position: usize,
    len: usize,
}

impl<'a> BuffReader<'a> {
    pub fn new(buffer: &'a [u8], buff_len: usize) -> Self {
        Self {
            buffer,
            position: 0,
            len: buff_len,
        }
    }

    fn increment_position(&mut self, increment: usize) {
        self.position += increment;
    }

    /// Bytes left before the packet boundary.
    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.position)
    }

    /// Reads a variable byte integer, consuming only its significant bytes
    /// and leaving any trailing data in place.
    pub fn read_variable_byte_int(&mut self) -> Result<u32, CodecError> {
        let mut multiplier: u32 = 1;
        let mut value: u32 = 0;
        let mut i: usize = 0;

        loop {
            if i == 4 {
                return Err(CodecError::InvalidVariableByteInteger);
            }
            if self.position + i >= self.len {
                return Err(CodecError::PrematureEndOfData);
            }
            let byte = self.buffer[self.position + i];
            value += (byte & 0x7F) as u32 * multiplier;
            i += 1;
            if byte & 0x80 == 0 {
                break;
            }
            multiplier *= 128;
        }
        self.increment_position(i);
        Ok(value)
    }

    /// Reads a `u32` as big endian.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        if self.position + 4 > self.len {
            return Err(CodecError::PrematureEndOfData);
        }
        let (int_bytes, _rest) = self.buffer[self.position..].split_at(mem::size_of::<u32>());
        let ret = u32::from_be_bytes(int_bytes.try_into().map_err(|_| CodecError::MalformedPacket)?);
        self.increment_position(4);
        Ok(ret)
    }

    /// Reads a `u16` as big endian.
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        if self.position + 2 > self.len {
            return Err(CodecError::PrematureEndOfData);
        }
        let (int_bytes, _rest) = self.buffer[self.position..].split_at(mem::size_of::<u16>());
        let ret = u16::from_be_bytes(int_bytes.try_into().map_err(|_| CodecError::MalformedPacket)?);
        self.increment_position(2);
        Ok(ret)
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        if self.position >= self.len {
            return Err(CodecError::PrematureEndOfData);
        }
        let ret = self.buffer[self.position];
        self.increment_position(1);
        Ok(ret)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<EncodedString<'a>, CodecError> {
        let len = self.read_u16()? as usize;
        if self.position + len > self.len {
            return Err(CodecError::PrematureEndOfData);
        }

        let bytes = &self.buffer[self.position..self.position + len];
        let string = str::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?;
        self.increment_position(len);
        Ok(EncodedString {
            string,
            len: len as u16,
        })
    }

    /// Reads length-prefixed binary data.
    pub fn read_binary(&mut self) -> Result<BinaryData<'a>, CodecError> {
        let len = self.read_u16()? as usize;
        if self.position + len > self.len {
            return Err(CodecError::PrematureEndOfData);
        }

        let bin = &self.buffer[self.position..self.position + len];
        self.increment_position(len);
        Ok(BinaryData {
            bin,
            len: len as u16,
        })
    }

    /// Consumes the rest of the packet. The PUBLISH payload is whatever is
    /// left after the variable header.
    pub fn read_payload(&mut self) -> &'a [u8] {
        let payload = &self.buffer[self.position..self.len];
        self.position = self.len;
        payload
    }

    /// Reads one byte without moving the cursor.
    pub fn peek_u8(&self) -> Result<u8, CodecError> {
        if self.position >= self.len {
            return Err(CodecError::PrematureEndOfData);
        }
        Ok(self.buffer[self.position])
    }
}
