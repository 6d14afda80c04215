use bytes::{Bytes, BytesMut};

use crate::utils::types::CodecError;

/// Separates MQTT control packets out of an arbitrarily chunked inbound
/// byte stream.
///
/// Chunks are appended with [`feed`](Self::feed); [`next_frame`](Self::next_frame)
/// then yields complete packets one at a time, leaving a trailing partial
/// packet buffered for the next feed. An incomplete packet is not an error,
/// just a request for more bytes; a remaining-length integer with a
/// continuation bit in its fourth byte is unrecoverable because the packet
/// boundary is lost.
pub struct PacketDecoder {
    buffer: BytesMut,
}

impl PacketDecoder {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Appends a chunk received from the transport.
    pub fn feed(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// Bytes currently buffered, including any partial packet.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drops all buffered bytes. Used when the transport is replaced.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Slices the next complete packet off the front of the buffer.
    ///
    /// Returns `Ok(None)` until a full packet is buffered.
    pub fn next_frame(&mut self) -> Result<Option<Bytes>, CodecError> {
        // Header byte plus at least one remaining-length byte.
        if self.buffer.len() < 2 {
            return Ok(None);
        }

        let mut remaining: usize = 0;
        let mut multiplier: usize = 1;
        let mut index: usize = 1;
        loop {
            if index > 4 {
                return Err(CodecError::InvalidVariableByteInteger);
            }
            if index >= self.buffer.len() {
                return Ok(None);
            }
            let byte = self.buffer[index];
            remaining += (byte & 0x7F) as usize * multiplier;
            index += 1;
            if byte & 0x80 == 0 {
                break;
            }
            multiplier *= 128;
        }

        let total = index + remaining;
        if self.buffer.len() < total {
            return Ok(None);
        }
        Ok(Some(self.buffer.split_to(total).freeze()))
    }
}

impl Default for PacketDecoder {
    fn default() -> Self {
        Self::new()
    }
}
