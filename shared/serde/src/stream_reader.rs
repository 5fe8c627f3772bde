use crate::SerdeErr;

/// Read cursor over an owned byte buffer.
/// The buffer is owned (not borrowed) so readers can be pooled and refilled
/// from inbound datagrams without reallocating.
pub struct StreamReader {
    buffer: Vec<u8>,
    position: usize,
}

impl StreamReader {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            buffer: bytes.to_vec(),
            position: 0,
        }
    }

    pub fn empty() -> Self {
        Self {
            buffer: Vec::new(),
            position: 0,
        }
    }

    /// Replaces the contents and rewinds to the start.
    pub fn reset(&mut self, bytes: &[u8]) {
        self.buffer.clear();
        self.buffer.extend_from_slice(bytes);
        self.position = 0;
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.position = 0;
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The unread tail of the buffer.
    pub fn rest(&self) -> &[u8] {
        &self.buffer[self.position..]
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let bytes = self.read_bytes(N)?;
        let mut output = [0u8; N];
        output.copy_from_slice(bytes);
        Ok(output)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&[u8], SerdeErr> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(SerdeErr::UnexpectedEnd {
                needed: count,
                remaining,
            });
        }
        let start = self.position;
        self.position += count;
        Ok(&self.buffer[start..self.position])
    }

    /// Reads a 32-bit length / count prefix.
    pub fn read_length(&mut self) -> Result<usize, SerdeErr> {
        let length = u32::from_le_bytes(self.read_array::<4>()?);
        Ok(length as usize)
    }

    /// Reads a length-prefixed blob.
    pub fn read_blob(&mut self) -> Result<Vec<u8>, SerdeErr> {
        let length = self.read_length()?;
        Ok(self.read_bytes(length)?.to_vec())
    }

    /// Fails unless at least `count` elements of `min_size` bytes could
    /// still follow. Guards allocations sized by an untrusted prefix.
    pub fn ensure_elements(&self, count: usize, min_size: usize) -> Result<(), SerdeErr> {
        let needed = count.saturating_mul(min_size);
        let remaining = self.remaining();
        if needed > remaining {
            return Err(SerdeErr::UnexpectedEnd { needed, remaining });
        }
        Ok(())
    }
}

impl Default for StreamReader {
    fn default() -> Self {
        Self::empty()
    }
}
