use crate::SerdeErr;

/// A growable little-endian byte cursor.
/// Writers are reused through the buffer pool, so `reset` keeps the
/// allocation around and only rewinds the length.
pub struct StreamWriter {
    buffer: Vec<u8>,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes a 32-bit length / count prefix.
    pub fn write_length(&mut self, length: usize) -> Result<(), SerdeErr> {
        let Ok(length) = u32::try_from(length) else {
            return Err(SerdeErr::LengthOverflow { length });
        };
        self.write_bytes(&length.to_le_bytes());
        Ok(())
    }

    /// Writes a length-prefixed blob.
    pub fn write_blob(&mut self, bytes: &[u8]) -> Result<(), SerdeErr> {
        self.write_length(bytes.len())?;
        self.write_bytes(bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Copies the written bytes out, leaving the writer intact.
    pub fn copy_bytes(&self) -> Vec<u8> {
        self.buffer.clone()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}

impl Default for StreamWriter {
    fn default() -> Self {
        Self::new()
    }
}
