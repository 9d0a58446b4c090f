use super::{BytePacketBuffer, MAX_PACKET_SIZE};
use std::fmt::Display;

/// Compression pointers only hold 14 bits of offset.
const MAX_POINTER_OFFSET: usize = 0x3FFF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterError {
    EndOfBuffer,
    SingleLabelLength,
}

impl Display for WriterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfBuffer => write!(f, "writing out of buffer"),
            Self::SingleLabelLength => write!(f, "single label too long when writing"),
        }
    }
}

impl std::error::Error for WriterError {}

impl From<WriterError> for std::io::Error {
    fn from(value: WriterError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value.to_string())
    }
}

impl BytePacketBuffer {
    fn set(&mut self, pos: usize, val: u8) -> Result<(), WriterError> {
        let slot = self.buf.get_mut(pos).ok_or(WriterError::EndOfBuffer)?;
        *slot = val;

        Ok(())
    }

    pub fn set_u16(&mut self, pos: usize, val: u16) -> Result<(), WriterError> {
        self.set(pos, (val >> 8) as u8)?;
        self.set(pos + 1, (val & 0xFF) as u8)?;

        Ok(())
    }

    fn write(&mut self, val: u8) -> Result<(), WriterError> {
        if self.pos >= MAX_PACKET_SIZE {
            return Err(WriterError::EndOfBuffer);
        }
        if self.pos < self.buf.len() {
            self.buf[self.pos] = val;
        } else {
            self.buf.push(val);
        }
        self.pos += 1;
        Ok(())
    }

    pub fn write_u8(&mut self, val: u8) -> Result<(), WriterError> {
        self.write(val)
    }

    pub fn write_u16(&mut self, val: u16) -> Result<(), WriterError> {
        self.write((val >> 8) as u8)?;
        self.write((val & 0xFF) as u8)?;

        Ok(())
    }

    pub fn write_u32(&mut self, val: u32) -> Result<(), WriterError> {
        self.write(((val >> 24) & 0xFF) as u8)?;
        self.write(((val >> 16) & 0xFF) as u8)?;
        self.write(((val >> 8) & 0xFF) as u8)?;
        self.write((val & 0xFF) as u8)?;

        Ok(())
    }

    pub fn write_bytes(&mut self, values: &[u8]) -> Result<(), WriterError> {
        for b in values {
            self.write(*b)?;
        }
        Ok(())
    }

    fn write_label(&mut self, label: &str) -> Result<(), WriterError> {
        let len = label.len();
        if len > 0x3f {
            return Err(WriterError::SingleLabelLength);
        }
        self.write_u8(len as u8)?;
        self.write_bytes(label.as_bytes())
    }

    fn recursive_write_qname(&mut self, qname: &str) -> Result<bool, WriterError> {
        if qname.is_empty() {
            return Ok(false);
        }
        if let Some(index) = self.writing_labels.get(qname) {
            self.write_u16(0xC000 | (*index as u16))?;
            return Ok(true);
        }
        if self.pos() <= MAX_POINTER_OFFSET {
            self.writing_labels.insert(qname.to_string(), self.pos());
        }
        if let Some((head, tail)) = qname.split_once('.') {
            self.write_label(head)?;
            self.recursive_write_qname(tail)
        } else {
            self.write_label(qname)?;
            Ok(false)
        }
    }

    /// Writes a name, pointing at an earlier occurrence of any of its
    /// suffixes when there is one.
    pub fn write_qname(&mut self, qname: &str) -> Result<(), WriterError> {
        if !self.recursive_write_qname(qname)? {
            self.write_u8(0)?;
        }

        Ok(())
    }
}
