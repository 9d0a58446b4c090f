use super::BytePacketBuffer;
use std::fmt::Display;

const MAX_JUMPS: usize = 5;
const MAX_NAME_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    EndOfBuffer,
    TooManyJumps(usize),
    InvalidLabel(u8),
    NameTooLong(usize),
    InvalidClass(u16),
}

impl Display for ReaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndOfBuffer => write!(f, "reading out of buffer"),
            Self::TooManyJumps(size) => write!(f, "too many jumps when reading: {size}"),
            Self::InvalidLabel(value) => write!(f, "invalid label length byte: {value:#x}"),
            Self::NameTooLong(size) => write!(f, "name too long: {size} bytes"),
            Self::InvalidClass(value) => write!(f, "invalid class: {value}"),
        }
    }
}

impl std::error::Error for ReaderError {}

impl From<ReaderError> for std::io::Error {
    fn from(value: ReaderError) -> Self {
        std::io::Error::new(std::io::ErrorKind::InvalidData, value.to_string())
    }
}

impl BytePacketBuffer {
    /// Step the buffer position forward a specific number of steps
    pub fn step(&mut self, steps: usize) -> Result<(), ReaderError> {
        self.seek(self.pos + steps)
    }

    /// Change the buffer position
    pub(crate) fn seek(&mut self, pos: usize) -> Result<(), ReaderError> {
        if pos > self.buf.len() {
            return Err(ReaderError::EndOfBuffer);
        }
        self.pos = pos;

        Ok(())
    }

    /// Read a single byte and move the position one step forward
    pub fn read(&mut self) -> Result<u8, ReaderError> {
        let res = self.get(self.pos)?;
        self.pos += 1;

        Ok(res)
    }

    /// Get a single byte, without changing the buffer position
    fn get(&self, pos: usize) -> Result<u8, ReaderError> {
        self.buf.get(pos).copied().ok_or(ReaderError::EndOfBuffer)
    }

    /// Get a range of bytes
    pub fn get_range(&self, start: usize, len: usize) -> Result<&[u8], ReaderError> {
        let end = start.checked_add(len).ok_or(ReaderError::EndOfBuffer)?;
        self.buf.get(start..end).ok_or(ReaderError::EndOfBuffer)
    }

    /// Read `len` bytes, stepping `len` steps forward
    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReaderError> {
        let res = self.get_range(self.pos, len)?.to_vec();
        self.pos += len;

        Ok(res)
    }

    /// Read two bytes, stepping two steps forward
    pub fn read_u16(&mut self) -> Result<u16, ReaderError> {
        let res = ((self.read()? as u16) << 8) | (self.read()? as u16);

        Ok(res)
    }

    /// Read four bytes, stepping four steps forward
    pub fn read_u32(&mut self) -> Result<u32, ReaderError> {
        let res = ((self.read()? as u32) << 24)
            | ((self.read()? as u32) << 16)
            | ((self.read()? as u32) << 8)
            | (self.read()? as u32);

        Ok(res)
    }

    /// Read a qname
    ///
    /// Will take something like [3]www[6]google[3]com[0] and return
    /// `www.google.com`, lowercased and without the trailing dot. The root
    /// name is the empty string.
    pub fn read_qname(&mut self) -> Result<String, ReaderError> {
        // Since we might encounter jumps, we keep track of our position
        // locally. The shared position only moves past the first label
        // sequence we read, not past the targets of the jumps.
        let mut pos = self.pos();

        let mut jumped = false;
        let mut jumps_performed = 0;
        let mut total = 0;

        let mut sections: Vec<String> = Vec::new();

        loop {
            // Packets are untrusted data, someone can craft a cycle in the
            // jump instructions.
            if jumps_performed > MAX_JUMPS {
                return Err(ReaderError::TooManyJumps(MAX_JUMPS));
            }

            let len = self.get(pos)?;

            // The two most significant bits set means a jump to some other
            // offset in the packet.
            if (len & 0xC0) == 0xC0 {
                if !jumped {
                    self.seek(pos + 2)?;
                }

                let b2 = self.get(pos + 1)? as u16;
                let offset = (((len as u16) ^ 0xC0) << 8) | b2;
                pos = offset as usize;

                jumped = true;
                jumps_performed += 1;

                continue;
            }
            if (len & 0xC0) != 0 {
                return Err(ReaderError::InvalidLabel(len));
            }

            pos += 1;

            // Domain names are terminated by an empty label of length 0
            if len == 0 {
                break;
            }

            total += len as usize + 1;
            if total > MAX_NAME_LENGTH {
                return Err(ReaderError::NameTooLong(total));
            }

            let str_buffer = self.get_range(pos, len as usize)?;
            sections.push(String::from_utf8_lossy(str_buffer).to_lowercase());

            pos += len as usize;
        }

        if !jumped {
            self.seek(pos)?;
        }

        Ok(sections.join("."))
    }
}
