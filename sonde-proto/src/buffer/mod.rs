use std::collections::HashMap;

pub mod reader;
pub mod writer;

pub use reader::ReaderError;
pub use writer::WriterError;

/// Largest message that can be framed, bounded by the TCP length prefix.
pub const MAX_PACKET_SIZE: usize = 65535;

/// Size of a plain DNS message over UDP, without EDNS.
pub const UDP_PACKET_SIZE: usize = 512;

#[derive(Clone, Debug, Default)]
pub struct BytePacketBuffer {
    pub buf: Vec<u8>,
    pub pos: usize,
    writing_labels: HashMap<String, usize>,
}

impl BytePacketBuffer {
    /// Wraps received bytes, ready to be read from the start.
    pub fn new(buf: Vec<u8>) -> Self {
        Self {
            buf,
            pos: 0,
            writing_labels: HashMap::default(),
        }
    }

    /// Current position within buffer
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Total number of bytes held, read or not.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl From<&[u8]> for BytePacketBuffer {
    fn from(value: &[u8]) -> Self {
        Self::new(value.to_vec())
    }
}
