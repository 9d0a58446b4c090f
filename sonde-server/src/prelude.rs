use std::net::SocketAddr;

/// Largest datagram read from a client.
pub const MAX_DATAGRAM_SIZE: usize = 4096;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub address: SocketAddr,
    pub buffer: Vec<u8>,
}
