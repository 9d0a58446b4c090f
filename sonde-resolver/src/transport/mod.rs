//! Exchange of a single DNS message with a single server.

use sonde_proto::buffer::{ReaderError, WriterError};
use sonde_proto::packet::DnsPacket;
use std::fmt::Display;
use std::net::SocketAddr;
use std::time::Duration;

mod tcp;
mod udp;

pub use tcp::TcpTransport;
pub use udp::UdpTransport;

/// UDP payload size advertised through EDNS0.
pub const EDNS_PAYLOAD_SIZE: u16 = 1232;

pub const DEFAULT_UDP_TIMEOUT: Duration = Duration::from_secs(2);

pub const DEFAULT_TCP_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum TransportError {
    Io(std::io::Error),
    Timeout,
    Reader(ReaderError),
    Writer(WriterError),
    IdMismatch { expected: u16, received: u16 },
}

impl Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(inner) => write!(f, "io error: {inner}"),
            Self::Timeout => write!(f, "timed out"),
            Self::Reader(inner) => write!(f, "unable to read reply: {inner}"),
            Self::Writer(inner) => write!(f, "unable to write query: {inner}"),
            Self::IdMismatch { expected, received } => {
                write!(f, "reply id {received} does not match query id {expected}")
            }
        }
    }
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ReaderError> for TransportError {
    fn from(value: ReaderError) -> Self {
        Self::Reader(value)
    }
}

impl From<WriterError> for TransportError {
    fn from(value: WriterError) -> Self {
        Self::Writer(value)
    }
}

impl From<tokio::time::error::Elapsed> for TransportError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::Timeout
    }
}

/// Sends one query to one server and waits for its reply.
///
/// Dropping the returned future aborts the exchange, which is how a caller
/// deadline cancels a blocked query.
#[async_trait::async_trait]
pub trait Transport: std::fmt::Debug + Send + Sync {
    async fn exchange(
        &self,
        request: &DnsPacket,
        address: SocketAddr,
    ) -> Result<DnsPacket, TransportError>;
}

/// Queries over UDP first and retries over TCP when the reply is truncated.
///
/// A UDP failure is reported as is, without falling back to TCP.
#[derive(Debug, Default)]
pub struct UdpTcpTransport {
    udp: UdpTransport,
    tcp: TcpTransport,
}

impl UdpTcpTransport {
    pub fn new(udp: UdpTransport, tcp: TcpTransport) -> Self {
        Self { udp, tcp }
    }
}

#[async_trait::async_trait]
impl Transport for UdpTcpTransport {
    async fn exchange(
        &self,
        request: &DnsPacket,
        address: SocketAddr,
    ) -> Result<DnsPacket, TransportError> {
        let reply = self.udp.exchange(request, address).await?;
        if !reply.header.truncated_message {
            return Ok(reply);
        }
        tracing::debug!("truncated reply from {address}, retrying over tcp");
        self.tcp.exchange(request, address).await
    }
}

fn check_id(request: &DnsPacket, reply: &DnsPacket) -> Result<(), TransportError> {
    if request.header.id == reply.header.id {
        Ok(())
    } else {
        Err(TransportError::IdMismatch {
            expected: request.header.id,
            received: reply.header.id,
        })
    }
}
