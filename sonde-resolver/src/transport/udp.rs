use super::{check_id, Transport, TransportError, DEFAULT_UDP_TIMEOUT, EDNS_PAYLOAD_SIZE};
use sonde_proto::packet::DnsPacket;
use std::borrow::Cow;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;

/// One query per ephemeral socket, advertising an EDNS0 buffer without the
/// DNSSEC OK bit and bounded by its own timeout.
#[derive(Debug)]
pub struct UdpTransport {
    timeout: Duration,
    payload_size: u16,
}

impl Default for UdpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_UDP_TIMEOUT)
    }
}

impl UdpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            payload_size: EDNS_PAYLOAD_SIZE,
        }
    }

    async fn receive(
        &self,
        socket: &UdpSocket,
        request: &DnsPacket,
    ) -> Result<DnsPacket, TransportError> {
        let mut buf = vec![0u8; self.payload_size as usize];
        loop {
            let size = socket.recv(&mut buf).await?;
            let reply = DnsPacket::try_from(&buf[..size])?;
            // Stray datagrams are dropped, the real reply may still come.
            match check_id(request, &reply) {
                Ok(()) => return Ok(reply),
                Err(err) => tracing::debug!("ignoring datagram: {err}"),
            }
        }
    }
}

#[async_trait::async_trait]
impl Transport for UdpTransport {
    #[tracing::instrument(skip(self, request))]
    async fn exchange(
        &self,
        request: &DnsPacket,
        address: SocketAddr,
    ) -> Result<DnsPacket, TransportError> {
        let request = match request.edns_payload_size() {
            Some(_) => Cow::Borrowed(request),
            None => Cow::Owned(request.clone().with_edns(self.payload_size, false)),
        };

        let local: SocketAddr = if address.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(address).await?;

        let buffer = request.create_buffer()?;

        tokio::time::timeout(self.timeout, async {
            socket.send(buffer.as_slice()).await?;
            self.receive(&socket, &request).await
        })
        .await?
    }
}
