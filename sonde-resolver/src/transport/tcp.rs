use super::{check_id, Transport, TransportError};
use sonde_proto::packet::DnsPacket;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// One query per connection, framed with the two bytes length prefix.
#[derive(Debug)]
pub struct TcpTransport {
    timeout: Option<Duration>,
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new(Some(super::DEFAULT_TCP_TIMEOUT))
    }
}

impl TcpTransport {
    /// Without timeout, the exchange is only bounded by the caller.
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    async fn execute(
        &self,
        request: &DnsPacket,
        address: SocketAddr,
    ) -> Result<DnsPacket, TransportError> {
        let buffer = request.create_buffer()?;

        let mut stream = TcpStream::connect(address).await?;
        stream.write_u16(buffer.len() as u16).await?;
        stream.write_all(buffer.as_slice()).await?;
        stream.flush().await?;

        let size = stream.read_u16().await? as usize;
        let mut data = vec![0u8; size];
        stream.read_exact(&mut data).await?;

        let reply = DnsPacket::try_from(data.as_slice())?;
        check_id(request, &reply)?;
        Ok(reply)
    }
}

#[async_trait::async_trait]
impl Transport for TcpTransport {
    #[tracing::instrument(skip(self, request))]
    async fn exchange(
        &self,
        request: &DnsPacket,
        address: SocketAddr,
    ) -> Result<DnsPacket, TransportError> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.execute(request, address)).await?,
            None => self.execute(request, address).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TcpTransport;
    use crate::transport::tests::{answer, query};
    use crate::transport::{Transport, TransportError};
    use sonde_proto::packet::DnsPacket;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn should_reject_mismatched_id() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let size = stream.read_u16().await.unwrap() as usize;
            let mut buf = vec![0u8; size];
            stream.read_exact(&mut buf).await.unwrap();
            let request = DnsPacket::try_from(buf.as_slice()).unwrap();
            let mut reply = answer(&request, false);
            reply.header.id = 99;
            let reply = reply.create_buffer().unwrap();
            stream.write_u16(reply.len() as u16).await.unwrap();
            stream.write_all(reply.as_slice()).await.unwrap();
        });

        let transport = TcpTransport::new(Some(Duration::from_secs(1)));
        let err = transport.exchange(&query(3), address).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::IdMismatch {
                expected: 3,
                received: 99
            }
        ));
    }
}
