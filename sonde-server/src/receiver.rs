use crate::prelude::{Message, MAX_DATAGRAM_SIZE};
use async_stream::stream;
use futures_core::stream::Stream;
use std::io::ErrorKind;
use std::sync::Arc;
use tokio::net::UdpSocket;

#[derive(Debug)]
pub struct Receiver {
    socket: Arc<UdpSocket>,
}

impl Receiver {
    pub fn new(socket: Arc<UdpSocket>) -> Self {
        Self { socket }
    }

    async fn receive(&self) -> std::io::Result<Message> {
        let mut buffer = vec![0u8; MAX_DATAGRAM_SIZE];
        let (size, address) = self.socket.recv_from(&mut buffer).await?;
        buffer.truncate(size);
        Ok(Message { address, buffer })
    }

    pub fn into_stream(self) -> impl Stream<Item = Message> {
        stream! {
            loop {
                match self.receive().await {
                    Ok(message) => {
                        tracing::debug!("received message from {:?}", message.address);
                        yield message;
                    }
                    // an icmp error about an earlier reply, the socket is still usable
                    Err(error) if matches!(error.kind(), ErrorKind::ConnectionReset | ErrorKind::ConnectionRefused) => {
                        tracing::debug!("ignoring receive error: {error:?}");
                    }
                    Err(error) => {
                        tracing::error!("couldn't receive message: {error:?}");
                        break;
                    }
                }
            }
        }
    }
}
