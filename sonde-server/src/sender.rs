use crate::prelude::Message;
use std::sync::Arc;
use tokio::net::UdpSocket;

#[derive(Debug)]
pub struct Sender {
    socket: Arc<UdpSocket>,
}

impl Sender {
    pub fn new(socket: Arc<UdpSocket>) -> Self {
        Self { socket }
    }

    pub async fn send(&self, message: &Message) -> std::io::Result<()> {
        let Message { address, buffer } = message;
        tracing::debug!("sending {} bytes to {:?}", buffer.len(), address);
        self.socket.send_to(buffer, address).await?;
        Ok(())
    }
}
