use futures::stream::StreamExt;
use prelude::Message;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;

pub mod prelude;
pub mod receiver;
pub mod sender;

/// Number of messages handled concurrently.
pub const CONCURRENCY: usize = 64;

#[async_trait::async_trait]
pub trait Handler {
    /// Builds the reply to a received message, `None` to stay silent.
    async fn handle(&self, message: Message) -> Option<Message>;
}

pub struct UdpServer<H> {
    socket: Arc<UdpSocket>,
    handler: H,
}

impl<H: Handler> UdpServer<H> {
    pub async fn bind(address: SocketAddr, handler: H) -> std::io::Result<Self> {
        let socket = UdpSocket::bind(address).await?;
        Ok(Self {
            socket: Arc::new(socket),
            handler,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub async fn run(&self) -> std::io::Result<()> {
        tracing::info!("listening on {:?}", self.socket.local_addr()?);
        let receiver = receiver::Receiver::new(self.socket.clone());
        let sender = sender::Sender::new(self.socket.clone());

        let stream = receiver
            .into_stream()
            .map(|item| async { self.handler.handle(item).await })
            .buffer_unordered(CONCURRENCY);

        tokio::pin!(stream);

        while let Some(item) = stream.next().await {
            let Some(item) = item else {
                continue;
            };
            if let Err(error) = sender.send(&item).await {
                tracing::error!("couldn't send message to {:?}: {error:?}", item.address);
            }
        }

        Ok(())
    }
}
