use clap::Args;
use sonde_server::UdpServer;
use std::sync::Arc;

pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod handler;

/// Starts the DNS server answering client queries through the resolver
#[derive(Args, Debug)]
pub struct Command;

impl Command {
    pub async fn run(&self, config: crate::config::Config) -> Result<(), crate::cmd::Error> {
        tracing::info!("preparing dns server");
        let resolver = Arc::new(config.resolver.build()?);
        let handler = handler::DnsHandler::new(resolver.clone());

        let server = UdpServer::bind(config.dns.address(), handler).await?;
        tokio::select! {
            result = server.run() => result?,
            _ = tokio::signal::ctrl_c() => tracing::info!("shutting down"),
        }

        resolver.shutdown().await;
        Ok(())
    }
}
