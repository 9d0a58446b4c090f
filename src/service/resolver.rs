use sonde_resolver::prelude::BuilderError;
use sonde_resolver::transport::{TcpTransport, UdpTcpTransport, UdpTransport};
use sonde_resolver::Resolver;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    /// Number of record sets kept in cache
    #[serde(default = "Config::default_cache_size")]
    pub cache_size: u64,
    /// Port the nameservers are queried on
    #[serde(default = "Config::default_port")]
    pub port: u16,
    #[serde(default = "Config::default_udp_timeout_ms")]
    pub udp_timeout_ms: u64,
    #[serde(default = "Config::default_tcp_timeout_ms")]
    pub tcp_timeout_ms: u64,
    #[serde(default = "Config::default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "Config::default_stack_pool_size")]
    pub stack_pool_size: usize,
    #[serde(default = "Config::default_ipv6")]
    pub ipv6: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_size: Self::default_cache_size(),
            port: Self::default_port(),
            udp_timeout_ms: Self::default_udp_timeout_ms(),
            tcp_timeout_ms: Self::default_tcp_timeout_ms(),
            max_depth: Self::default_max_depth(),
            stack_pool_size: Self::default_stack_pool_size(),
            ipv6: Self::default_ipv6(),
        }
    }
}

impl Config {
    pub fn default_cache_size() -> u64 {
        sonde_resolver::DEFAULT_CACHE_SIZE
    }

    pub fn default_port() -> u16 {
        sonde_resolver::DEFAULT_PORT
    }

    pub fn default_udp_timeout_ms() -> u64 {
        2000
    }

    pub fn default_tcp_timeout_ms() -> u64 {
        5000
    }

    pub fn default_max_depth() -> usize {
        sonde_resolver::DEFAULT_MAX_DEPTH
    }

    pub fn default_stack_pool_size() -> usize {
        sonde_resolver::DEFAULT_STACK_POOL_SIZE
    }

    pub fn default_ipv6() -> bool {
        true
    }
}

impl Config {
    pub fn build(self) -> Result<Resolver, BuilderError> {
        let transport = UdpTcpTransport::new(
            UdpTransport::new(Duration::from_millis(self.udp_timeout_ms)),
            TcpTransport::new(Some(Duration::from_millis(self.tcp_timeout_ms))),
        );
        Resolver::builder()
            .with_transport(Arc::new(transport))
            .with_cache_size(self.cache_size)
            .with_port(self.port)
            .with_max_depth(self.max_depth)
            .with_stack_pool_size(self.stack_pool_size)
            .with_ipv6(self.ipv6)
            .build()
    }
}
