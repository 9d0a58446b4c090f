use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Listening side of the `dns` command.
#[derive(Debug, serde::Deserialize)]
pub struct Config {
    /// Interface to bind, every IPv4 interface by default.
    #[serde(default = "Config::any_interface")]
    pub host: IpAddr,
    #[serde(default = "Config::standard_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: Self::any_interface(),
            port: Self::standard_port(),
        }
    }
}

impl Config {
    fn any_interface() -> IpAddr {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    }

    fn standard_port() -> u16 {
        sonde_resolver::DEFAULT_PORT
    }

    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
