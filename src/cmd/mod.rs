pub mod lookup;

use clap::{Parser, Subcommand};
use sonde_resolver::prelude::{BuilderError, ResolverError};
use std::fmt::Display;
use std::path::PathBuf;

/// Iterative DNS resolver, asking the authoritative servers directly
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the configuration file
    #[arg(
        short,
        long,
        default_value = "/etc/sonde/sonde.toml",
        env = "CONFIG_PATH"
    )]
    config_path: PathBuf,
    #[command(subcommand)]
    inner: Commands,
}

impl Args {
    pub async fn run(self) -> Result<(), Error> {
        let config = crate::config::Config::load(&self.config_path)?;
        match self.inner {
            Commands::Dns(inner) => inner.run(config).await,
            Commands::Lookup(inner) => inner.run(config).await,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    Dns(crate::dns::Command),
    Lookup(lookup::Command),
}

#[derive(Debug)]
pub enum Error {
    Config(::config::ConfigError),
    Builder(BuilderError),
    Resolver(ResolverError),
    Io(std::io::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(inner) => write!(f, "invalid configuration: {inner}"),
            Self::Builder(inner) => write!(f, "unable to build resolver: {inner}"),
            Self::Resolver(inner) => write!(f, "unable to resolve: {inner}"),
            Self::Io(inner) => write!(f, "io error: {inner}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<::config::ConfigError> for Error {
    fn from(value: ::config::ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<BuilderError> for Error {
    fn from(value: BuilderError) -> Self {
        Self::Builder(value)
    }
}

impl From<ResolverError> for Error {
    fn from(value: ResolverError) -> Self {
        Self::Resolver(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
