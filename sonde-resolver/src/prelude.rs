use sonde_proto::packet::{DnsPacket, QueryType};
use std::fmt::Display;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolverError {
    /// Every candidate at one delegation level was tried without an answer
    /// or a further referral.
    Exhausted { name: String, qtype: QueryType },
    /// No candidate address produced a usable reply to the question.
    NameserversFailed { name: String, qtype: QueryType },
    /// Nested nameserver address lookups went deeper than allowed.
    TooDeep { depth: usize },
    /// The caller deadline elapsed.
    Timeout,
    InvalidName(String),
}

impl ResolverError {
    /// Whether the error means no nameserver provided an answer in time, as
    /// opposed to a nesting limit or a bad name.
    pub fn is_exhaustion(&self) -> bool {
        matches!(
            self,
            Self::Exhausted { .. } | Self::NameserversFailed { .. } | Self::Timeout
        )
    }
}

impl Display for ResolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted { name, qtype } => {
                write!(f, "no nameserver left to ask for {name:?} {qtype}")
            }
            Self::NameserversFailed { name, qtype } => {
                write!(f, "all nameservers failed for {name:?} {qtype}")
            }
            Self::TooDeep { depth } => write!(f, "resolution exceeded {depth} nested questions"),
            Self::Timeout => write!(f, "resolution timed out"),
            Self::InvalidName(name) => write!(f, "invalid name {name:?}"),
        }
    }
}

impl std::error::Error for ResolverError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuilderError {
    NoTransport,
}

impl Display for BuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTransport => write!(f, "no transport configured"),
        }
    }
}

impl std::error::Error for BuilderError {}

/// Outcome of a top level resolution.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub name: String,
    pub qtype: QueryType,
    pub message: DnsPacket,
    pub latency: Duration,
    /// The CNAME chase stopped on the hop limit or on a loop, the answer
    /// ends with an alias.
    pub chain_truncated: bool,
}
