pub mod cache;
pub mod hints;
mod iterative;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod prelude;
pub mod stack;
pub mod transport;

use cache::Cache;
use hints::RootHints;
use prelude::{BuilderError, Resolution, ResolverError};
use sonde_proto::name::normalize_name;
use sonde_proto::packet::header::Header;
use sonde_proto::packet::question::Question;
use sonde_proto::packet::record::Record;
use sonde_proto::packet::{DnsPacket, QueryType};
use stack::StackPool;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use transport::Transport;

/// Number of aliases followed before the chase gives up.
pub const MAX_CNAME_HOPS: usize = 10;

pub const DEFAULT_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_PORT: u16 = 53;
/// Frames allowed on the stack of one resolution.
pub const DEFAULT_MAX_DEPTH: usize = 24;
pub const DEFAULT_STACK_POOL_SIZE: usize = 64;

#[derive(Debug)]
pub struct ResolverBuilder {
    transport: Option<Arc<dyn Transport>>,
    hints: RootHints,
    cache_size: u64,
    port: u16,
    max_depth: usize,
    stack_pool_size: usize,
    ipv6: bool,
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self {
            transport: None,
            hints: RootHints::default(),
            cache_size: DEFAULT_CACHE_SIZE,
            port: DEFAULT_PORT,
            max_depth: DEFAULT_MAX_DEPTH,
            stack_pool_size: DEFAULT_STACK_POOL_SIZE,
            ipv6: true,
        }
    }
}

impl ResolverBuilder {
    pub fn with_transport(mut self, value: Arc<dyn Transport>) -> Self {
        self.transport = Some(value);
        self
    }

    pub fn with_root_hints(mut self, value: RootHints) -> Self {
        self.hints = value;
        self
    }

    pub fn with_cache_size(mut self, value: u64) -> Self {
        self.cache_size = value;
        self
    }

    /// Port the nameservers are queried on.
    pub fn with_port(mut self, value: u16) -> Self {
        self.port = value;
        self
    }

    pub fn with_max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    pub fn with_stack_pool_size(mut self, value: usize) -> Self {
        self.stack_pool_size = value;
        self
    }

    /// Whether nameservers are also looked up and queried over IPv6.
    pub fn with_ipv6(mut self, value: bool) -> Self {
        self.ipv6 = value;
        self
    }

    pub fn build(self) -> Result<Resolver, BuilderError> {
        let transport = self.transport.ok_or(BuilderError::NoTransport)?;
        let hints = Arc::new(self.hints);
        Ok(Resolver {
            transport,
            cache: Cache::new(self.cache_size, hints.clone()),
            hints,
            pool: StackPool::new(self.stack_pool_size),
            port: self.port,
            max_depth: self.max_depth,
            ipv6: self.ipv6,
        })
    }
}

/// Iterative resolver walking the hierarchy from the root hints down.
///
/// One instance is meant to be shared by every concurrent caller: the cache
/// and the pool of stacks are the only shared state.
#[derive(Debug)]
pub struct Resolver {
    transport: Arc<dyn Transport>,
    cache: Cache,
    hints: Arc<RootHints>,
    pool: StackPool,
    port: u16,
    max_depth: usize,
    ipv6: bool,
}

impl Resolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::default()
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Resolves the name, following CNAME records unless the CNAME itself
    /// is asked for.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, name: &str, qtype: QueryType) -> Result<Resolution, ResolverError> {
        let start = Instant::now();
        let name = validate_name(name)?;

        let mut chain: Vec<Record> = Vec::new();
        let mut visited: HashSet<String> = HashSet::from([name.clone()]);
        let mut current = name.clone();
        let mut chain_truncated = false;

        let last = loop {
            let reply = self.iterative_resolve(&current, qtype).await?;
            if qtype == QueryType::CNAME {
                break reply;
            }
            let Some(alias) = find_alias(&reply, &current) else {
                break reply;
            };
            let Record::CNAME { host: target, .. } = &alias else {
                break reply;
            };
            if chain.len() >= MAX_CNAME_HOPS {
                tracing::warn!("stopped following aliases after {MAX_CNAME_HOPS} hops");
                chain_truncated = true;
                break reply;
            }
            if !visited.insert(target.clone()) {
                tracing::warn!("alias loop on {target:?}");
                chain_truncated = true;
                break reply;
            }
            tracing::debug!("following alias {current:?} to {target:?}");
            current = target.clone();
            chain.push(alias);
        };

        let mut header = Header::response(rand::random());
        header.recursion_available = true;
        header.truncated_message = last.header.truncated_message;
        header.response_code = last.header.response_code;

        chain.extend(last.answers);
        let message = DnsPacket {
            header,
            questions: vec![Question::new(name.clone(), qtype)],
            answers: chain,
            authorities: last.authorities,
            resources: Vec::new(),
        };

        let latency = start.elapsed();
        tracing::debug!(
            "resolved with {} in {latency:?}",
            message.header.response_code
        );
        Ok(Resolution {
            name,
            qtype,
            message,
            latency,
            chain_truncated,
        })
    }

    /// Same as [`Resolver::resolve`], giving up once `deadline` elapsed.
    /// Any exchange in flight at that moment is aborted.
    pub async fn resolve_within(
        &self,
        name: &str,
        qtype: QueryType,
        deadline: Duration,
    ) -> Result<Resolution, ResolverError> {
        tokio::time::timeout(deadline, self.resolve(name, qtype))
            .await
            .map_err(|_| ResolverError::Timeout)?
    }

    /// Releases the cached records. The root hints stay available.
    pub async fn shutdown(&self) {
        self.cache.clear();
        self.cache.run_pending_tasks().await;
    }
}

fn find_alias(reply: &DnsPacket, name: &str) -> Option<Record> {
    reply
        .answers
        .iter()
        .find(|record| matches!(record, Record::CNAME { domain, .. } if domain == name))
        .cloned()
}

fn validate_name(name: &str) -> Result<String, ResolverError> {
    let normalized = normalize_name(name);
    let valid = normalized.len() <= 253
        && (normalized.is_empty()
            || normalized
                .split('.')
                .all(|label| !label.is_empty() && label.len() <= 63));
    if valid {
        Ok(normalized)
    } else {
        Err(ResolverError::InvalidName(name.to_string()))
    }
}
