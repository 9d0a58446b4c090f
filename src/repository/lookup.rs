use sonde_proto::packet::QueryType;
use sonde_resolver::prelude::{Resolution, ResolverError};
use sonde_resolver::Resolver;

#[async_trait::async_trait]
pub trait LookupService {
    async fn lookup(&self, qname: &str, qtype: QueryType) -> Result<Resolution, ResolverError>;
}

#[async_trait::async_trait]
impl LookupService for Resolver {
    async fn lookup(&self, qname: &str, qtype: QueryType) -> Result<Resolution, ResolverError> {
        self.resolve(qname, qtype).await
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockLookupService {
    inner: std::collections::HashMap<(&'static str, QueryType), sonde_proto::packet::DnsPacket>,
}

#[cfg(test)]
impl MockLookupService {
    pub fn with_query(
        mut self,
        qname: &'static str,
        qtype: QueryType,
        packet: sonde_proto::packet::DnsPacket,
    ) -> Self {
        self.inner.insert((qname, qtype), packet);
        self
    }
}

#[cfg(test)]
#[async_trait::async_trait]
impl LookupService for MockLookupService {
    async fn lookup(&self, qname: &str, qtype: QueryType) -> Result<Resolution, ResolverError> {
        match self.inner.get(&(qname, qtype)) {
            Some(found) => Ok(Resolution {
                name: qname.to_string(),
                qtype,
                message: found.clone(),
                latency: std::time::Duration::from_millis(1),
                chain_truncated: false,
            }),
            None => Err(ResolverError::NameserversFailed {
                name: qname.to_string(),
                qtype,
            }),
        }
    }
}
