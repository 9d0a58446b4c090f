use crate::hints::RootHints;
use moka::future::Cache as MokaCache;
use moka::Expiry;
use sonde_proto::packet::header::ResponseCode;
use sonde_proto::packet::record::Record;
use sonde_proto::packet::QueryType;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Positive and negative entries of a name live in separate namespaces, so
/// that one type can be resolved while another one is known not to exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Namespace {
    Positive,
    Negative,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    name: String,
    qtype: QueryType,
    namespace: Namespace,
}

impl CacheKey {
    fn positive(name: &str, qtype: QueryType) -> Self {
        Self {
            name: name.to_string(),
            qtype,
            namespace: Namespace::Positive,
        }
    }

    fn negative(name: &str, qtype: QueryType) -> Self {
        Self {
            name: name.to_string(),
            qtype,
            namespace: Namespace::Negative,
        }
    }
}

#[derive(Clone, Debug)]
pub enum CacheEntry {
    /// A record set sharing owner and type, valid for the smallest TTL of the set.
    Positive {
        records: Arc<[Record]>,
        valid_until: Instant,
    },
    /// NXDOMAIN or NODATA, valid for the TTL of the SOA record.
    Negative {
        rcode: ResponseCode,
        soa: Record,
        valid_until: Instant,
    },
}

impl CacheEntry {
    fn valid_until(&self) -> Instant {
        match self {
            Self::Positive { valid_until, .. } | Self::Negative { valid_until, .. } => *valid_until,
        }
    }

    fn time_to_live(&self, now: Instant) -> Duration {
        self.valid_until().saturating_duration_since(now)
    }

    /// Remaining lifetime in whole seconds, rounded up so that an entry
    /// stays visible until its very last instant.
    fn remaining_ttl(&self, now: Instant) -> u32 {
        let left = self.time_to_live(now);
        let secs = left.as_secs() + u64::from(left.subsec_nanos() > 0);
        secs.min(u32::MAX as u64) as u32
    }
}

struct EntryExpiry;

impl Expiry<CacheKey, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &CacheKey,
        value: &CacheEntry,
        created_at: Instant,
    ) -> Option<Duration> {
        Some(value.time_to_live(created_at))
    }

    fn expire_after_update(
        &self,
        _key: &CacheKey,
        value: &CacheEntry,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.time_to_live(updated_at))
    }
}

/// TTL aware record cache sitting on top of the root hints.
///
/// The general store is bounded in number of keys and uses the admission
/// policy of `moka`: under pressure a write may be declined, which only
/// costs a future cache miss.
#[derive(Clone, Debug)]
pub struct Cache {
    inner: MokaCache<CacheKey, CacheEntry>,
    hints: Arc<RootHints>,
}

impl Cache {
    pub fn new(capacity: u64, hints: Arc<RootHints>) -> Self {
        let inner = MokaCache::builder()
            .max_capacity(capacity)
            .expire_after(EntryExpiry)
            .build();
        Self { inner, hints }
    }

    /// Records for the given owner and type, with their TTL rewritten to the
    /// remaining lifetime of the entry.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, name: &str, qtype: QueryType) -> Option<Vec<Record>> {
        if let Some(found) = self.hints.lookup(name, qtype) {
            tracing::trace!("found in root hints");
            return Some(found);
        }

        let now = Instant::now();
        let Some(entry) = self.inner.get(&CacheKey::positive(name, qtype)).await else {
            tracing::trace!("not found in cache");
            return None;
        };
        let ttl = entry.remaining_ttl(now);
        if ttl == 0 {
            tracing::debug!("found in cache but expired");
            return None;
        }
        tracing::debug!("found in cache and valid for {ttl}s");
        match entry {
            CacheEntry::Positive { records, .. } => {
                Some(records.iter().map(|record| record.with_ttl(ttl)).collect())
            }
            CacheEntry::Negative { .. } => None,
        }
    }

    /// Stores a record set under the given owner and type. An empty set or a
    /// set with a zero TTL is not stored.
    pub async fn put(&self, name: &str, qtype: QueryType, records: Vec<Record>) {
        let Some(ttl) = records.iter().map(Record::ttl).min() else {
            return;
        };
        if ttl == 0 {
            tracing::trace!(name, %qtype, "not caching zero ttl record set");
            return;
        }
        let entry = CacheEntry::Positive {
            records: Arc::from(records),
            valid_until: Instant::now() + Duration::from_secs(u64::from(ttl)),
        };
        self.inner
            .insert(CacheKey::positive(name, qtype), entry)
            .await;
    }

    /// Stores a mixed batch of records, one entry per owner and type.
    pub async fn put_records(&self, records: Vec<Record>) {
        let mut groups: HashMap<(String, QueryType), Vec<Record>> = HashMap::new();
        for record in records {
            groups
                .entry((record.domain().to_string(), record.query_type()))
                .or_default()
                .push(record);
        }
        for ((name, qtype), group) in groups {
            self.put(&name, qtype, group).await;
        }
    }

    /// Remembers that the owner and type have no data, for the TTL of the
    /// SOA record. Without SOA nothing is stored.
    pub async fn put_negative(
        &self,
        name: &str,
        qtype: QueryType,
        rcode: ResponseCode,
        soa: Option<Record>,
    ) {
        let Some(soa) = soa else {
            return;
        };
        let ttl = soa.ttl();
        if ttl == 0 {
            return;
        }
        let entry = CacheEntry::Negative {
            rcode,
            soa,
            valid_until: Instant::now() + Duration::from_secs(u64::from(ttl)),
        };
        self.inner
            .insert(CacheKey::negative(name, qtype), entry)
            .await;
    }

    /// Cached negative answer, with the SOA TTL rewritten to the remaining
    /// lifetime of the entry.
    #[tracing::instrument(skip(self))]
    pub async fn get_negative(
        &self,
        name: &str,
        qtype: QueryType,
    ) -> Option<(ResponseCode, Record)> {
        let now = Instant::now();
        let entry = self.inner.get(&CacheKey::negative(name, qtype)).await?;
        let ttl = entry.remaining_ttl(now);
        if ttl == 0 {
            return None;
        }
        tracing::debug!("found negative entry valid for {ttl}s");
        match entry {
            CacheEntry::Negative { rcode, soa, .. } => Some((rcode, soa.with_ttl(ttl))),
            CacheEntry::Positive { .. } => None,
        }
    }

    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }

    /// Drops every entry of the general store. Root hints stay available.
    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}
