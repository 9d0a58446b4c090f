//! Scripted transport answering from a table keyed by server address, name
//! and type.

use crate::transport::{Transport, TransportError};
use sonde_proto::packet::header::{Header, ResponseCode};
use sonde_proto::packet::record::Record;
use sonde_proto::packet::{DnsPacket, QueryType};
use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MockTransport {
    responses: HashMap<(IpAddr, String, QueryType), DnsPacket>,
    hanging: HashSet<IpAddr>,
    queries: Mutex<Vec<(IpAddr, String, QueryType)>>,
}

impl MockTransport {
    pub fn with_response(
        mut self,
        address: impl Into<IpAddr>,
        name: &str,
        qtype: QueryType,
        reply: DnsPacket,
    ) -> Self {
        self.responses
            .insert((address.into(), name.to_string(), qtype), reply);
        self
    }

    /// Makes every exchange with `address` block forever.
    pub fn with_hanging(mut self, address: impl Into<IpAddr>) -> Self {
        self.hanging.insert(address.into());
        self
    }

    /// Every question received so far, in order.
    pub fn queries(&self) -> Vec<(IpAddr, String, QueryType)> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn exchange(
        &self,
        request: &DnsPacket,
        address: SocketAddr,
    ) -> Result<DnsPacket, TransportError> {
        let Some(question) = request.question() else {
            return Err(std::io::Error::from(std::io::ErrorKind::InvalidInput).into());
        };
        let key = (address.ip(), question.name.clone(), question.qtype);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(key.clone());
        }

        if self.hanging.contains(&address.ip()) {
            std::future::pending::<()>().await;
        }

        match self.responses.get(&key) {
            Some(found) => {
                let mut reply = found.clone();
                reply.header.id = request.header.id;
                reply.header.response = true;
                reply.questions = request.questions.clone();
                Ok(reply)
            }
            None => Err(std::io::Error::from(std::io::ErrorKind::ConnectionRefused).into()),
        }
    }
}

fn reply() -> DnsPacket {
    DnsPacket::new(Header::response(0))
}

/// Authoritative answer carrying `records`.
pub fn answer(records: Vec<Record>) -> DnsPacket {
    let mut packet = reply().with_answers(records);
    packet.header.authoritative_answer = true;
    packet
}

/// Delegation of `zone` to the given nameservers, with glue for those that
/// have an address.
pub fn referral(zone: &str, nameservers: &[(&str, Option<Ipv4Addr>)]) -> DnsPacket {
    let mut packet = reply();
    for (host, glue) in nameservers {
        packet = packet.with_authority(Record::NS {
            domain: zone.to_string(),
            host: host.to_string(),
            ttl: 172800,
        });
        if let Some(addr) = glue {
            packet = packet.with_resource(Record::A {
                domain: host.to_string(),
                addr: *addr,
                ttl: 172800,
            });
        }
    }
    packet
}

/// Negative answer with the zone SOA in the authority section.
pub fn negative(rcode: ResponseCode, zone: &str, ttl: u32) -> DnsPacket {
    let mut packet = reply().with_authority(soa(zone, ttl));
    packet.header.response_code = rcode;
    packet.header.authoritative_answer = true;
    packet
}

pub fn soa(zone: &str, ttl: u32) -> Record {
    Record::SOA {
        domain: zone.to_string(),
        mname: format!("ns1.{zone}"),
        rname: format!("hostmaster.{zone}"),
        serial: 2024010101,
        refresh: 7200,
        retry: 3600,
        expire: 1209600,
        minimum: ttl,
        ttl,
    }
}

pub fn a(domain: &str, addr: Ipv4Addr, ttl: u32) -> Record {
    Record::A {
        domain: domain.to_string(),
        addr,
        ttl,
    }
}

pub fn cname(domain: &str, host: &str, ttl: u32) -> Record {
    Record::CNAME {
        domain: domain.to_string(),
        host: host.to_string(),
        ttl,
    }
}
