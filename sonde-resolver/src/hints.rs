//! Compiled-in root server hints.
//!
//! They seed every top level resolution and form the permanent layer of the
//! cache: the records below never expire and are never evicted.

use sonde_proto::name::normalize_name;
use sonde_proto::packet::record::Record;
use sonde_proto::packet::QueryType;
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr};

/// TTL of the root hints, as published by IANA.
pub const ROOT_HINTS_TTL: u32 = 3_600_000;

#[derive(Clone, Copy, Debug)]
pub struct RootServer {
    pub name: &'static str,
    pub ipv4: Ipv4Addr,
    pub ipv6: Option<Ipv6Addr>,
}

impl RootServer {
    pub const fn new(name: &'static str, ipv4: Ipv4Addr, ipv6: Option<Ipv6Addr>) -> Self {
        Self { name, ipv4, ipv6 }
    }
}

#[rustfmt::skip]
pub static ROOT_SERVERS: [RootServer; 13] = [
    RootServer::new("a.root-servers.net", Ipv4Addr::new(198, 41, 0, 4), Some(Ipv6Addr::new(0x2001, 0x503, 0xba3e, 0, 0, 0, 0x2, 0x30))),
    RootServer::new("b.root-servers.net", Ipv4Addr::new(170, 247, 170, 2), Some(Ipv6Addr::new(0x2801, 0x1b8, 0x10, 0, 0, 0, 0, 0xb))),
    RootServer::new("c.root-servers.net", Ipv4Addr::new(192, 33, 4, 12), Some(Ipv6Addr::new(0x2001, 0x500, 0x2, 0, 0, 0, 0, 0xc))),
    RootServer::new("d.root-servers.net", Ipv4Addr::new(199, 7, 91, 13), Some(Ipv6Addr::new(0x2001, 0x500, 0x2d, 0, 0, 0, 0, 0xd))),
    RootServer::new("e.root-servers.net", Ipv4Addr::new(192, 203, 230, 10), Some(Ipv6Addr::new(0x2001, 0x500, 0xa8, 0, 0, 0, 0, 0xe))),
    RootServer::new("f.root-servers.net", Ipv4Addr::new(192, 5, 5, 241), Some(Ipv6Addr::new(0x2001, 0x500, 0x2f, 0, 0, 0, 0, 0xf))),
    RootServer::new("g.root-servers.net", Ipv4Addr::new(192, 112, 36, 4), Some(Ipv6Addr::new(0x2001, 0x500, 0x12, 0, 0, 0, 0, 0xd0d))),
    RootServer::new("h.root-servers.net", Ipv4Addr::new(198, 97, 190, 53), Some(Ipv6Addr::new(0x2001, 0x500, 0x1, 0, 0, 0, 0, 0x53))),
    RootServer::new("i.root-servers.net", Ipv4Addr::new(192, 36, 148, 17), Some(Ipv6Addr::new(0x2001, 0x7fe, 0, 0, 0, 0, 0, 0x53))),
    RootServer::new("j.root-servers.net", Ipv4Addr::new(192, 58, 128, 30), Some(Ipv6Addr::new(0x2001, 0x503, 0xc27, 0, 0, 0, 0x2, 0x30))),
    RootServer::new("k.root-servers.net", Ipv4Addr::new(193, 0, 14, 129), Some(Ipv6Addr::new(0x2001, 0x7fd, 0, 0, 0, 0, 0, 0x1))),
    RootServer::new("l.root-servers.net", Ipv4Addr::new(199, 7, 83, 42), Some(Ipv6Addr::new(0x2001, 0x500, 0x9f, 0, 0, 0, 0, 0x42))),
    RootServer::new("m.root-servers.net", Ipv4Addr::new(202, 12, 27, 33), Some(Ipv6Addr::new(0x2001, 0xdc3, 0, 0, 0, 0, 0, 0x35))),
];

/// Immutable root hint data, built once with the resolver and shared
/// read-only afterwards.
#[derive(Clone, Debug)]
pub struct RootHints {
    names: Vec<String>,
    records: HashMap<(String, QueryType), Vec<Record>>,
}

impl Default for RootHints {
    fn default() -> Self {
        Self::new(&ROOT_SERVERS)
    }
}

impl RootHints {
    pub fn new(servers: &[RootServer]) -> Self {
        let mut names = Vec::with_capacity(servers.len());
        let mut records: HashMap<(String, QueryType), Vec<Record>> = HashMap::new();

        for server in servers {
            let name = normalize_name(server.name);

            records
                .entry((String::new(), QueryType::NS))
                .or_default()
                .push(Record::NS {
                    domain: String::new(),
                    host: name.clone(),
                    ttl: ROOT_HINTS_TTL,
                });
            records
                .entry((name.clone(), QueryType::A))
                .or_default()
                .push(Record::A {
                    domain: name.clone(),
                    addr: server.ipv4,
                    ttl: ROOT_HINTS_TTL,
                });
            if let Some(addr) = server.ipv6 {
                records
                    .entry((name.clone(), QueryType::AAAA))
                    .or_default()
                    .push(Record::AAAA {
                        domain: name.clone(),
                        addr,
                        ttl: ROOT_HINTS_TTL,
                    });
            }

            names.push(name);
        }

        Self { names, records }
    }

    /// Names of the root nameservers, the candidate list of every new
    /// top level question.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn lookup(&self, name: &str, qtype: QueryType) -> Option<Vec<Record>> {
        self.records.get(&(name.to_string(), qtype)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::{RootHints, ROOT_HINTS_TTL};
    use sonde_proto::packet::record::Record;
    use sonde_proto::packet::QueryType;
    use std::net::Ipv4Addr;

    #[test]
    fn should_contain_thirteen_servers() {
        let hints = RootHints::default();
        assert_eq!(hints.names().len(), 13);
        assert_eq!(hints.names()[0], "a.root-servers.net");
        assert_eq!(hints.lookup("a.root-servers.net", QueryType::A).unwrap().len(), 1);
        assert_eq!(hints.lookup("m.root-servers.net", QueryType::AAAA).unwrap().len(), 1);
        assert_eq!(hints.lookup("", QueryType::NS).unwrap().len(), 13);
    }

    #[test]
    fn should_lookup_glue() {
        let hints = RootHints::default();
        let found = hints.lookup("k.root-servers.net", QueryType::A).unwrap();
        assert_eq!(
            found,
            vec![Record::A {
                domain: "k.root-servers.net".into(),
                addr: Ipv4Addr::new(193, 0, 14, 129),
                ttl: ROOT_HINTS_TTL,
            }]
        );
        assert!(hints.lookup("k.root-servers.net", QueryType::MX).is_none());
        assert!(hints.lookup("example.com", QueryType::A).is_none());
    }
}
