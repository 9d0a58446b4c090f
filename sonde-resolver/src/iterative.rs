//! Delegation walk of a single question, driven by an explicit stack.

use crate::prelude::ResolverError;
use crate::stack::QueryState;
use crate::Resolver;
use rand::seq::SliceRandom;
use sonde_proto::name::is_subdomain;
use sonde_proto::packet::header::{Header, ResponseCode, OPCODE_QUERY};
use sonde_proto::packet::question::Question;
use sonde_proto::packet::record::Record;
use sonde_proto::packet::{DnsPacket, QueryType};
use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

impl Resolver {
    /// Walks from the root hints down to a reply for the question, without
    /// following aliases.
    pub(crate) async fn iterative_resolve(
        &self,
        name: &str,
        qtype: QueryType,
    ) -> Result<DnsPacket, ResolverError> {
        let mut stack = self.pool.acquire();
        stack.push(QueryState::new(name, qtype, self.hints.names().to_vec()));

        let mut last: Option<DnsPacket> = None;
        while let Some(top) = stack.top() {
            let (qname, qtype) = (top.name.clone(), top.qtype);
            let zone = top.zone.clone();
            let nested = top.nested;
            if top.is_exhausted() {
                tracing::debug!("no nameserver left for {qname:?} {qtype} in zone {zone:?}");
                return Err(ResolverError::Exhausted { name: qname, qtype });
            }

            if let Some(records) = self.cache.get(&qname, qtype).await {
                tracing::debug!("cache hit for {qname:?} {qtype}");
                last = Some(
                    synthetic_reply(&qname, qtype, ResponseCode::NoError).with_answers(records),
                );
                stack.pop();
                continue;
            }
            if let Some((rcode, soa)) = self.cache.get_negative(&qname, qtype).await {
                tracing::debug!("negative cache hit for {qname:?} {qtype}: {rcode}");
                last = Some(synthetic_reply(&qname, qtype, rcode).with_authority(soa));
                stack.pop();
                continue;
            }

            let Some(host) = stack
                .top()
                .and_then(QueryState::candidate)
                .map(str::to_string)
            else {
                return Err(ResolverError::Exhausted { name: qname, qtype });
            };

            let addresses = self.addresses_of(&host).await;
            if addresses.is_empty() {
                if nested || stack.is_pending(&host) {
                    tracing::debug!("no address for {host:?}, trying next nameserver");
                    if let Some(top) = stack.top_mut() {
                        top.advance();
                    }
                    continue;
                }
                let qtypes = self.address_types();
                if stack.len() + qtypes.len() > self.max_depth {
                    return Err(ResolverError::TooDeep {
                        depth: self.max_depth,
                    });
                }
                tracing::debug!("looking up address of {host:?}");
                stack.nest(&host, qtypes, self.hints.names());
                continue;
            }

            let reply = self.query_nameservers(&qname, qtype, addresses).await?;
            self.cache_reply(&qname, qtype, &zone, &reply).await;

            if let Some((child, nameservers)) = referral(&qname, &zone, &reply) {
                tracing::debug!("descending from {zone:?} to {child:?}");
                if let Some(top) = stack.top_mut() {
                    top.descend(child, nameservers);
                }
                continue;
            }
            if is_lame(&reply) {
                tracing::debug!("lame delegation from {host:?} for {qname:?}, trying next");
                if let Some(top) = stack.top_mut() {
                    top.advance();
                }
                continue;
            }

            last = Some(reply);
            stack.pop();
        }

        last.ok_or_else(|| ResolverError::Exhausted {
            name: name.to_string(),
            qtype,
        })
    }

    fn address_types(&self) -> &'static [QueryType] {
        if self.ipv6 {
            &[QueryType::A, QueryType::AAAA]
        } else {
            &[QueryType::A]
        }
    }

    /// Cached addresses of a nameserver, in every enabled family.
    async fn addresses_of(&self, host: &str) -> Vec<IpAddr> {
        let mut addresses = Vec::new();
        for qtype in self.address_types() {
            let Some(records) = self.cache.get(host, *qtype).await else {
                continue;
            };
            addresses.extend(records.iter().filter_map(|record| match record {
                Record::A { addr, .. } => Some(IpAddr::V4(*addr)),
                Record::AAAA { addr, .. } => Some(IpAddr::V6(*addr)),
                _ => None,
            }));
        }
        addresses
    }

    /// Asks the question to each address in random order until one gives a
    /// usable reply.
    async fn query_nameservers(
        &self,
        name: &str,
        qtype: QueryType,
        mut addresses: Vec<IpAddr>,
    ) -> Result<DnsPacket, ResolverError> {
        addresses.shuffle(&mut rand::thread_rng());
        let question = Question::new(name.to_string(), qtype);
        let request =
            DnsPacket::new(Header::question(rand::random())).with_question(question.clone());

        for ip in addresses {
            let address = SocketAddr::new(ip, self.port);
            match self.transport.exchange(&request, address).await {
                Ok(reply) if is_malformed(&question, &reply) => {
                    tracing::warn!("discarding malformed reply from {address}");
                }
                Ok(reply) => match reply.header.response_code {
                    ResponseCode::NoError | ResponseCode::NameError => return Ok(reply),
                    other => tracing::warn!("{address} replied {other} to {name:?} {qtype}"),
                },
                Err(err) => tracing::warn!("unable to query {address}: {err}"),
            }
        }

        Err(ResolverError::NameserversFailed {
            name: name.to_string(),
            qtype,
        })
    }

    /// Stores what the reply teaches about the question, and the in
    /// bailiwick delegation with its glue.
    async fn cache_reply(&self, name: &str, qtype: QueryType, zone: &str, reply: &DnsPacket) {
        let rcode = reply.header.response_code;
        let negative = rcode == ResponseCode::NameError
            || (rcode == ResponseCode::NoError && reply.answers.is_empty());
        let soa = reply
            .authorities
            .iter()
            .find(|record| {
                matches!(record, Record::SOA { domain, .. } if is_subdomain(name, domain))
            })
            .cloned();

        if negative && soa.is_some() {
            self.cache.put_negative(name, qtype, rcode, soa).await;
        } else if rcode == ResponseCode::NoError {
            self.cache.put(name, qtype, reply.answers.clone()).await;
        }

        let mut delegation = Vec::new();
        let mut targets = HashSet::new();
        for record in &reply.authorities {
            if let Record::NS { domain, host, .. } = record {
                if is_subdomain(name, domain) && is_subdomain(domain, zone) {
                    targets.insert(host.as_str());
                    delegation.push(record.clone());
                } else {
                    tracing::debug!("ignoring out of bailiwick delegation for {domain:?}");
                }
            }
        }
        if delegation.is_empty() {
            return;
        }
        delegation.extend(
            reply
                .resources
                .iter()
                .filter(|record| match record {
                    Record::A { domain, .. } | Record::AAAA { domain, .. } => {
                        targets.contains(domain.as_str()) && is_subdomain(domain, zone)
                    }
                    _ => false,
                })
                .cloned(),
        );
        self.cache.put_records(delegation).await;
    }
}

fn synthetic_reply(name: &str, qtype: QueryType, rcode: ResponseCode) -> DnsPacket {
    let mut header = Header::response(0);
    header.response_code = rcode;
    DnsPacket::new(header).with_question(Question::new(name.to_string(), qtype))
}

fn is_malformed(request: &Question, reply: &DnsPacket) -> bool {
    reply.header.truncated_message
        || reply.header.opcode != OPCODE_QUERY
        || !reply.header.response_code.is_defined()
        || reply.questions.is_empty()
        || !reply.questions.iter().any(|question| question.matches(request))
}

/// A delegation that does not lead any closer to the name: no answer, no
/// SOA, only nameservers for the current zone or one beside or above it.
fn is_lame(reply: &DnsPacket) -> bool {
    reply.header.response_code == ResponseCode::NoError
        && reply.answers.is_empty()
        && reply
            .authorities
            .iter()
            .any(|record| matches!(record, Record::NS { .. }))
        && !reply
            .authorities
            .iter()
            .any(|record| matches!(record, Record::SOA { .. }))
}

/// Zone and nameservers of the delegation carried by the reply, if it is a
/// referral to a zone strictly below `zone` that contains `name`.
fn referral(name: &str, zone: &str, reply: &DnsPacket) -> Option<(String, Vec<String>)> {
    if reply.header.response_code != ResponseCode::NoError || !reply.answers.is_empty() {
        return None;
    }
    let mut child: Option<&str> = None;
    let mut nameservers = Vec::new();
    for record in &reply.authorities {
        let Record::NS { domain, host, .. } = record else {
            continue;
        };
        if domain == zone || !is_subdomain(domain, zone) || !is_subdomain(name, domain) {
            continue;
        }
        match child {
            None => child = Some(domain),
            Some(found) if found != domain => continue,
            Some(_) => {}
        }
        nameservers.push(host.clone());
    }
    child.map(|child| (child.to_string(), nameservers))
}

#[cfg(test)]
mod tests {
    use super::{is_lame, is_malformed, referral};
    use crate::hints::{RootHints, RootServer};
    use crate::mock::{a, answer, negative, referral as delegate, MockTransport};
    use crate::prelude::ResolverError;
    use crate::tests::test_hints;
    use crate::Resolver;
    use similar_asserts::assert_eq;
    use sonde_proto::packet::header::ResponseCode;
    use sonde_proto::packet::question::Question;
    use sonde_proto::packet::record::Record;
    use sonde_proto::packet::QueryType;
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
    use std::sync::Arc;
    use std::time::Duration;

    const ROOT: Ipv4Addr = Ipv4Addr::new(198, 51, 100, 1);
    const COM: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 10);
    const EXAMPLE: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 53);

    fn build(transport: Arc<MockTransport>) -> Resolver {
        Resolver::builder()
            .with_transport(transport)
            .with_root_hints(test_hints())
            .with_ipv6(false)
            .build()
            .unwrap()
    }

    #[test]
    fn should_detect_malformed_replies() {
        let question = Question::new("example.com".into(), QueryType::A);
        let good = answer(vec![]).with_question(question.clone());
        assert!(!is_malformed(&question, &good));

        let mut truncated = good.clone();
        truncated.header.truncated_message = true;
        assert!(is_malformed(&question, &truncated));

        let mut opcode = good.clone();
        opcode.header.opcode = 2;
        assert!(is_malformed(&question, &opcode));

        let mut rcode = good.clone();
        rcode.header.response_code = ResponseCode::Unknown(9);
        assert!(is_malformed(&question, &rcode));

        let other = answer(vec![]).with_question(Question::new("example.org".into(), QueryType::A));
        assert!(is_malformed(&question, &other));
        let other = answer(vec![]).with_question(Question::new("example.com".into(), QueryType::MX));
        assert!(is_malformed(&question, &other));

        let mut empty = good;
        empty.questions.clear();
        assert!(is_malformed(&question, &empty));
    }

    #[test]
    fn should_detect_lame_delegation() {
        assert!(is_lame(&delegate("com", &[("a.gtld.test", None)])));
        assert!(!is_lame(&negative(ResponseCode::NoError, "com", 900)));
        assert!(!is_lame(&answer(vec![a("example.com", Ipv4Addr::new(192, 0, 2, 1), 300)])));
    }

    #[test]
    fn should_only_follow_referrals_below_current_zone() {
        let reply = delegate("com", &[("a.gtld.test", None), ("b.gtld.test", None)]);
        assert_eq!(
            referral("www.example.com", "", &reply),
            Some((
                "com".to_string(),
                vec!["a.gtld.test".to_string(), "b.gtld.test".to_string()]
            ))
        );
        // same level, sideways or upward
        assert_eq!(referral("www.example.com", "com", &reply), None);
        assert_eq!(referral("www.example.org", "", &reply), None);
        assert_eq!(referral("www.example.com", "example.com", &reply), None);
    }

    #[tokio::test]
    async fn should_descend_and_cache_glue() {
        let transport = Arc::new(
            MockTransport::default()
                .with_response(
                    ROOT,
                    "www.example.com",
                    QueryType::A,
                    delegate("com", &[("a.gtld.test", Some(COM))]),
                )
                .with_response(
                    COM,
                    "www.example.com",
                    QueryType::A,
                    delegate("example.com", &[("ns1.example.com", Some(EXAMPLE))]),
                )
                .with_response(
                    EXAMPLE,
                    "www.example.com",
                    QueryType::A,
                    answer(vec![a("www.example.com", Ipv4Addr::new(192, 0, 2, 80), 300)]),
                ),
        );
        let resolver = build(transport.clone());

        let reply = resolver
            .iterative_resolve("www.example.com", QueryType::A)
            .await
            .unwrap();
        assert_eq!(
            reply.answers,
            vec![a("www.example.com", Ipv4Addr::new(192, 0, 2, 80), 300)]
        );
        assert_eq!(
            transport
                .queries()
                .into_iter()
                .map(|(ip, _, _)| ip)
                .collect::<Vec<_>>(),
            vec![IpAddr::V4(ROOT), IpAddr::V4(COM), IpAddr::V4(EXAMPLE)]
        );

        let glue = resolver
            .cache()
            .get("ns1.example.com", QueryType::A)
            .await
            .unwrap();
        assert_eq!(glue.len(), 1);
        assert!(resolver
            .cache()
            .get("example.com", QueryType::NS)
            .await
            .is_some());

        // second time from the cache
        resolver
            .iterative_resolve("www.example.com", QueryType::A)
            .await
            .unwrap();
        assert_eq!(transport.queries().len(), 3);
    }

    #[tokio::test]
    async fn should_not_cache_out_of_bailiwick_delegation() {
        let mut reply = answer(vec![a("example.com", Ipv4Addr::new(192, 0, 2, 1), 300)]);
        reply = reply
            .with_authority(Record::NS {
                domain: "evil.test".into(),
                host: "ns.evil.test".into(),
                ttl: 86400,
            })
            .with_resource(a("ns.evil.test", Ipv4Addr::new(203, 0, 113, 66), 86400));
        let transport =
            Arc::new(MockTransport::default().with_response(ROOT, "example.com", QueryType::A, reply));
        let resolver = build(transport);

        resolver
            .iterative_resolve("example.com", QueryType::A)
            .await
            .unwrap();

        assert!(resolver
            .cache()
            .get("evil.test", QueryType::NS)
            .await
            .is_none());
        assert!(resolver
            .cache()
            .get("ns.evil.test", QueryType::A)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn should_cache_negative_answers() {
        let transport = Arc::new(MockTransport::default().with_response(
            ROOT,
            "nope.test",
            QueryType::A,
            negative(ResponseCode::NameError, "test", 900),
        ));
        let resolver = build(transport.clone());

        let reply = resolver
            .iterative_resolve("nope.test", QueryType::A)
            .await
            .unwrap();
        assert_eq!(reply.header.response_code, ResponseCode::NameError);

        let reply = resolver
            .iterative_resolve("nope.test", QueryType::A)
            .await
            .unwrap();
        assert_eq!(reply.header.response_code, ResponseCode::NameError);
        assert!(matches!(reply.authorities[0], Record::SOA { .. }));
        assert_eq!(transport.queries().len(), 1);
    }

    #[tokio::test]
    async fn should_look_up_nameserver_without_glue() {
        let transport = Arc::new(
            MockTransport::default()
                .with_response(
                    ROOT,
                    "www.example.com",
                    QueryType::A,
                    delegate("example.com", &[("ns.hosting.test", None)]),
                )
                .with_response(
                    ROOT,
                    "ns.hosting.test",
                    QueryType::A,
                    answer(vec![a("ns.hosting.test", EXAMPLE, 3600)]),
                )
                .with_response(
                    EXAMPLE,
                    "www.example.com",
                    QueryType::A,
                    answer(vec![a("www.example.com", Ipv4Addr::new(192, 0, 2, 80), 300)]),
                ),
        );
        let resolver = build(transport.clone());

        let reply = resolver
            .iterative_resolve("www.example.com", QueryType::A)
            .await
            .unwrap();
        assert_eq!(
            reply.answers,
            vec![a("www.example.com", Ipv4Addr::new(192, 0, 2, 80), 300)]
        );
        assert_eq!(
            transport
                .queries()
                .into_iter()
                .map(|(_, name, _)| name)
                .collect::<Vec<_>>(),
            vec!["www.example.com", "ns.hosting.test", "www.example.com"]
        );
    }

    #[tokio::test]
    async fn should_look_up_both_families_of_nameserver() {
        let transport = Arc::new(
            MockTransport::default()
                .with_response(
                    ROOT,
                    "www.example.com",
                    QueryType::A,
                    delegate("example.com", &[("ns.hosting.test", None)]),
                )
                .with_response(
                    ROOT,
                    "ns.hosting.test",
                    QueryType::A,
                    answer(vec![a("ns.hosting.test", EXAMPLE, 3600)]),
                )
                .with_response(
                    ROOT,
                    "ns.hosting.test",
                    QueryType::AAAA,
                    negative(ResponseCode::NoError, "hosting.test", 600),
                )
                .with_response(
                    EXAMPLE,
                    "www.example.com",
                    QueryType::A,
                    answer(vec![a("www.example.com", Ipv4Addr::new(192, 0, 2, 80), 300)]),
                ),
        );
        let resolver = Resolver::builder()
            .with_transport(transport.clone())
            .with_root_hints(test_hints())
            .build()
            .unwrap();

        resolver
            .iterative_resolve("www.example.com", QueryType::A)
            .await
            .unwrap();
        let asked: Vec<_> = transport
            .queries()
            .into_iter()
            .map(|(_, name, qtype)| (name, qtype))
            .collect();
        assert_eq!(
            asked,
            vec![
                ("www.example.com".to_string(), QueryType::A),
                ("ns.hosting.test".to_string(), QueryType::A),
                ("ns.hosting.test".to_string(), QueryType::AAAA),
                ("www.example.com".to_string(), QueryType::A),
            ]
        );
    }

    #[tokio::test]
    async fn should_advance_past_nameserver_without_address() {
        let transport = Arc::new(
            MockTransport::default()
                .with_response(
                    ROOT,
                    "www.example.com",
                    QueryType::A,
                    delegate(
                        "example.com",
                        &[("gone.hosting.test", None), ("ns.hosting.test", None)],
                    ),
                )
                .with_response(
                    ROOT,
                    "gone.hosting.test",
                    QueryType::A,
                    negative(ResponseCode::NameError, "hosting.test", 600),
                )
                .with_response(
                    ROOT,
                    "ns.hosting.test",
                    QueryType::A,
                    answer(vec![a("ns.hosting.test", EXAMPLE, 3600)]),
                )
                .with_response(
                    EXAMPLE,
                    "www.example.com",
                    QueryType::A,
                    answer(vec![a("www.example.com", Ipv4Addr::new(192, 0, 2, 80), 300)]),
                ),
        );
        let resolver = build(transport);

        let reply = resolver
            .iterative_resolve("www.example.com", QueryType::A)
            .await
            .unwrap();
        assert_eq!(reply.answers.len(), 1);
    }

    #[tokio::test]
    async fn should_exhaust_on_glue_cycle() {
        let transport = Arc::new(
            MockTransport::default()
                .with_response(
                    ROOT,
                    "www.example.com",
                    QueryType::A,
                    delegate("example.com", &[("ns1.example.com", None)]),
                )
                .with_response(
                    ROOT,
                    "ns1.example.com",
                    QueryType::A,
                    delegate("example.com", &[("ns1.example.com", None)]),
                ),
        );
        let resolver = build(transport);

        let err = resolver
            .iterative_resolve("www.example.com", QueryType::A)
            .await
            .unwrap_err();
        assert!(err.is_exhaustion(), "{err:?}");
    }

    #[tokio::test]
    async fn should_skip_lame_nameserver() {
        let com_b = Ipv4Addr::new(192, 0, 2, 11);
        let transport = Arc::new(
            MockTransport::default()
                .with_response(
                    ROOT,
                    "www.example.com",
                    QueryType::A,
                    delegate("com", &[("a.gtld.test", Some(COM)), ("b.gtld.test", Some(com_b))]),
                )
                .with_response(
                    COM,
                    "www.example.com",
                    QueryType::A,
                    delegate("com", &[("a.gtld.test", Some(COM))]),
                )
                .with_response(
                    com_b,
                    "www.example.com",
                    QueryType::A,
                    answer(vec![a("www.example.com", Ipv4Addr::new(192, 0, 2, 80), 300)]),
                ),
        );
        let resolver = build(transport.clone());

        let result = resolver.resolve("www.example.com", QueryType::A).await.unwrap();
        assert_eq!(
            result.message.answers,
            vec![a("www.example.com", Ipv4Addr::new(192, 0, 2, 80), 300)]
        );
        assert!(transport
            .queries()
            .iter()
            .any(|(ip, _, _)| *ip == IpAddr::V4(com_b)));
    }

    #[tokio::test]
    async fn should_exhaust_when_every_nameserver_is_lame() {
        let transport = Arc::new(
            MockTransport::default()
                .with_response(
                    ROOT,
                    "www.example.com",
                    QueryType::A,
                    delegate("com", &[("a.gtld.test", Some(COM))]),
                )
                .with_response(
                    COM,
                    "www.example.com",
                    QueryType::A,
                    delegate("", &[("a.root.test", None)]),
                ),
        );
        let resolver = build(transport);

        let err = resolver
            .iterative_resolve("www.example.com", QueryType::A)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolverError::Exhausted {
                name: "www.example.com".into(),
                qtype: QueryType::A,
            }
        );
    }

    #[tokio::test]
    async fn should_fail_when_every_nameserver_fails() {
        let resolver = build(Arc::new(MockTransport::default()));
        let err = resolver
            .iterative_resolve("example.com", QueryType::A)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ResolverError::NameserversFailed {
                name: "example.com".into(),
                qtype: QueryType::A,
            }
        );
    }

    #[tokio::test]
    async fn should_skip_refusing_address() {
        let mut refused = answer(vec![]);
        refused.header.response_code = ResponseCode::Refused;
        let root_v6: Ipv6Addr = "2001:db8::53".parse().unwrap();
        let hints = RootHints::new(&[RootServer::new("a.root.test", ROOT, Some(root_v6))]);
        let transport = Arc::new(
            MockTransport::default()
                .with_response(ROOT, "example.com", QueryType::A, refused)
                .with_response(
                    root_v6,
                    "example.com",
                    QueryType::A,
                    answer(vec![a("example.com", Ipv4Addr::new(192, 0, 2, 1), 300)]),
                ),
        );
        let resolver = Resolver::builder()
            .with_transport(transport.clone())
            .with_root_hints(hints)
            .build()
            .unwrap();

        let reply = resolver
            .iterative_resolve("example.com", QueryType::A)
            .await
            .unwrap();
        assert_eq!(reply.answers.len(), 1);
        assert!(transport
            .queries()
            .iter()
            .any(|(ip, _, _)| *ip == IpAddr::V6(root_v6)));
    }

    #[tokio::test]
    async fn should_abort_when_only_address_refuses() {
        let mut refused = answer(vec![]);
        refused.header.response_code = ResponseCode::Refused;
        let transport = Arc::new(MockTransport::default().with_response(
            ROOT,
            "example.com",
            QueryType::A,
            refused,
        ));
        let resolver = build(transport.clone());

        let err = resolver
            .iterative_resolve("example.com", QueryType::A)
            .await
            .unwrap_err();
        assert!(err.is_exhaustion());
        assert_eq!(transport.queries().len(), 1);
    }

    #[tokio::test]
    async fn should_fail_when_nesting_too_deep() {
        let transport = Arc::new(
            MockTransport::default()
                .with_response(
                    ROOT,
                    "www.example.com",
                    QueryType::A,
                    delegate("example.com", &[("ns.hosting.test", None)]),
                )
                .with_response(
                    ROOT,
                    "ns.hosting.test",
                    QueryType::A,
                    delegate("hosting.test", &[("ns.other.test", None)]),
                ),
        );
        let resolver = Resolver::builder()
            .with_transport(transport)
            .with_root_hints(test_hints())
            .with_ipv6(false)
            .with_max_depth(2)
            .build()
            .unwrap();

        let err = resolver
            .iterative_resolve("www.example.com", QueryType::A)
            .await
            .unwrap_err();
        assert_eq!(err, ResolverError::TooDeep { depth: 2 });
    }

    #[tokio::test(start_paused = true)]
    async fn should_give_up_at_deadline() {
        let transport = Arc::new(MockTransport::default().with_hanging(ROOT));
        let resolver = build(transport);

        let err = resolver
            .resolve_within("example.com", QueryType::A, Duration::from_secs(3))
            .await
            .unwrap_err();
        assert_eq!(err, ResolverError::Timeout);
        assert!(err.is_exhaustion());
    }
}
