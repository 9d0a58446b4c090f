#![allow(dead_code)]

use sonde_proto::packet::header::Header;
use sonde_proto::packet::question::Question;
use sonde_proto::packet::record::Record;
use sonde_proto::packet::{DnsPacket, QueryType};
use std::net::Ipv4Addr;

pub fn query_packet() -> DnsPacket {
    DnsPacket::new(Header::question(38005))
        .with_question(Question::new("www.example.com".into(), QueryType::A))
        .with_edns(1232, false)
}

pub fn referral_packet() -> DnsPacket {
    let mut packet = DnsPacket::new(Header::response(38005))
        .with_question(Question::new("www.example.com".into(), QueryType::A));
    for (idx, letter) in ["a", "b", "c", "d"].iter().enumerate() {
        let host = format!("{letter}.iana-servers.net");
        packet = packet
            .with_authority(Record::NS {
                domain: "example.com".into(),
                host: host.clone(),
                ttl: 172800,
            })
            .with_resource(Record::A {
                domain: host,
                addr: Ipv4Addr::new(199, 43, 135, idx as u8 + 53),
                ttl: 172800,
            });
    }
    packet
}
