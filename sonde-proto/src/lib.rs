pub mod buffer;
pub mod name;
pub mod packet;

pub use buffer::BytePacketBuffer;
pub use packet::DnsPacket;

#[cfg(test)]
mod tests {
    use crate::packet::header::{Header, ResponseCode};
    use crate::packet::question::Question;
    use crate::packet::record::Record;
    use crate::packet::{DnsPacket, QueryType};
    use similar_asserts::assert_eq;
    use std::net::Ipv4Addr;

    #[rustfmt::skip]
    const RESPONSE_PACKET: &[u8] = &[
        // header: id 38005, response, RD, RA, NOERROR, 1 question, 1 answer
        0x94, 0x75, 0x81, 0x80, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
        // question: google.com A IN
        0x06, b'g', b'o', b'o', b'g', b'l', b'e', 0x03, b'c', b'o', b'm', 0x00,
        0x00, 0x01, 0x00, 0x01,
        // answer: pointer to google.com, A IN, ttl 8, 172.217.20.206
        0xc0, 0x0c, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x08, 0x00, 0x04,
        0xac, 0xd9, 0x14, 0xce,
    ];

    #[test]
    fn should_read_response_packet() {
        let packet = DnsPacket::try_from(RESPONSE_PACKET).unwrap();
        assert_eq!(packet.header.id, 38005);
        assert!(packet.header.recursion_desired);
        assert!(packet.header.recursion_available);
        assert!(!packet.header.truncated_message);

        assert_eq!(packet.questions.len(), 1);
        assert_eq!(packet.questions[0].name, "google.com");
        assert_eq!(packet.questions[0].qtype, QueryType::A);

        assert_eq!(packet.answers.len(), 1);
        assert_eq!(
            packet.answers[0],
            Record::A {
                domain: String::from("google.com"),
                addr: Ipv4Addr::new(172, 217, 20, 206),
                ttl: 8
            }
        );

        assert!(packet.authorities.is_empty());
        assert!(packet.resources.is_empty());
    }

    #[test]
    fn should_write_referral_packet() {
        let mut header = Header::response(12);
        header.response_code = ResponseCode::NoError;
        let packet = DnsPacket::new(header)
            .with_question(Question::new("www.example.com".into(), QueryType::A))
            .with_authority(Record::NS {
                domain: "example.com".into(),
                host: "ns1.example.com".into(),
                ttl: 172800,
            })
            .with_resource(Record::A {
                domain: "ns1.example.com".into(),
                addr: Ipv4Addr::new(192, 0, 2, 53),
                ttl: 172800,
            })
            .with_edns(1232, false);

        let buffer = packet.create_buffer().unwrap();
        let decoded = DnsPacket::try_from(buffer.as_slice()).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.edns_payload_size(), Some(1232));
    }

    #[test]
    fn should_fail_on_truncated_packet() {
        assert!(DnsPacket::try_from(&RESPONSE_PACKET[..30]).is_err());
    }
}
