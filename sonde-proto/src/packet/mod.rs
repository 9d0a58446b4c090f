pub mod header;
pub mod question;
pub mod record;

use crate::buffer::reader::ReaderError;
use crate::buffer::writer::WriterError;
use crate::buffer::BytePacketBuffer;
use std::fmt::Display;
use std::str::FromStr;

#[derive(PartialEq, Eq, Debug, Clone, Hash, Copy, PartialOrd, Ord)]
#[allow(clippy::upper_case_acronyms)]
pub enum QueryType {
    Unknown(u16),
    /// a host address
    A, // 1
    /// an authoritative name server
    NS, // 2
    /// the canonical name for an alias
    CNAME, // 5
    /// marks the start of a zone of authority
    SOA, // 6
    /// mail exchange
    MX, // 15
    AAAA, // 28
    /// EDNS0 pseudo type
    OPT, // 41
}

impl QueryType {
    pub fn into_num(self) -> u16 {
        match self {
            QueryType::Unknown(x) => x,
            QueryType::A => 1,
            QueryType::NS => 2,
            QueryType::CNAME => 5,
            QueryType::SOA => 6,
            QueryType::MX => 15,
            QueryType::AAAA => 28,
            QueryType::OPT => 41,
        }
    }

    pub fn from_num(num: u16) -> QueryType {
        match num {
            1 => QueryType::A,
            2 => QueryType::NS,
            5 => QueryType::CNAME,
            6 => QueryType::SOA,
            15 => QueryType::MX,
            28 => QueryType::AAAA,
            41 => QueryType::OPT,
            _ => QueryType::Unknown(num),
        }
    }
}

impl Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::NS => write!(f, "NS"),
            Self::CNAME => write!(f, "CNAME"),
            Self::SOA => write!(f, "SOA"),
            Self::MX => write!(f, "MX"),
            Self::AAAA => write!(f, "AAAA"),
            Self::OPT => write!(f, "OPT"),
            Self::Unknown(value) => write!(f, "TYPE{value}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidQueryType(pub String);

impl Display for InvalidQueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid query type {:?}", self.0)
    }
}

impl std::error::Error for InvalidQueryType {}

impl FromStr for QueryType {
    type Err = InvalidQueryType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "NS" => Ok(Self::NS),
            "CNAME" => Ok(Self::CNAME),
            "SOA" => Ok(Self::SOA),
            "MX" => Ok(Self::MX),
            "AAAA" => Ok(Self::AAAA),
            other => other
                .strip_prefix("TYPE")
                .and_then(|num| num.parse::<u16>().ok())
                .map(QueryType::from_num)
                .ok_or_else(|| InvalidQueryType(value.to_string())),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DnsPacket {
    pub header: header::Header,
    pub questions: Vec<question::Question>,
    pub answers: Vec<record::Record>,
    pub authorities: Vec<record::Record>,
    pub resources: Vec<record::Record>,
}

impl DnsPacket {
    pub fn response_from(request: &Self) -> Self {
        Self {
            header: header::Header::response_from(&request.header),
            questions: request.questions.clone(),
            ..Default::default()
        }
    }

    pub fn new(header: header::Header) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }

    pub fn with_question(mut self, question: question::Question) -> Self {
        self.questions.push(question);
        self
    }

    pub fn with_answer(mut self, record: record::Record) -> Self {
        self.answers.push(record);
        self
    }

    pub fn with_answers(mut self, records: Vec<record::Record>) -> Self {
        self.answers.extend(records);
        self
    }

    pub fn with_authority(mut self, record: record::Record) -> Self {
        self.authorities.push(record);
        self
    }

    pub fn with_resource(mut self, record: record::Record) -> Self {
        self.resources.push(record);
        self
    }

    /// Appends an EDNS0 OPT record advertising `payload_size`.
    pub fn with_edns(self, payload_size: u16, dnssec_ok: bool) -> Self {
        let flags = if dnssec_ok {
            record::EDNS_DNSSEC_OK
        } else {
            0
        };
        self.with_resource(record::Record::OPT {
            payload_size,
            flags,
            data: Vec::new(),
        })
    }

    pub fn question(&self) -> Option<&question::Question> {
        self.questions.first()
    }

    /// UDP payload size advertised through EDNS0, if any.
    pub fn edns_payload_size(&self) -> Option<u16> {
        self.resources.iter().find_map(|rec| match rec {
            record::Record::OPT { payload_size, .. } => Some(*payload_size),
            _ => None,
        })
    }
}

impl TryFrom<BytePacketBuffer> for DnsPacket {
    type Error = ReaderError;

    fn try_from(mut buffer: BytePacketBuffer) -> Result<Self, Self::Error> {
        let header = header::Header::read(&mut buffer)?;

        let question_count = buffer.read_u16()? as usize;
        let answer_count = buffer.read_u16()? as usize;
        let authority_count = buffer.read_u16()? as usize;
        let resource_count = buffer.read_u16()? as usize;

        // The counts are untrusted, the records themselves bound the allocation.
        let mut questions = Vec::with_capacity(question_count.min(16));
        for _ in 0..question_count {
            questions.push(question::Question::read(&mut buffer)?);
        }

        let mut answers = Vec::with_capacity(answer_count.min(64));
        for _ in 0..answer_count {
            answers.push(record::Record::read(&mut buffer)?);
        }

        let mut authorities = Vec::with_capacity(authority_count.min(64));
        for _ in 0..authority_count {
            authorities.push(record::Record::read(&mut buffer)?);
        }

        let mut resources = Vec::with_capacity(resource_count.min(64));
        for _ in 0..resource_count {
            resources.push(record::Record::read(&mut buffer)?);
        }

        Ok(DnsPacket {
            header,
            questions,
            answers,
            authorities,
            resources,
        })
    }
}

impl TryFrom<&[u8]> for DnsPacket {
    type Error = ReaderError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        DnsPacket::try_from(BytePacketBuffer::from(value))
    }
}

impl DnsPacket {
    pub fn create_buffer(&self) -> Result<BytePacketBuffer, WriterError> {
        let mut buffer = BytePacketBuffer::default();
        self.header.write(&mut buffer)?;

        buffer.write_u16(self.questions.len() as u16)?;
        buffer.write_u16(self.answers.len() as u16)?;
        buffer.write_u16(self.authorities.len() as u16)?;
        buffer.write_u16(self.resources.len() as u16)?;

        for question in &self.questions {
            question.write(&mut buffer)?;
        }
        for rec in &self.answers {
            rec.write(&mut buffer)?;
        }
        for rec in &self.authorities {
            rec.write(&mut buffer)?;
        }
        for rec in &self.resources {
            rec.write(&mut buffer)?;
        }

        Ok(buffer)
    }
}
