use super::QueryType;
use crate::buffer::reader::ReaderError;
use crate::buffer::writer::WriterError;
use crate::buffer::BytePacketBuffer;
use std::fmt::Display;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Bit of the OPT extended flags signalling DNSSEC support.
pub const EDNS_DNSSEC_OK: u32 = 1 << 15;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(clippy::upper_case_acronyms)]
pub enum Record {
    Unknown {
        domain: String,
        qtype: u16,
        ttl: u32,
        data: Vec<u8>,
    }, // 0
    A {
        domain: String,
        addr: Ipv4Addr,
        ttl: u32,
    }, // 1
    NS {
        domain: String,
        host: String,
        ttl: u32,
    }, // 2
    CNAME {
        domain: String,
        host: String,
        ttl: u32,
    }, // 5
    SOA {
        domain: String,
        mname: String,
        rname: String,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        minimum: u32,
        ttl: u32,
    }, // 6
    MX {
        domain: String,
        priority: u16,
        host: String,
        ttl: u32,
    }, // 15
    AAAA {
        domain: String,
        addr: Ipv6Addr,
        ttl: u32,
    }, // 28
    /// EDNS0 pseudo record, always owned by the root. The CLASS field holds the
    /// advertised UDP payload size and the TTL field the extended flags.
    OPT {
        payload_size: u16,
        flags: u32,
        data: Vec<u8>,
    }, // 41
}

impl Record {
    pub fn domain(&self) -> &str {
        match self {
            Self::A { domain, .. }
            | Self::AAAA { domain, .. }
            | Self::CNAME { domain, .. }
            | Self::MX { domain, .. }
            | Self::NS { domain, .. }
            | Self::SOA { domain, .. }
            | Self::Unknown { domain, .. } => domain,
            Self::OPT { .. } => "",
        }
    }

    pub fn query_type(&self) -> QueryType {
        match self {
            Self::A { .. } => QueryType::A,
            Self::AAAA { .. } => QueryType::AAAA,
            Self::CNAME { .. } => QueryType::CNAME,
            Self::MX { .. } => QueryType::MX,
            Self::NS { .. } => QueryType::NS,
            Self::SOA { .. } => QueryType::SOA,
            Self::OPT { .. } => QueryType::OPT,
            Self::Unknown { qtype, .. } => QueryType::from_num(*qtype),
        }
    }

    /// Time to live in seconds. The OPT pseudo record has none.
    pub fn ttl(&self) -> u32 {
        match self {
            Self::A { ttl, .. }
            | Self::AAAA { ttl, .. }
            | Self::CNAME { ttl, .. }
            | Self::MX { ttl, .. }
            | Self::NS { ttl, .. }
            | Self::SOA { ttl, .. }
            | Self::Unknown { ttl, .. } => *ttl,
            Self::OPT { .. } => 0,
        }
    }

    /// Copy of the record with its time to live replaced.
    pub fn with_ttl(&self, value: u32) -> Self {
        let mut res = self.clone();
        match &mut res {
            Self::A { ttl, .. }
            | Self::AAAA { ttl, .. }
            | Self::CNAME { ttl, .. }
            | Self::MX { ttl, .. }
            | Self::NS { ttl, .. }
            | Self::SOA { ttl, .. }
            | Self::Unknown { ttl, .. } => *ttl = value,
            Self::OPT { .. } => {}
        }
        res
    }

    pub fn read(buffer: &mut BytePacketBuffer) -> Result<Record, ReaderError> {
        // NAME a domain name to which this resource record pertains.
        let domain = buffer.read_qname()?;

        // TYPE two octets containing one of the RR type codes.
        let qtype_num = buffer.read_u16()?;
        let qtype = QueryType::from_num(qtype_num);

        // CLASS two octets which specify the class of the data in the RDATA field.
        let class = buffer.read_u16()?;

        // TTL a 32 bit unsigned integer that specifies the time interval (in seconds)
        // that the resource record may be cached before it should be discarded.
        // Zero values are interpreted to mean that the RR can only be used for
        // the transaction in progress, and should not be cached.
        let ttl = buffer.read_u32()?;

        // RDLENGTH an unsigned 16 bit integer that specifies the length in octets of the RDATA field.
        let data_len = buffer.read_u16()? as usize;
        let end = buffer.pos() + data_len;
        if end > buffer.len() {
            return Err(ReaderError::EndOfBuffer);
        }

        let record = match qtype {
            QueryType::A => {
                let raw_addr = buffer.read_u32()?;
                Record::A {
                    domain,
                    addr: Ipv4Addr::from(raw_addr),
                    ttl,
                }
            }
            QueryType::AAAA => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&buffer.read_bytes(16)?);
                Record::AAAA {
                    domain,
                    addr: Ipv6Addr::from(octets),
                    ttl,
                }
            }
            QueryType::NS => {
                let host = buffer.read_qname()?;
                Record::NS { domain, host, ttl }
            }
            QueryType::CNAME => {
                let host = buffer.read_qname()?;
                Record::CNAME { domain, host, ttl }
            }
            QueryType::SOA => {
                let mname = buffer.read_qname()?;
                let rname = buffer.read_qname()?;
                Record::SOA {
                    domain,
                    mname,
                    rname,
                    serial: buffer.read_u32()?,
                    refresh: buffer.read_u32()?,
                    retry: buffer.read_u32()?,
                    expire: buffer.read_u32()?,
                    minimum: buffer.read_u32()?,
                    ttl,
                }
            }
            QueryType::MX => {
                let priority = buffer.read_u16()?;
                let host = buffer.read_qname()?;
                Record::MX {
                    domain,
                    priority,
                    host,
                    ttl,
                }
            }
            QueryType::OPT => Record::OPT {
                payload_size: class,
                flags: ttl,
                data: buffer.read_bytes(data_len)?,
            },
            QueryType::Unknown(_) => Record::Unknown {
                domain,
                qtype: qtype_num,
                ttl,
                data: buffer.read_bytes(data_len)?,
            },
        };

        // The announced length wins over what the typed parsing consumed.
        buffer.seek(end)?;

        Ok(record)
    }

    pub fn write(&self, buffer: &mut BytePacketBuffer) -> Result<usize, WriterError> {
        let start_pos = buffer.pos();

        match *self {
            Record::A {
                ref domain,
                ref addr,
                ttl,
            } => {
                write_preamble(buffer, domain, QueryType::A, 1, ttl)?;
                buffer.write_u16(4)?;
                buffer.write_bytes(&addr.octets())?;
            }
            Record::NS {
                ref domain,
                ref host,
                ttl,
            } => {
                write_preamble(buffer, domain, QueryType::NS, 1, ttl)?;
                write_data(buffer, |buffer| buffer.write_qname(host))?;
            }
            Record::CNAME {
                ref domain,
                ref host,
                ttl,
            } => {
                write_preamble(buffer, domain, QueryType::CNAME, 1, ttl)?;
                write_data(buffer, |buffer| buffer.write_qname(host))?;
            }
            Record::SOA {
                ref domain,
                ref mname,
                ref rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
                ttl,
            } => {
                write_preamble(buffer, domain, QueryType::SOA, 1, ttl)?;
                write_data(buffer, |buffer| {
                    buffer.write_qname(mname)?;
                    buffer.write_qname(rname)?;
                    buffer.write_u32(serial)?;
                    buffer.write_u32(refresh)?;
                    buffer.write_u32(retry)?;
                    buffer.write_u32(expire)?;
                    buffer.write_u32(minimum)
                })?;
            }
            Record::MX {
                ref domain,
                priority,
                ref host,
                ttl,
            } => {
                write_preamble(buffer, domain, QueryType::MX, 1, ttl)?;
                write_data(buffer, |buffer| {
                    buffer.write_u16(priority)?;
                    buffer.write_qname(host)
                })?;
            }
            Record::AAAA {
                ref domain,
                ref addr,
                ttl,
            } => {
                write_preamble(buffer, domain, QueryType::AAAA, 1, ttl)?;
                buffer.write_u16(16)?;
                buffer.write_bytes(&addr.octets())?;
            }
            Record::OPT {
                payload_size,
                flags,
                ref data,
            } => {
                write_preamble(buffer, "", QueryType::OPT, payload_size, flags)?;
                write_data(buffer, |buffer| buffer.write_bytes(data))?;
            }
            Record::Unknown {
                ref domain,
                qtype,
                ttl,
                ref data,
            } => {
                write_preamble(buffer, domain, QueryType::Unknown(qtype), 1, ttl)?;
                write_data(buffer, |buffer| buffer.write_bytes(data))?;
            }
        }

        Ok(buffer.pos() - start_pos)
    }
}

fn write_preamble(
    buffer: &mut BytePacketBuffer,
    domain: &str,
    qtype: QueryType,
    class: u16,
    ttl: u32,
) -> Result<(), WriterError> {
    buffer.write_qname(domain)?;
    buffer.write_u16(qtype.into_num())?;
    buffer.write_u16(class)?;
    buffer.write_u32(ttl)
}

/// Writes RDLENGTH followed by the data, patching the length once known.
fn write_data<F>(buffer: &mut BytePacketBuffer, func: F) -> Result<(), WriterError>
where
    F: FnOnce(&mut BytePacketBuffer) -> Result<(), WriterError>,
{
    let pos = buffer.pos();
    buffer.write_u16(0)?;

    func(buffer)?;

    let size = buffer.pos() - (pos + 2);
    buffer.set_u16(pos, size as u16)
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let qtype = self.query_type();
        match self {
            Self::A { domain, addr, ttl } => write!(f, "{domain}.\t{ttl}\tIN\t{qtype}\t{addr}"),
            Self::AAAA { domain, addr, ttl } => {
                write!(f, "{domain}.\t{ttl}\tIN\t{qtype}\t{addr}")
            }
            Self::NS { domain, host, ttl } | Self::CNAME { domain, host, ttl } => {
                write!(f, "{domain}.\t{ttl}\tIN\t{qtype}\t{host}.")
            }
            Self::MX {
                domain,
                priority,
                host,
                ttl,
            } => write!(f, "{domain}.\t{ttl}\tIN\t{qtype}\t{priority} {host}."),
            Self::SOA {
                domain,
                mname,
                rname,
                serial,
                refresh,
                retry,
                expire,
                minimum,
                ttl,
            } => write!(
                f,
                "{domain}.\t{ttl}\tIN\t{qtype}\t{mname}. {rname}. {serial} {refresh} {retry} {expire} {minimum}"
            ),
            Self::OPT {
                payload_size,
                flags,
                ..
            } => write!(f, ".\tOPT\tudp={payload_size} flags={flags:#x}"),
            Self::Unknown {
                domain, ttl, data, ..
            } => write!(
                f,
                "{domain}.\t{ttl}\tIN\t{qtype}\t\\# {} bytes",
                data.len()
            ),
        }
    }
}
