use super::QueryType;
use crate::buffer::reader::ReaderError;
use crate::buffer::writer::WriterError;
use crate::buffer::BytePacketBuffer;

/// Class of a question. Only `Internet` takes part in resolution, the others
/// are parsed so that such queries can be answered with an error.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(u16)]
pub enum DnsClass {
    #[default]
    Internet = 1,
    Csnet = 2,
    Chaos = 3,
    Hesiod = 4,
}

impl TryFrom<u16> for DnsClass {
    type Error = ReaderError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Internet),
            2 => Ok(Self::Csnet),
            3 => Ok(Self::Chaos),
            4 => Ok(Self::Hesiod),
            other => Err(ReaderError::InvalidClass(other)),
        }
    }
}

/// Entry of the question section. The name is kept in its stored form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: QueryType,
    pub qclass: DnsClass,
}

impl Question {
    pub fn new(name: String, qtype: QueryType) -> Self {
        Self {
            name,
            qtype,
            qclass: DnsClass::Internet,
        }
    }

    /// Whether `other` asks the same thing, ignoring the case of the name.
    pub fn matches(&self, other: &Question) -> bool {
        self.qtype == other.qtype
            && self.qclass == other.qclass
            && self.name.eq_ignore_ascii_case(&other.name)
    }

    pub fn read(buffer: &mut BytePacketBuffer) -> Result<Self, ReaderError> {
        let name = buffer.read_qname()?;
        let qtype = QueryType::from_num(buffer.read_u16()?);
        let qclass = DnsClass::try_from(buffer.read_u16()?)?;
        Ok(Self {
            name,
            qtype,
            qclass,
        })
    }

    pub fn write(&self, buffer: &mut BytePacketBuffer) -> Result<(), WriterError> {
        buffer.write_qname(&self.name)?;
        buffer.write_u16(self.qtype.into_num())?;
        buffer.write_u16(self.qclass as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::{DnsClass, Question};
    use crate::buffer::reader::ReaderError;
    use crate::buffer::BytePacketBuffer;
    use crate::packet::QueryType;

    #[test]
    fn should_reject_unknown_class() {
        let mut buffer = BytePacketBuffer::default();
        buffer.write_qname("example.com").unwrap();
        buffer.write_u16(1).unwrap();
        buffer.write_u16(255).unwrap();
        let mut buffer = BytePacketBuffer::new(buffer.into_inner());

        let err = Question::read(&mut buffer).unwrap_err();
        assert!(matches!(err, ReaderError::InvalidClass(255)));
    }

    #[test]
    fn should_match_ignoring_case() {
        let question = Question::new("example.com".into(), QueryType::A);
        assert!(question.matches(&Question::new("Example.COM".into(), QueryType::A)));
        assert!(!question.matches(&Question::new("example.com".into(), QueryType::AAAA)));

        let mut chaos = question.clone();
        chaos.qclass = DnsClass::Chaos;
        assert!(!question.matches(&chaos));
    }
}
