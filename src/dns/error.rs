use sonde_proto::buffer::{ReaderError, WriterError};
use sonde_proto::packet::header::ResponseCode;
use sonde_resolver::prelude::ResolverError;
use std::fmt::Display;

#[derive(Debug)]
pub enum HandleError {
    Lookup(ResolverError),
    Writer(WriterError),
    Reader(ReaderError),
    NoQuestion,
    UnsupportedOpcode(u8),
}

impl HandleError {
    /// Response code reported to the client. Details stay in the logs.
    pub fn response_code(&self) -> ResponseCode {
        match self {
            Self::Reader(_) | Self::NoQuestion => ResponseCode::FormatError,
            Self::UnsupportedOpcode(_) => ResponseCode::NotImplemented,
            Self::Lookup(_) | Self::Writer(_) => ResponseCode::ServerFailure,
        }
    }
}

impl Display for HandleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lookup(inner) => write!(f, "lookup failed: {inner}"),
            Self::Writer(inner) => write!(f, "unable to write response: {inner}"),
            Self::Reader(inner) => write!(f, "unable to read request: {inner}"),
            Self::NoQuestion => write!(f, "request without question"),
            Self::UnsupportedOpcode(opcode) => write!(f, "unsupported opcode {opcode}"),
        }
    }
}

impl std::error::Error for HandleError {}

impl From<ResolverError> for HandleError {
    fn from(value: ResolverError) -> Self {
        Self::Lookup(value)
    }
}

impl From<WriterError> for HandleError {
    fn from(value: WriterError) -> Self {
        Self::Writer(value)
    }
}

impl From<ReaderError> for HandleError {
    fn from(value: ReaderError) -> Self {
        Self::Reader(value)
    }
}
