use super::error::HandleError;
use crate::repository::lookup::LookupService;
use sonde_proto::buffer::{BytePacketBuffer, UDP_PACKET_SIZE};
use sonde_proto::packet::header::{Header, OPCODE_QUERY};
use sonde_proto::packet::record::Record;
use sonde_proto::packet::DnsPacket;
use sonde_resolver::transport::EDNS_PAYLOAD_SIZE;
use sonde_server::prelude::Message;
use std::sync::Arc;

pub(crate) struct DnsHandler {
    lookup: Arc<dyn LookupService + Sync + Send>,
}

impl DnsHandler {
    pub fn new(lookup: Arc<dyn LookupService + Sync + Send>) -> Self {
        Self { lookup }
    }
}

impl DnsHandler {
    async fn try_handle(&self, request: &DnsPacket) -> Result<DnsPacket, HandleError> {
        if request.header.opcode != OPCODE_QUERY {
            return Err(HandleError::UnsupportedOpcode(request.header.opcode));
        }
        let question = request.question().ok_or(HandleError::NoQuestion)?;
        tracing::debug!("query: {} {}", question.name, question.qtype);

        let result = self
            .lookup
            .lookup(question.name.as_str(), question.qtype)
            .await?;

        let mut response = DnsPacket::response_from(request);
        response.header.recursion_available = true;
        response.header.truncated_message = result.message.header.truncated_message;
        response.header.response_code = result.message.header.response_code;
        response.answers = result.message.answers;
        response.authorities = result.message.authorities;

        Ok(response)
    }

    fn failure(request: &DnsPacket, error: &HandleError) -> DnsPacket {
        let mut response = DnsPacket::response_from(request);
        response.header.recursion_available = true;
        response.header.response_code = error.response_code();
        response
    }

    /// Encodes the response within the size the client accepts, dropping
    /// every record and setting the truncation bit when it does not fit.
    fn encode(request: &DnsPacket, mut response: DnsPacket) -> Result<Vec<u8>, HandleError> {
        let limit = request
            .edns_payload_size()
            .map(|size| usize::from(size).max(UDP_PACKET_SIZE))
            .unwrap_or(UDP_PACKET_SIZE);
        if request.edns_payload_size().is_some() {
            response = response.with_edns(EDNS_PAYLOAD_SIZE, false);
        }

        let buffer = response.create_buffer()?;
        if buffer.len() <= limit {
            return Ok(buffer.into_inner());
        }

        tracing::debug!("response of {} bytes exceeds {limit}, truncating", buffer.len());
        response.header.truncated_message = true;
        response.answers.clear();
        response.authorities.clear();
        response
            .resources
            .retain(|record| matches!(record, Record::OPT { .. }));
        Ok(response.create_buffer()?.into_inner())
    }

    fn reply(request: &DnsPacket, response: DnsPacket) -> Option<Vec<u8>> {
        match Self::encode(request, response) {
            Ok(buffer) => Some(buffer),
            Err(error) => {
                tracing::warn!("unable to encode response: {error}");
                let fallback = Self::failure(request, &error);
                Self::encode(request, fallback).ok()
            }
        }
    }
}

#[async_trait::async_trait]
impl sonde_server::Handler for DnsHandler {
    #[tracing::instrument(skip_all, fields(origin = ?message.address))]
    async fn handle(&self, message: Message) -> Option<Message> {
        let Message { address, buffer } = message;

        let request = match DnsPacket::try_from(buffer.as_slice()) {
            Ok(request) => request,
            Err(error) => {
                // answer with FORMERR when at least the header is readable
                let header = Header::read(&mut BytePacketBuffer::new(buffer)).ok()?;
                if header.response {
                    return None;
                }
                let error = HandleError::from(error);
                tracing::debug!("{error}");
                let request = DnsPacket::new(header);
                let buffer = Self::reply(&request, Self::failure(&request, &error))?;
                return Some(Message { address, buffer });
            }
        };
        if request.header.response {
            tracing::debug!("ignoring response message");
            return None;
        }

        let response = match self.try_handle(&request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!("unable to answer: {error}");
                Self::failure(&request, &error)
            }
        };

        let buffer = Self::reply(&request, response)?;
        Some(Message { address, buffer })
    }
}
