use super::record_type_map::ResponseCodeMapper;
use super::records::to_hickory_record;
use async_trait::async_trait;
use dns_intercept_application::ports::ResponseSink;
use dns_intercept_domain::{DnsResponse, DomainError};
use hickory_proto::op::Header;
use hickory_proto::rr::Record;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, ResponseHandler, ResponseInfo};
use tracing::debug;

/// What happened to the reply slot of one request.
pub enum SinkState {
    Unwritten,
    Written(ResponseInfo),
    /// A write was attempted and the transport rejected it.
    Failed,
}

/// Writes domain responses to a hickory connection, echoing the request's
/// id, question, opcode and RD bit.
pub struct HickoryResponseSink<'a, R: ResponseHandler> {
    request: &'a Request,
    handle: &'a mut R,
    state: SinkState,
}

impl<'a, R: ResponseHandler> HickoryResponseSink<'a, R> {
    pub fn new(request: &'a Request, handle: &'a mut R) -> Self {
        Self {
            request,
            handle,
            state: SinkState::Unwritten,
        }
    }

    pub fn finish(self) -> SinkState {
        self.state
    }
}

#[async_trait]
impl<'a, R: ResponseHandler> ResponseSink for HickoryResponseSink<'a, R> {
    async fn write(&mut self, response: DnsResponse) -> Result<(), DomainError> {
        let answers = response
            .answers
            .iter()
            .map(to_hickory_record)
            .collect::<Result<Vec<Record>, _>>()?;

        let mut header = Header::response_from_request(self.request.header());
        header.set_response_code(ResponseCodeMapper::to_hickory(response.response_code));
        header.set_authoritative(response.authoritative);
        header.set_recursion_available(response.recursion_available);

        debug!(
            code = %response.response_code,
            answers = answers.len(),
            "Sending response"
        );

        let builder = MessageResponseBuilder::from_message_request(self.request);
        let message = builder.build(header, answers.iter(), &[], &[], &[]);

        match self.handle.send_response(message).await {
            Ok(info) => {
                self.state = SinkState::Written(info);
                Ok(())
            }
            Err(e) => {
                self.state = SinkState::Failed;
                Err(DomainError::IoError(e.to_string()))
            }
        }
    }
}
