use super::record_type_map::{DnsClassMapper, RecordTypeMapper, ResponseCodeMapper};
use super::response_sink::{HickoryResponseSink, SinkState};
use dns_intercept_application::ports::DnsHandler;
use dns_intercept_domain::zone::to_fqdn;
use dns_intercept_domain::{DnsRequest, DomainError, ResponseCode};
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Bridges hickory's server loop to the handler chain.
pub struct DnsServerHandler {
    handler: Arc<dyn DnsHandler>,
}

/// What the server still owes the client once the chain has returned.
enum FollowUp {
    /// A reply went out through the sink.
    Replied(ResponseInfo),
    /// Nothing was written; send an error reply with this code.
    ErrorReply(ResponseCode),
    /// The write failed at the transport. Never written twice.
    Abandon,
}

impl DnsServerHandler {
    pub fn new(handler: Arc<dyn DnsHandler>) -> Self {
        Self { handler }
    }

    /// Dual-stack sockets report IPv4 peers as `::ffff:a.b.c.d`.
    fn client_ip(request: &Request) -> IpAddr {
        match request.src().ip() {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(IpAddr::V6(v6)),
            ip => ip,
        }
    }
}

fn follow_up(domain: &str, outcome: Result<ResponseCode, DomainError>, state: SinkState) -> FollowUp {
    match (outcome, state) {
        (_, SinkState::Written(info)) => FollowUp::Replied(info),
        (Err(e), SinkState::Failed) => {
            error!(error = %e, domain = %domain, "Failed to write response");
            FollowUp::Abandon
        }
        (Ok(code), SinkState::Failed) => {
            warn!(domain = %domain, code = %code, "Handler ignored a failed write");
            FollowUp::Abandon
        }
        (Ok(code), SinkState::Unwritten) if code.client_write() => FollowUp::ErrorReply(code),
        (Ok(code), SinkState::Unwritten) => {
            warn!(domain = %domain, code = %code, "Handler reported success without replying");
            FollowUp::ErrorReply(ResponseCode::ServFail)
        }
        (Err(e), SinkState::Unwritten) => {
            error!(error = %e, domain = %domain, "Query handling failed");
            FollowUp::ErrorReply(ResponseCode::ServFail)
        }
    }
}

#[async_trait::async_trait]
impl RequestHandler for DnsServerHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let request_info = request.request_info();
        let query = request_info.query;
        // Owner names of synthesized answers keep the client's spelling.
        let domain = to_fqdn(&query.original().name().to_string());
        let client_ip = Self::client_ip(request);

        let record_type = RecordTypeMapper::from_hickory(query.query_type());
        let class = DnsClassMapper::from_hickory(query.query_class());

        debug!(domain = %domain, record_type = %record_type, class = %class, client = %client_ip, "DNS query received");

        let dns_request = DnsRequest::new(domain, class, record_type, client_ip);

        let mut sink = HickoryResponseSink::new(request, &mut response_handle);
        let outcome = self.handler.serve(&dns_request, &mut sink).await;
        let state = sink.finish();

        match follow_up(&dns_request.domain, outcome, state) {
            FollowUp::Replied(info) => info,
            FollowUp::ErrorReply(code) => {
                send_error_response(request, &mut response_handle, code).await
            }
            FollowUp::Abandon => ResponseInfo::from(*request.header()),
        }
    }
}

async fn send_error_response<R: ResponseHandler>(
    request: &Request,
    response_handle: &mut R,
    code: ResponseCode,
) -> ResponseInfo {
    debug!(code = %code, "Sending error response");
    let builder = MessageResponseBuilder::from_message_request(request);
    let response = builder.error_msg(request.header(), ResponseCodeMapper::to_hickory(code));

    match response_handle.send_response(response).await {
        Ok(info) => info,
        Err(e) => {
            error!(error = %e, "Failed to send error response");
            ResponseInfo::from(*request.header())
        }
    }
}
