use crate::ports::{DnsHandler, ResponseSink};
use async_trait::async_trait;
use dns_intercept_domain::{DnsRequest, DnsResponse, DomainError, ResponseCode};
use tracing::debug;

/// End of the chain: reports a fixed status for queries nobody answered.
///
/// Codes the server writes on its own (SERVFAIL, REFUSED) are only
/// returned; anything else is written here first.
pub struct TerminalHandler {
    code: ResponseCode,
}

impl TerminalHandler {
    pub fn new(code: ResponseCode) -> Self {
        Self { code }
    }

    pub fn code(&self) -> ResponseCode {
        self.code
    }
}

#[async_trait]
impl DnsHandler for TerminalHandler {
    async fn serve(
        &self,
        request: &DnsRequest,
        sink: &mut dyn ResponseSink,
    ) -> Result<ResponseCode, DomainError> {
        debug!(domain = %request.domain, code = %self.code, "No handler answered query");

        if !self.code.client_write() {
            sink.write(DnsResponse::status(self.code)).await?;
        }
        Ok(self.code)
    }
}
