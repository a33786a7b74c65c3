use super::ResponseSink;
use async_trait::async_trait;
use dns_intercept_domain::{DnsRequest, DomainError, ResponseCode};

/// One link of the query processing chain.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    /// Handle a query, either by writing a reply to `sink` or by deferring
    /// to a later handler.
    ///
    /// `NoError` (and `NxDomain`) mean a reply was written. Codes for which
    /// [`ResponseCode::client_write`] is true mean nothing was written and
    /// the server must reply with that code itself.
    async fn serve(
        &self,
        request: &DnsRequest,
        sink: &mut dyn ResponseSink,
    ) -> Result<ResponseCode, DomainError>;
}
