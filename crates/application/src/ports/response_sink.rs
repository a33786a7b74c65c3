use async_trait::async_trait;
use dns_intercept_domain::{DnsResponse, DomainError};

/// Destination of a reply for the query currently being served.
#[async_trait]
pub trait ResponseSink: Send {
    /// Write failures are returned as-is; callers must not retry.
    async fn write(&mut self, response: DnsResponse) -> Result<(), DomainError>;
}
