use super::{DnsClass, RecordType};
use std::net::IpAddr;
use std::sync::Arc;

/// One incoming question as seen by the policy engine.
#[derive(Debug, Clone)]
pub struct DnsRequest {
    /// Query name, fully qualified.
    pub domain: Arc<str>,
    pub class: DnsClass,
    pub record_type: RecordType,
    pub client_ip: IpAddr,
}

impl DnsRequest {
    pub fn new(
        domain: impl Into<Arc<str>>,
        class: DnsClass,
        record_type: RecordType,
        client_ip: IpAddr,
    ) -> Self {
        Self {
            domain: domain.into(),
            class,
            record_type,
            client_ip,
        }
    }
}
