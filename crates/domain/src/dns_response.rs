use super::DnsRecord;
use std::fmt;

/// Outcome code reported by a handler in the processing chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    NoError,
    FormErr,
    ServFail,
    NxDomain,
    NotImp,
    Refused,
}

impl ResponseCode {
    /// Codes for which no reply reached the client, so the server has to
    /// write one itself.
    pub fn client_write(&self) -> bool {
        matches!(
            self,
            ResponseCode::ServFail
                | ResponseCode::Refused
                | ResponseCode::FormErr
                | ResponseCode::NotImp
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseCode::NoError => "NOERROR",
            ResponseCode::FormErr => "FORMERR",
            ResponseCode::ServFail => "SERVFAIL",
            ResponseCode::NxDomain => "NXDOMAIN",
            ResponseCode::NotImp => "NOTIMP",
            ResponseCode::Refused => "REFUSED",
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal reply produced locally. Header fields (id, question, opcode,
/// RD) are echoed from the request by whoever writes it to the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsResponse {
    pub response_code: ResponseCode,
    pub answers: Vec<DnsRecord>,
    pub authoritative: bool,
    pub recursion_available: bool,
}

impl DnsResponse {
    pub fn authoritative(answers: Vec<DnsRecord>) -> Self {
        Self {
            response_code: ResponseCode::NoError,
            answers,
            authoritative: true,
            recursion_available: false,
        }
    }

    /// Empty reply carrying only a response code.
    pub fn status(response_code: ResponseCode) -> Self {
        Self {
            response_code,
            answers: Vec::new(),
            authoritative: false,
            recursion_available: false,
        }
    }
}
