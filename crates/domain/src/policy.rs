use crate::{DnsClass, DnsRequest, DomainError, NetworkTrie, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

pub const MIN_TTL: u32 = 1;
pub const MAX_TTL: u32 = 65535;
/// Longest payload of a single DNS character-string.
pub const MAX_TEXT_LEN: usize = 255;

/// Query types a policy answers for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTypes {
    /// `*` in the directive: any query type.
    Wildcard,
    Exact(Vec<RecordType>),
}

impl QueryTypes {
    pub fn single(record_type: RecordType) -> Self {
        QueryTypes::Exact(vec![record_type])
    }

    pub fn accepts(&self, record_type: RecordType) -> bool {
        match self {
            QueryTypes::Wildcard => true,
            QueryTypes::Exact(types) => types.contains(&record_type),
        }
    }

    fn contains(&self, record_type: RecordType) -> bool {
        matches!(self, QueryTypes::Exact(types) if types.contains(&record_type))
    }
}

/// One `record` line: class, type(s), answers, TTL and source filter.
///
/// Validated once on construction and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Policy {
    class: DnsClass,
    qtypes: QueryTypes,
    answers: Vec<Arc<str>>,
    ttl: u32,
    filter: NetworkTrie,
}

impl Policy {
    pub fn new(
        class: DnsClass,
        qtypes: QueryTypes,
        answers: Vec<Arc<str>>,
        ttl: u32,
        filter: NetworkTrie,
    ) -> Result<Self, DomainError> {
        if !(MIN_TTL..=MAX_TTL).contains(&ttl) {
            return Err(DomainError::InvalidPolicy(format!(
                "ttl {} outside {}..={}",
                ttl, MIN_TTL, MAX_TTL
            )));
        }
        if answers.is_empty() {
            return Err(DomainError::InvalidPolicy("no answers given".to_string()));
        }
        if let QueryTypes::Exact(types) = &qtypes {
            if types.is_empty() {
                return Err(DomainError::InvalidPolicy("no query type given".to_string()));
            }
        }

        for answer in &answers {
            if qtypes.contains(RecordType::A) && answer.parse::<Ipv4Addr>().is_err() {
                return Err(DomainError::InvalidIpAddress(format!(
                    "{} is not an IPv4 address",
                    answer
                )));
            }
            if qtypes.contains(RecordType::AAAA) && answer.parse::<Ipv6Addr>().is_err() {
                return Err(DomainError::InvalidIpAddress(format!(
                    "{} is not an IPv6 address",
                    answer
                )));
            }
            if qtypes.accepts(RecordType::TXT) && answer.len() > MAX_TEXT_LEN {
                return Err(DomainError::InvalidPolicy(format!(
                    "answer of {} bytes exceeds the {} byte TXT string limit",
                    answer.len(),
                    MAX_TEXT_LEN
                )));
            }
        }

        Ok(Self {
            class,
            qtypes,
            answers,
            ttl,
            filter,
        })
    }

    /// Class, type and source-network criteria all hold for `request`.
    pub fn matches(&self, request: &DnsRequest) -> bool {
        self.class == request.class
            && self.qtypes.accepts(request.record_type)
            && self.filter.contains(request.client_ip)
    }

    pub fn class(&self) -> DnsClass {
        self.class
    }

    pub fn qtypes(&self) -> &QueryTypes {
        &self.qtypes
    }

    pub fn answers(&self) -> &[Arc<str>] {
        &self.answers
    }

    pub fn ttl(&self) -> u32 {
        self.ttl
    }

    pub fn filter(&self) -> &NetworkTrie {
        &self.filter
    }
}
