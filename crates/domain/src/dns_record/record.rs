use super::RecordType;
use crate::DnsClass;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// Payload of a synthesized answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordData {
    A(Ipv4Addr),
    Aaaa(Ipv6Addr),
    /// Fully-qualified target, always ending in a dot.
    Ptr(Arc<str>),
    /// A single character-string.
    Txt(Arc<str>),
}

impl RecordData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RecordData::A(_) => RecordType::A,
            RecordData::Aaaa(_) => RecordType::AAAA,
            RecordData::Ptr(_) => RecordType::PTR,
            RecordData::Txt(_) => RecordType::TXT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub owner: Arc<str>,

    pub class: DnsClass,

    pub ttl: u32,

    pub data: RecordData,
}

impl DnsRecord {
    pub fn new(owner: Arc<str>, class: DnsClass, ttl: u32, data: RecordData) -> Self {
        Self {
            owner,
            class,
            ttl,
            data,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }
}
