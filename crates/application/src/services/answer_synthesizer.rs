use dns_intercept_domain::zone::{to_fqdn, validate_name};
use dns_intercept_domain::{DnsRecord, Policy, RecordData, RecordType};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

/// Record-construction rule selected by the query type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisKind {
    AddressV4,
    AddressV6,
    Pointer,
    Text,
    Other,
}

type AnswerBuilder = fn(&str) -> Option<RecordData>;

impl SynthesisKind {
    fn builder(self) -> Option<AnswerBuilder> {
        match self {
            SynthesisKind::AddressV4 => Some(address_v4 as AnswerBuilder),
            SynthesisKind::AddressV6 => Some(address_v6 as AnswerBuilder),
            SynthesisKind::Pointer => Some(pointer as AnswerBuilder),
            SynthesisKind::Text => Some(text as AnswerBuilder),
            SynthesisKind::Other => None,
        }
    }
}

impl From<RecordType> for SynthesisKind {
    fn from(record_type: RecordType) -> Self {
        match record_type {
            RecordType::A => SynthesisKind::AddressV4,
            RecordType::AAAA => SynthesisKind::AddressV6,
            RecordType::PTR => SynthesisKind::Pointer,
            RecordType::TXT => SynthesisKind::Text,
            _ => SynthesisKind::Other,
        }
    }
}

fn address_v4(answer: &str) -> Option<RecordData> {
    answer.parse::<Ipv4Addr>().ok().map(RecordData::A)
}

fn address_v6(answer: &str) -> Option<RecordData> {
    answer.parse::<Ipv6Addr>().ok().map(RecordData::Aaaa)
}

fn pointer(answer: &str) -> Option<RecordData> {
    let target = to_fqdn(answer);
    validate_name(&target).ok()?;
    Some(RecordData::Ptr(Arc::from(target)))
}

fn text(answer: &str) -> Option<RecordData> {
    Some(RecordData::Txt(Arc::from(answer)))
}

pub struct AnswerSynthesizer;

impl AnswerSynthesizer {
    /// Builds one record per policy answer, in declared order, owned by
    /// `qname`.
    ///
    /// Returns `None` when the query type is not synthesizable, or when any
    /// answer cannot be expressed as that type (a wildcard policy holding a
    /// host name asked for A, say). Callers treat `None` as "this policy
    /// did not match".
    pub fn synthesize(
        policy: &Policy,
        qname: &Arc<str>,
        qtype: RecordType,
    ) -> Option<Vec<DnsRecord>> {
        let build = SynthesisKind::from(qtype).builder()?;

        let records = policy
            .answers()
            .iter()
            .map(|answer| {
                build(answer).map(|data| {
                    DnsRecord::new(Arc::clone(qname), policy.class(), policy.ttl(), data)
                })
            })
            .collect::<Option<Vec<_>>>()?;

        if records.is_empty() {
            None
        } else {
            Some(records)
        }
    }
}
