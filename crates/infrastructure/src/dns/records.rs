use super::record_type_map::DnsClassMapper;
use dns_intercept_domain::{DnsRecord, DomainError, RecordData};
use hickory_proto::rr::rdata::{A, AAAA, PTR, TXT};
use hickory_proto::rr::{Name, RData, Record};

/// Converts a synthesized answer into a wire record.
pub fn to_hickory_record(record: &DnsRecord) -> Result<Record, DomainError> {
    let owner = parse_name(&record.owner)?;

    let rdata = match &record.data {
        RecordData::A(ip) => RData::A(A(*ip)),
        RecordData::Aaaa(ip) => RData::AAAA(AAAA(*ip)),
        RecordData::Ptr(target) => RData::PTR(PTR(parse_name(target)?)),
        RecordData::Txt(text) => RData::TXT(TXT::new(vec![text.to_string()])),
    };

    let mut wire = Record::from_rdata(owner, record.ttl, rdata);
    wire.set_dns_class(DnsClassMapper::to_hickory(record.class));
    Ok(wire)
}

fn parse_name(name: &str) -> Result<Name, DomainError> {
    Name::from_ascii(name).map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", name, e)))
}
