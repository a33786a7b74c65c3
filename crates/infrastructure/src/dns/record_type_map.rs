//! Mapping between the domain's DNS vocabulary and `hickory_proto`'s.
//!
//! Types and classes go through their numeric code, so codes neither side
//! names still survive the trip as `Unknown`.

use dns_intercept_domain::{DnsClass, RecordType, ResponseCode};
use hickory_proto::op::ResponseCode as HickoryResponseCode;
use hickory_proto::rr::{DNSClass, RecordType as HickoryRecordType};

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn to_hickory(record_type: RecordType) -> HickoryRecordType {
        HickoryRecordType::from(record_type.to_u16())
    }

    pub fn from_hickory(hickory_type: HickoryRecordType) -> RecordType {
        RecordType::from(u16::from(hickory_type))
    }
}

pub struct DnsClassMapper;

impl DnsClassMapper {
    pub fn to_hickory(class: DnsClass) -> DNSClass {
        match class {
            DnsClass::IN => DNSClass::IN,
            DnsClass::CH => DNSClass::CH,
            DnsClass::HS => DNSClass::HS,
            DnsClass::NONE => DNSClass::NONE,
            DnsClass::ANY => DNSClass::ANY,
            DnsClass::Unknown(code) => DNSClass::Unknown(code),
        }
    }

    pub fn from_hickory(class: DNSClass) -> DnsClass {
        match class {
            DNSClass::IN => DnsClass::IN,
            DNSClass::CH => DnsClass::CH,
            DNSClass::HS => DnsClass::HS,
            DNSClass::NONE => DnsClass::NONE,
            DNSClass::ANY => DnsClass::ANY,
            other => DnsClass::from(u16::from(other)),
        }
    }
}

pub struct ResponseCodeMapper;

impl ResponseCodeMapper {
    pub fn to_hickory(code: ResponseCode) -> HickoryResponseCode {
        match code {
            ResponseCode::NoError => HickoryResponseCode::NoError,
            ResponseCode::FormErr => HickoryResponseCode::FormErr,
            ResponseCode::ServFail => HickoryResponseCode::ServFail,
            ResponseCode::NxDomain => HickoryResponseCode::NXDomain,
            ResponseCode::NotImp => HickoryResponseCode::NotImp,
            ResponseCode::Refused => HickoryResponseCode::Refused,
        }
    }
}
