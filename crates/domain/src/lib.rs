//! DNS Intercept Domain Layer
//!
//! Immutable policy data model (rules, policies, network tries), the
//! directive parser that compiles operator text into a [`RuleTable`], and
//! the TOML configuration that drives the server.
pub mod config;
pub mod directive;
pub mod dns_class;
pub mod dns_record;
pub mod dns_request;
pub mod dns_response;
pub mod errors;
pub mod network_trie;
pub mod policy;
pub mod rule;
pub mod zone;

pub use config::{CliOverrides, Config, ConfigError, FallthroughCode, InterceptConfig};
pub use directive::parse_directives;
pub use dns_class::DnsClass;
pub use dns_record::{DnsRecord, RecordData, RecordType};
pub use dns_request::DnsRequest;
pub use dns_response::{DnsResponse, ResponseCode};
pub use errors::DomainError;
pub use network_trie::NetworkTrie;
pub use policy::{Policy, QueryTypes};
pub use rule::{Rule, RuleTable};
