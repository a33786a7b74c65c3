pub mod record_type_map;
pub mod records;
pub mod response_sink;
pub mod server;

pub use record_type_map::{DnsClassMapper, RecordTypeMapper, ResponseCodeMapper};
pub use response_sink::{HickoryResponseSink, SinkState};
pub use server::DnsServerHandler;
