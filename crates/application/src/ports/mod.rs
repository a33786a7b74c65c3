mod dns_handler;
mod response_sink;

pub use dns_handler::DnsHandler;
pub use response_sink::ResponseSink;
