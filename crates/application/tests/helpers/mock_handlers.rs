use async_trait::async_trait;
use dns_intercept_application::ports::{DnsHandler, ResponseSink};
use dns_intercept_domain::{DnsRequest, DnsResponse, DomainError, ResponseCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Sink collecting every response written to it.
#[derive(Default)]
pub struct RecordingSink {
    pub written: Vec<DnsResponse>,
    pub should_fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            written: Vec::new(),
            should_fail: true,
        }
    }
}

#[async_trait]
impl ResponseSink for RecordingSink {
    async fn write(&mut self, response: DnsResponse) -> Result<(), DomainError> {
        if self.should_fail {
            return Err(DomainError::IoError("connection reset".to_string()));
        }
        self.written.push(response);
        Ok(())
    }
}

/// Stand-in for the rest of the chain. Remembers the requests it saw and
/// returns a fixed code without writing anything.
#[derive(Clone)]
pub struct MockNextHandler {
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<DnsRequest>>>,
    code: ResponseCode,
}

impl MockNextHandler {
    pub fn new() -> Self {
        Self::returning(ResponseCode::ServFail)
    }

    pub fn returning(code: ResponseCode) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
            code,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<DnsRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsHandler for MockNextHandler {
    async fn serve(
        &self,
        request: &DnsRequest,
        _sink: &mut dyn ResponseSink,
    ) -> Result<ResponseCode, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        Ok(self.code)
    }
}
