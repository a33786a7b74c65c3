use crate::ports::{DnsHandler, ResponseSink};
use crate::services::{AnswerSynthesizer, PolicyMatcher};
use async_trait::async_trait;
use dns_intercept_domain::{DnsRequest, DnsResponse, DomainError, ResponseCode, RuleTable};
use std::sync::Arc;
use tracing::{debug, trace};

/// Answers queries matching an intercept policy and passes everything else,
/// unchanged, to `next`.
pub struct InterceptQueryUseCase {
    matcher: PolicyMatcher,
    next: Arc<dyn DnsHandler>,
}

impl InterceptQueryUseCase {
    pub fn new(table: Arc<RuleTable>, next: Arc<dyn DnsHandler>) -> Self {
        Self {
            matcher: PolicyMatcher::new(table),
            next,
        }
    }

    /// Synthesized reply for `request`, or `None` when no policy both
    /// matches and can produce records for the query type.
    pub fn resolve(&self, request: &DnsRequest) -> Option<DnsResponse> {
        self.matcher.candidates(request).find_map(|candidate| {
            match AnswerSynthesizer::synthesize(
                candidate.policy,
                &request.domain,
                request.record_type,
            ) {
                Some(answers) => {
                    debug!(
                        domain = %request.domain,
                        record_type = %request.record_type,
                        client = %request.client_ip,
                        zone = %candidate.zone,
                        rule = candidate.rule_index,
                        policy = candidate.policy_index,
                        answers = answers.len(),
                        "Query intercepted"
                    );
                    Some(DnsResponse::authoritative(answers))
                }
                None => {
                    trace!(
                        domain = %request.domain,
                        record_type = %request.record_type,
                        rule = candidate.rule_index,
                        policy = candidate.policy_index,
                        "Policy matched but cannot synthesize this type"
                    );
                    None
                }
            }
        })
    }
}

#[async_trait]
impl DnsHandler for InterceptQueryUseCase {
    async fn serve(
        &self,
        request: &DnsRequest,
        sink: &mut dyn ResponseSink,
    ) -> Result<ResponseCode, DomainError> {
        if let Some(response) = self.resolve(request) {
            sink.write(response).await?;
            return Ok(ResponseCode::NoError);
        }

        trace!(domain = %request.domain, "No intercept policy applies, passing to next handler");
        self.next.serve(request, sink).await
    }
}
