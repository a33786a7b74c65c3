use dns_intercept_domain::{DnsRequest, Policy, RuleTable};
use std::sync::Arc;

/// A policy whose class, type and network criteria hold for a request.
#[derive(Debug, Clone, Copy)]
pub struct PolicyMatch<'a> {
    /// Most specific zone of the rule that contains the query name.
    pub zone: &'a Arc<str>,
    pub rule_index: usize,
    pub policy_index: usize,
    pub policy: &'a Policy,
}

/// Walks the rule table in declaration order.
///
/// Lock-free: the table is immutable and shared, so any number of query
/// tasks can match concurrently.
#[derive(Debug, Clone)]
pub struct PolicyMatcher {
    table: Arc<RuleTable>,
}

impl PolicyMatcher {
    pub fn new(table: Arc<RuleTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Every matching policy, rules first then policies, both in
    /// declaration order. Rules whose zones do not contain the query name
    /// are skipped.
    pub fn candidates<'a>(
        &'a self,
        request: &'a DnsRequest,
    ) -> impl Iterator<Item = PolicyMatch<'a>> + 'a {
        self.table
            .rules()
            .iter()
            .enumerate()
            .filter_map(move |(rule_index, rule)| {
                rule.matching_zone(&request.domain)
                    .map(|zone| (rule_index, rule, zone))
            })
            .flat_map(move |(rule_index, rule, zone)| {
                rule.policies()
                    .iter()
                    .enumerate()
                    .filter(move |(_, policy)| policy.matches(request))
                    .map(move |(policy_index, policy)| PolicyMatch {
                        zone,
                        rule_index,
                        policy_index,
                        policy,
                    })
            })
    }

    /// First matching policy, if any.
    pub fn match_policy<'a>(&'a self, request: &'a DnsRequest) -> Option<PolicyMatch<'a>> {
        self.candidates(request).next()
    }
}
