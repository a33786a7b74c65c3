use crate::zone::longest_match;
use crate::{DomainError, Policy};
use std::sync::Arc;

/// Zones plus the policies evaluated, in declaration order, for names
/// inside them.
#[derive(Debug, Clone)]
pub struct Rule {
    zones: Vec<Arc<str>>,
    policies: Vec<Policy>,
}

impl Rule {
    /// `zones` must already be normalized FQDNs. Duplicates are dropped,
    /// keeping first occurrence order.
    pub fn new(zones: Vec<Arc<str>>, policies: Vec<Policy>) -> Result<Self, DomainError> {
        if zones.is_empty() {
            return Err(DomainError::InvalidDomainName(
                "rule has no zones".to_string(),
            ));
        }

        let mut unique: Vec<Arc<str>> = Vec::with_capacity(zones.len());
        for zone in zones {
            if !unique.contains(&zone) {
                unique.push(zone);
            }
        }

        Ok(Self {
            zones: unique,
            policies,
        })
    }

    /// Longest zone of this rule containing `qname`.
    pub fn matching_zone(&self, qname: &str) -> Option<&Arc<str>> {
        longest_match(&self.zones, qname)
    }

    pub fn zones(&self) -> &[Arc<str>] {
        &self.zones
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }
}

/// The compiled, read-only rule set. Shared across query tasks behind an
/// `Arc` without any locking.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn policy_count(&self) -> usize {
        self.rules.iter().map(|r| r.policies.len()).sum()
    }
}
