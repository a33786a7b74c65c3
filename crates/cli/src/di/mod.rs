use dns_intercept_application::ports::DnsHandler;
use dns_intercept_application::use_cases::{InterceptQueryUseCase, TerminalHandler};
use dns_intercept_domain::{Config, ResponseCode};
use dns_intercept_infrastructure::dns::DnsServerHandler;
use std::sync::Arc;
use tracing::info;

/// Fully wired handler chain: intercept engine first, terminal handler last.
pub struct InterceptServices {
    pub handler: DnsServerHandler,
    pub rules: usize,
    pub policies: usize,
}

impl InterceptServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let table = config.intercept.rule_table(&config.server.zones)?;
        let rules = table.len();
        let policies = table.policy_count();

        let fallthrough = ResponseCode::from(config.intercept.fallthrough);
        info!(rules, policies, fallthrough = %fallthrough, "Intercept rules loaded");

        let next: Arc<dyn DnsHandler> = Arc::new(TerminalHandler::new(fallthrough));
        let intercept: Arc<dyn DnsHandler> =
            Arc::new(InterceptQueryUseCase::new(Arc::new(table), next));

        Ok(Self {
            handler: DnsServerHandler::new(intercept),
            rules,
            policies,
        })
    }
}
