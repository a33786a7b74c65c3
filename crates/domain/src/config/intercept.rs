use super::errors::ConfigError;
use crate::{parse_directives, ResponseCode, RuleTable};
use serde::{Deserialize, Serialize};

/// Status reported for queries no policy answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FallthroughCode {
    #[default]
    ServFail,
    Refused,
    NxDomain,
}

impl From<FallthroughCode> for ResponseCode {
    fn from(code: FallthroughCode) -> Self {
        match code {
            FallthroughCode::ServFail => ResponseCode::ServFail,
            FallthroughCode::Refused => ResponseCode::Refused,
            FallthroughCode::NxDomain => ResponseCode::NxDomain,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InterceptConfig {
    /// Path to a file holding `intercept` directives.
    #[serde(default)]
    pub rules_file: Option<String>,

    /// Inline `intercept` directives, appended after `rules_file`.
    #[serde(default)]
    pub rules: Option<String>,

    #[serde(default)]
    pub fallthrough: FallthroughCode,
}

impl InterceptConfig {
    pub fn has_rule_source(&self) -> bool {
        self.rules_file.is_some() || self.rules.is_some()
    }

    /// Reads every rule source and compiles them into one table.
    pub fn rule_table(&self, server_zones: &[String]) -> Result<RuleTable, ConfigError> {
        let mut text = String::new();

        if let Some(path) = &self.rules_file {
            text = std::fs::read_to_string(path)
                .map_err(|e| ConfigError::FileRead(path.clone(), e.to_string()))?;
        }

        if let Some(inline) = &self.rules {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(inline);
        }

        parse_directives(&text, server_zones)
    }
}
