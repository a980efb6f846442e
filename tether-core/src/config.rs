//! Binding Configuration
//!
//! Policies can be supplied per node in code, or loaded once from JSON and
//! handed to the `with_config` constructors.
//!
//! ```json
//! { "change_policy": "always", "eval_policy": "lazy" }
//! ```
//!
//! Omitted fields take the policy defaults (`not_equal`, `instant`).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::{ChangePolicy, EvalPolicy};

/// Policies applied to a node at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Change detection for the node's own value.
    pub change_policy: ChangePolicy,

    /// Evaluation strategy. Ignored by leaf nodes.
    pub eval_policy: EvalPolicy,
}

impl BindingConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject sentinel policies.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.change_policy.is_sentinel() {
            return Err(ConfigError::SentinelPolicy {
                field: "change_policy",
            });
        }
        if self.eval_policy.is_sentinel() {
            return Err(ConfigError::SentinelPolicy {
                field: "eval_policy",
            });
        }
        Ok(())
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Set the change policy.
    pub fn with_change_policy(mut self, policy: ChangePolicy) -> Self {
        self.change_policy = policy;
        self
    }

    /// Set the evaluation policy.
    pub fn with_eval_policy(mut self, policy: EvalPolicy) -> Self {
        self.eval_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = BindingConfig::from_json("{}").unwrap();
        assert_eq!(config, BindingConfig::default());
    }

    #[test]
    fn parses_both_policies() {
        let config =
            BindingConfig::from_json(r#"{"change_policy":"always","eval_policy":"lazy"}"#)
                .unwrap();
        assert_eq!(config.change_policy, ChangePolicy::Always);
        assert_eq!(config.eval_policy, EvalPolicy::Lazy);
    }

    #[test]
    fn rejects_sentinels() {
        let err = BindingConfig::from_json(r#"{"eval_policy":"count"}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SentinelPolicy { field: "eval_policy" }
        ));

        let err = BindingConfig::from_json(r#"{"change_policy":"count"}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SentinelPolicy { field: "change_policy" }
        ));
    }

    #[test]
    fn rejects_unknown_policy_names() {
        let err = BindingConfig::from_json(r#"{"eval_policy":"eventually"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn json_roundtrip_keeps_builder_settings() {
        let config = BindingConfig::default()
            .with_change_policy(ChangePolicy::Equal)
            .with_eval_policy(EvalPolicy::Lazy);
        let json = config.to_json().unwrap();
        assert_eq!(BindingConfig::from_json(&json).unwrap(), config);
    }
}
