//! Error types.
//!
//! The propagation engine itself cannot fail at runtime: input arity and
//! types are checked by the compiler. Errors only come from loading
//! configuration.

use thiserror::Error;

/// Failure to load or validate a [`BindingConfig`](crate::config::BindingConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input was not valid JSON for a binding config.
    #[error("invalid binding config: {0}")]
    Json(#[from] serde_json::Error),

    /// A `count` sentinel was named as an active policy.
    #[error("`{field}` cannot use the `count` sentinel as an active policy")]
    SentinelPolicy { field: &'static str },
}
