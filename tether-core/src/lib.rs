//! Tether Core
//!
//! This crate provides a small typed dataflow engine. It implements:
//!
//! - Leaf nodes holding directly assignable values
//! - Derived nodes computed from a fixed tuple of typed inputs
//! - Instant (push) and lazy (dirty-flag, pull on read) evaluation
//! - Configurable change detection deciding when a new value propagates
//!
//! # Architecture
//!
//! - `policy`: change-detection and evaluation policies
//! - `reactive`: nodes, subscriber bookkeeping and typed input lists
//! - `config`: JSON-loadable node configuration
//! - `error`: configuration errors
//!
//! # Example
//!
//! ```rust
//! use tether_core::policy::EvalPolicy;
//! use tether_core::reactive::{lift2, ValueNode};
//!
//! let a = ValueNode::new(1);
//! let b = ValueNode::new(2);
//! let sum = lift2(a.clone(), b.clone(), |a, b| a + b);
//! assert_eq!(sum.get(), 3);
//!
//! // Pushed through immediately.
//! a.set(3);
//! assert_eq!(sum.cached(), Some(5));
//!
//! // Deferred until the next read.
//! sum.set_eval_policy(EvalPolicy::Lazy);
//! b.set(10);
//! assert!(sum.is_dirty());
//! assert_eq!(sum.get(), 13);
//! ```

pub mod policy;
pub mod reactive;
pub mod config;
pub mod error;

pub use config::BindingConfig;
pub use error::ConfigError;
pub use policy::{ChangePolicy, EvalPolicy};
