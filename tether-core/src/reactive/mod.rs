//! Reactive Bindings
//!
//! This module implements the binding graph: leaves that hold values, and
//! expressions that derive values from other nodes.
//!
//! # Concepts
//!
//! ## Value nodes
//!
//! A [`ValueNode`] holds a value that outside code assigns with `set`. When
//! its [`ChangePolicy`](crate::policy::ChangePolicy) judges the new value
//! different, every subscriber is notified.
//!
//! ## Expression nodes
//!
//! An [`ExpressionNode`] applies a pure function to the values of a fixed
//! tuple of input nodes. It subscribes to each input when built and
//! unsubscribes when dropped. Depending on its
//! [`EvalPolicy`](crate::policy::EvalPolicy) it either recomputes as soon as
//! an input changes, or marks itself dirty and recomputes on the next read.
//! Expressions are observable too, so they can be inputs of other
//! expressions.
//!
//! # Implementation Notes
//!
//! Dependencies are explicit: an expression lists its inputs up front rather
//! than discovering them while running. Inputs are owned through `Rc`;
//! subscriber lists hold `Weak<dyn Node>` entries keyed by [`NodeId`], so a
//! node never keeps its dependents alive and a stale entry is skipped rather
//! than dereferenced.
//!
//! Everything is single-threaded and synchronous. A `set` on a leaf returns
//! only after every instant node downstream has recomputed.

mod subscriber;
mod value;
mod inputs;
mod expr;

pub use subscriber::{Node, NodeId, Subscribers};
pub use value::{Binding, Observable, ValueNode};
pub use inputs::{
    lift1, lift2, lift3, lift4, lift5, lift6, lift7, lift8, Compute, Input, Inputs,
};
pub use expr::{DirtyState, ExpressionNode};
