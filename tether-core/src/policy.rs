//! Propagation Policies
//!
//! Two independent knobs control how values flow through the graph:
//!
//! - [`ChangePolicy`] decides whether a freshly assigned value counts as a
//!   change worth telling subscribers about.
//! - [`EvalPolicy`] decides when a derived node recomputes after one of its
//!   inputs changed.
//!
//! Each enum ends in a `Count` sentinel. It is never meant to be active; if a
//! node ends up with it anyway, change detection falls back to "always
//! propagate" and evaluation falls back to "do nothing".

use serde::{Deserialize, Serialize};

/// How a node decides whether a new value differs from the stored one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangePolicy {
    /// Propagate when `old != new`.
    #[default]
    NotEqual,

    /// Propagate unless `old == new`.
    ///
    /// Only differs from `NotEqual` for types whose `ne` is not the negation
    /// of `eq`.
    Equal,

    /// Propagate on every assignment, even of an identical value.
    Always,

    /// Sentinel. Treated as `Always`.
    Count,
}

impl ChangePolicy {
    /// Returns true if assigning `new` over `old` should notify subscribers.
    pub fn differs<T: PartialEq>(self, old: &T, new: &T) -> bool {
        match self {
            ChangePolicy::NotEqual => old.ne(new),
            ChangePolicy::Equal => !old.eq(new),
            ChangePolicy::Always => true,
            ChangePolicy::Count => {
                tracing::warn!("change policy sentinel in use, propagating unconditionally");
                true
            }
        }
    }

    /// Whether this is the `Count` sentinel.
    pub fn is_sentinel(self) -> bool {
        self == ChangePolicy::Count
    }
}

/// When a derived node recomputes after an input notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalPolicy {
    /// Recompute and propagate synchronously inside the notification.
    #[default]
    Instant,

    /// Mark dirty and recompute on the next read. Several notifications
    /// between two reads collapse into one recomputation.
    Lazy,

    /// Sentinel. Notifications are ignored.
    Count,
}

impl EvalPolicy {
    /// Whether this is the `Count` sentinel.
    pub fn is_sentinel(self) -> bool {
        self == EvalPolicy::Count
    }
}
