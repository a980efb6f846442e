//! Value Nodes
//!
//! A [`ValueNode`] is a leaf of the graph: it holds a value that outside code
//! assigns directly. Every assignment runs through the node's
//! [`ChangePolicy`]; when the policy judges the value different, the value is
//! stored and every subscriber is notified synchronously, in registration
//! order, before `set` returns.
//!
//! Dropping a value node does not notify anyone. Dependents hold strong
//! handles to their inputs, so in practice a leaf outlives everything
//! derived from it.

use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug};
use std::rc::Rc;

use tracing::{debug, trace};

use super::subscriber::{NodeId, Subscribers};
use crate::config::BindingConfig;
use crate::policy::ChangePolicy;

/// A node whose current value can be read and whose changes can be observed.
///
/// Implemented by [`ValueNode`] and by
/// [`ExpressionNode`](super::ExpressionNode), which lets expressions feed other
/// expressions.
pub trait Observable {
    type Value: Clone;

    /// Current value. May trigger a lazy recomputation.
    fn get(&self) -> Self::Value;

    /// Dependents to notify when the value changes.
    fn subscribers(&self) -> &Subscribers;

    fn change_policy(&self) -> ChangePolicy;
}

/// Type-erased shared handle to any node producing a `T`.
pub type Binding<T> = Rc<dyn Observable<Value = T>>;

/// A leaf node holding a directly assignable value.
///
/// # Example
///
/// ```rust
/// use tether_core::reactive::ValueNode;
///
/// let count = ValueNode::new(1);
/// count.set(2);
/// assert_eq!(count.get(), 2);
/// ```
pub struct ValueNode<T> {
    id: NodeId,
    value: RefCell<T>,
    policy: Cell<ChangePolicy>,
    subscribers: Subscribers,
}

impl<T> ValueNode<T>
where
    T: Clone + PartialEq + 'static,
{
    /// Create a shared leaf with the default change policy.
    pub fn new(value: T) -> Rc<Self> {
        Self::with_policy(value, ChangePolicy::default())
    }

    /// Create a shared leaf with an explicit change policy.
    pub fn with_policy(value: T, policy: ChangePolicy) -> Rc<Self> {
        let node = Rc::new(Self::from_parts(value, policy));
        debug!(node = %node.id, ?policy, "created value node");
        node
    }

    /// Create a shared leaf using the config's change policy.
    pub fn with_config(value: T, config: &BindingConfig) -> Rc<Self> {
        Self::with_policy(value, config.change_policy)
    }

    /// Create a shared leaf holding `T::default()`.
    pub fn zeroed() -> Rc<Self>
    where
        T: Default,
    {
        Self::new(T::default())
    }

    /// Unshared constructor, used to embed the value slot in other nodes.
    pub(crate) fn from_parts(value: T, policy: ChangePolicy) -> Self {
        Self {
            id: NodeId::new(),
            value: RefCell::new(value),
            policy: Cell::new(policy),
            subscribers: Subscribers::new(),
        }
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Read the current value by reference.
    pub fn peek<U>(&self, f: impl FnOnce(&T) -> U) -> U {
        f(&self.value.borrow())
    }

    /// Assign a value, notifying subscribers if the change policy sees a
    /// difference. Returns whether it did.
    pub fn set(&self, value: T) -> bool {
        let changed = {
            let current = self.value.borrow();
            self.policy.get().differs(&*current, &value)
        };
        if !changed {
            trace!(node = %self.id, "value unchanged, not propagating");
            return false;
        }

        // The borrow must end before notifying: subscribers read this value.
        *self.value.borrow_mut() = value;
        trace!(
            node = %self.id,
            subscribers = self.subscribers.len(),
            "value changed, propagating"
        );
        self.subscribers.notify_all();
        true
    }

    /// Compute the next value from the current one, then `set` it.
    pub fn replace_with<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value.borrow());
        self.set(next)
    }

    /// Get the current change policy.
    pub fn change_policy(&self) -> ChangePolicy {
        self.policy.get()
    }

    /// Replace the change policy. Applies from the next `set`.
    pub fn set_change_policy(&self, policy: ChangePolicy) {
        self.policy.set(policy);
    }
}

impl<T> ValueNode<T> {
    /// Get the node's unique ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the dependents notified when the value changes.
    pub fn subscribers(&self) -> &Subscribers {
        &self.subscribers
    }

    /// Number of registered dependents, counting repeats.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> Observable for ValueNode<T>
where
    T: Clone + PartialEq + 'static,
{
    type Value = T;

    fn get(&self) -> T {
        ValueNode::get(self)
    }

    fn subscribers(&self) -> &Subscribers {
        &self.subscribers
    }

    fn change_policy(&self) -> ChangePolicy {
        self.policy.get()
    }
}

impl<T: Debug> Debug for ValueNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueNode")
            .field("id", &self.id)
            .field("value", &*self.value.borrow())
            .field("policy", &self.policy.get())
            .field("subscribers", &self.subscribers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::subscriber::Node;
    use std::rc::Weak;

    struct Counter {
        id: NodeId,
        hits: Cell<usize>,
    }

    impl Node for Counter {
        fn id(&self) -> NodeId {
            self.id
        }

        fn update(&self) {
            self.hits.set(self.hits.get() + 1);
        }
    }

    fn watch<T: Clone + PartialEq + 'static>(node: &ValueNode<T>) -> Rc<Counter> {
        let counter = Rc::new(Counter {
            id: NodeId::new(),
            hits: Cell::new(0),
        });
        let as_node: Rc<dyn Node> = counter.clone();
        let weak: Weak<dyn Node> = Rc::downgrade(&as_node);
        node.subscribers().subscribe(counter.id, weak);
        counter
    }

    #[test]
    fn get_and_set() {
        let node = ValueNode::new(0);
        assert_eq!(node.get(), 0);

        assert!(node.set(42));
        assert_eq!(node.get(), 42);
    }

    #[test]
    fn zeroed_uses_default() {
        let node = ValueNode::<i64>::zeroed();
        assert_eq!(node.get(), 0);

        let text = ValueNode::<String>::zeroed();
        assert!(text.get().is_empty());
    }

    #[test]
    fn set_notifies_on_change() {
        let node = ValueNode::new(0);
        let counter = watch(&node);

        node.set(1);
        node.set(2);
        assert_eq!(counter.hits.get(), 2);
    }

    #[test]
    fn not_equal_suppresses_identical_value() {
        let node = ValueNode::new(5);
        let counter = watch(&node);

        assert!(!node.set(5));
        assert_eq!(counter.hits.get(), 0);
    }

    #[test]
    fn always_propagates_identical_value() {
        let node = ValueNode::with_policy(5, ChangePolicy::Always);
        let counter = watch(&node);

        assert!(node.set(5));
        assert!(node.set(5));
        assert_eq!(counter.hits.get(), 2);
    }

    #[test]
    fn sentinel_policy_propagates() {
        let node = ValueNode::with_policy("x".to_string(), ChangePolicy::Count);
        let counter = watch(&node);

        node.set("x".to_string());
        assert_eq!(counter.hits.get(), 1);
    }

    #[test]
    fn policy_can_change_after_construction() {
        let node = ValueNode::new(1);
        let counter = watch(&node);

        node.set(1);
        assert_eq!(counter.hits.get(), 0);

        node.set_change_policy(ChangePolicy::Always);
        node.set(1);
        assert_eq!(counter.hits.get(), 1);
    }

    #[test]
    fn replace_with_reads_current_value() {
        let node = ValueNode::new(10);
        node.replace_with(|v| v + 5);
        assert_eq!(node.get(), 15);
        assert_eq!(node.peek(|v| *v * 2), 30);
    }

    #[test]
    fn with_config_applies_change_policy() {
        let config = BindingConfig::default().with_change_policy(ChangePolicy::Equal);
        let node = ValueNode::with_config(1.5_f32, &config);
        assert_eq!(node.change_policy(), ChangePolicy::Equal);
    }

    #[test]
    fn shared_handles_keep_identity() {
        let a = ValueNode::new(0);
        let alias = Rc::clone(&a);
        let other = ValueNode::new(0);
        assert_eq!(alias.id(), a.id());
        assert_ne!(other.id(), a.id());

        // Subscribing through one handle is seen through the other.
        let counter = watch(&alias);
        a.set(3);
        assert_eq!(alias.get(), 3);
        assert_eq!(counter.hits.get(), 1);
        assert!(a.subscribers().contains(counter.id));
    }
}
