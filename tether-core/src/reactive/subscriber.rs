//! Subscriber bookkeeping.
//!
//! Every observable node embeds a [`Subscribers`] registry listing the
//! dependents it must notify when its value changes. Entries are weak: a node
//! never keeps its dependents alive. Each entry carries the dependent's
//! [`NodeId`] so the dependent can remove itself again when it is dropped.

use std::cell::RefCell;
use std::fmt;
use std::rc::Weak;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::SmallVec;
use tracing::trace;

/// Unique identifier for a node.
///
/// Used as the key for subscribe/unsubscribe pairing, and in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Generate a new unique node ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Anything that can be told "one of your inputs changed".
pub trait Node {
    /// Identity used for subscription bookkeeping.
    fn id(&self) -> NodeId;

    /// React to an upstream change.
    fn update(&self);
}

type Entry = (NodeId, Weak<dyn Node>);

/// Ordered list of dependents to notify on change.
///
/// Registration is additive: a dependent that reads the same input twice is
/// listed twice and is notified twice.
#[derive(Default)]
pub struct Subscribers {
    entries: RefCell<SmallVec<[Entry; 4]>>,
}

impl Subscribers {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dependent.
    pub fn subscribe(&self, id: NodeId, node: Weak<dyn Node>) {
        self.entries.borrow_mut().push((id, node));
    }

    /// Remove every entry for `id`. Removing a non-member does nothing.
    pub fn unsubscribe(&self, id: NodeId) {
        self.entries.borrow_mut().retain(|(entry, _)| *entry != id);
    }

    /// Call `update` on every live dependent, in registration order.
    ///
    /// Works on a snapshot, so dependents may subscribe or unsubscribe while
    /// being notified. Entries whose node is gone are skipped.
    pub fn notify_all(&self) {
        let snapshot: SmallVec<[Entry; 4]> = self.entries.borrow().clone();
        for (id, weak) in snapshot {
            match weak.upgrade() {
                Some(node) => {
                    trace!(subscriber = %id, "notifying subscriber");
                    node.update();
                }
                None => trace!(subscriber = %id, "skipping dropped subscriber"),
            }
        }
    }

    /// Number of entries, counting repeats.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if no dependent is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// How many times `id` is registered.
    pub fn count_of(&self, id: NodeId) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|(entry, _)| *entry == id)
            .count()
    }

    /// Check if `id` is registered at least once.
    pub fn contains(&self, id: NodeId) -> bool {
        self.count_of(id) > 0
    }

    /// Registered ids in notification order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.entries.borrow().iter().map(|(id, _)| *id).collect()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    struct MockNode {
        id: NodeId,
        updates: Cell<usize>,
        log: Option<Rc<RefCell<Vec<NodeId>>>>,
    }

    impl MockNode {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                id: NodeId::new(),
                updates: Cell::new(0),
                log: None,
            })
        }

        fn logging(log: Rc<RefCell<Vec<NodeId>>>) -> Rc<Self> {
            Rc::new(Self {
                id: NodeId::new(),
                updates: Cell::new(0),
                log: Some(log),
            })
        }
    }

    impl Node for MockNode {
        fn id(&self) -> NodeId {
            self.id
        }

        fn update(&self) {
            self.updates.set(self.updates.get() + 1);
            if let Some(log) = &self.log {
                log.borrow_mut().push(self.id);
            }
        }
    }

    fn weak_of(node: &Rc<MockNode>) -> Weak<dyn Node> {
        let node: Rc<dyn Node> = node.clone();
        Rc::downgrade(&node)
    }

    #[test]
    fn notify_calls_every_subscriber() {
        let subs = Subscribers::new();
        let a = MockNode::new();
        let b = MockNode::new();
        subs.subscribe(a.id, weak_of(&a));
        subs.subscribe(b.id, weak_of(&b));

        subs.notify_all();
        assert_eq!(a.updates.get(), 1);
        assert_eq!(b.updates.get(), 1);
    }

    #[test]
    fn notify_follows_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let subs = Subscribers::new();
        let first = MockNode::logging(log.clone());
        let second = MockNode::logging(log.clone());
        subs.subscribe(second.id, weak_of(&second));
        subs.subscribe(first.id, weak_of(&first));

        subs.notify_all();
        assert_eq!(*log.borrow(), vec![second.id, first.id]);
    }

    #[test]
    fn registrations_are_additive() {
        let subs = Subscribers::new();
        let a = MockNode::new();
        subs.subscribe(a.id, weak_of(&a));
        subs.subscribe(a.id, weak_of(&a));

        assert_eq!(subs.len(), 2);
        assert_eq!(subs.count_of(a.id), 2);

        subs.notify_all();
        assert_eq!(a.updates.get(), 2);
    }

    #[test]
    fn unsubscribe_removes_all_entries_and_is_idempotent() {
        let subs = Subscribers::new();
        let a = MockNode::new();
        let b = MockNode::new();
        subs.subscribe(a.id, weak_of(&a));
        subs.subscribe(b.id, weak_of(&b));
        subs.subscribe(a.id, weak_of(&a));

        subs.unsubscribe(a.id);
        assert_eq!(subs.ids(), vec![b.id]);

        subs.unsubscribe(a.id);
        subs.unsubscribe(NodeId::new());
        assert_eq!(subs.len(), 1);
    }

    #[test]
    fn dropped_subscribers_are_skipped() {
        let subs = Subscribers::new();
        let a = MockNode::new();
        let id = a.id;
        subs.subscribe(id, weak_of(&a));
        drop(a);

        // Entry is still listed but never dereferenced.
        assert!(subs.contains(id));
        subs.notify_all();
    }
}
