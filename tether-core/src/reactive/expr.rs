//! Expression Nodes
//!
//! An [`ExpressionNode`] derives its value from a fixed list of input nodes
//! through a pure function. It subscribes to every input when built and
//! unsubscribes from every input when dropped.
//!
//! # Evaluation
//!
//! - [`EvalPolicy::Instant`]: an input notification recomputes right away and
//!   feeds the result through the node's own change detection, which may in
//!   turn notify this node's dependents. A single `set` on a leaf therefore
//!   drives the whole chain of instant nodes before it returns.
//!
//! - [`EvalPolicy::Lazy`]: an input notification only marks the node dirty.
//!   The next `get` recomputes once, however many notifications arrived in
//!   between, and only then notifies dependents. A clean lazy node's
//!   dependents are not told about upstream changes until it is read.
//!
//! An instant node computes its initial value when built and starts clean.
//! Any other node starts dirty with no cached value, and runs its function
//! for the first time on the first `get`.
//!
//! # Cycles
//!
//! Inputs are fixed at construction and must already exist, so the graph
//! cannot contain a cycle.

use std::cell::Cell;
use std::fmt::{self, Debug};
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use super::inputs::{Compute, Inputs};
use super::subscriber::{Node, NodeId, Subscribers};
use super::value::{Observable, ValueNode};
use crate::config::BindingConfig;
use crate::policy::{ChangePolicy, EvalPolicy};

/// Whether a lazy node's cached value can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyState {
    /// The cached value is up-to-date.
    Clean,

    /// An input changed since the last evaluation.
    Dirty,
}

/// A node computed from other nodes.
///
/// `R` is the result type, `I` a tuple of input handles and `F` the function
/// over their values.
///
/// # Example
///
/// ```rust
/// use tether_core::reactive::{lift2, ValueNode};
///
/// let a = ValueNode::new(1);
/// let b = ValueNode::new(2);
/// let sum = lift2(a.clone(), b.clone(), |a, b| a + b);
/// assert_eq!(sum.get(), 3);
///
/// a.set(3);
/// assert_eq!(sum.get(), 5);
/// ```
pub struct ExpressionNode<R, I: Inputs, F> {
    /// Cached result, change policy and dependents. `None` until the first
    /// evaluation.
    output: ValueNode<Option<R>>,

    eval_policy: Cell<EvalPolicy>,

    function: F,

    inputs: I,

    dirty: Cell<bool>,

    /// Number of times `function` has run.
    evaluations: Cell<usize>,
}

impl<R, I, F> ExpressionNode<R, I, F>
where
    R: Clone + PartialEq + 'static,
    I: Inputs,
    F: Compute<I::Values, R> + 'static,
{
    /// Build an instant expression with the default change policy.
    pub fn new(function: F, inputs: I) -> Rc<Self> {
        Self::with_config(&BindingConfig::default(), function, inputs)
    }

    /// Build an expression with the given evaluation policy.
    pub fn with_policy(policy: EvalPolicy, function: F, inputs: I) -> Rc<Self> {
        let config = BindingConfig::default().with_eval_policy(policy);
        Self::with_config(&config, function, inputs)
    }

    /// Build an expression using both policies from `config`.
    pub fn with_config(config: &BindingConfig, function: F, inputs: I) -> Rc<Self> {
        let eager = config.eval_policy == EvalPolicy::Instant;
        let initial = eager.then(|| function.compute(inputs.values()));

        let node = Rc::new_cyclic(|this: &Weak<Self>| {
            let output = ValueNode::from_parts(initial, config.change_policy);
            let this: Weak<dyn Node> = this.clone();
            inputs.subscribe_all(output.id(), &this);

            Self {
                output,
                eval_policy: Cell::new(config.eval_policy),
                function,
                inputs,
                dirty: Cell::new(!eager),
                evaluations: Cell::new(usize::from(eager)),
            }
        });

        debug!(
            node = %node.id(),
            arity = I::ARITY,
            eval_policy = ?config.eval_policy,
            change_policy = ?config.change_policy,
            "created expression node"
        );
        node
    }

    /// Current value, recomputing first if dirty.
    pub fn get(&self) -> R {
        if !self.dirty.get() {
            if let Some(value) = self.output.get() {
                return value;
            }
        }
        trace!(node = %self.id(), "recomputing dirty expression on read");
        self.evaluate()
    }

    /// Cached value, without recomputing. Stale while dirty, `None` before
    /// the first evaluation.
    pub fn cached(&self) -> Option<R> {
        self.output.get()
    }

    /// Run the function over the current input values, store the result and
    /// return it.
    ///
    /// The flag is cleared before storing so that dependents reading this
    /// node while being notified see it clean.
    fn evaluate(&self) -> R {
        let value = self.function.compute(self.inputs.values());
        self.evaluations.set(self.evaluations.get() + 1);
        self.dirty.set(false);
        self.output.set(Some(value.clone()));
        value
    }

    /// Get the current evaluation policy.
    pub fn eval_policy(&self) -> EvalPolicy {
        self.eval_policy.get()
    }

    /// Switch evaluation strategy. A pending dirty flag is kept, so the next
    /// read still refreshes the value.
    pub fn set_eval_policy(&self, policy: EvalPolicy) {
        debug!(node = %self.id(), ?policy, "eval policy changed");
        self.eval_policy.set(policy);
    }

    /// Get the change policy applied to this node's results.
    pub fn change_policy(&self) -> ChangePolicy {
        self.output.change_policy()
    }

    /// Replace the change policy applied to this node's results.
    pub fn set_change_policy(&self, policy: ChangePolicy) {
        self.output.set_change_policy(policy);
    }

    /// Check if the cached value is stale.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Get the current dirty state.
    pub fn dirty_state(&self) -> DirtyState {
        if self.dirty.get() {
            DirtyState::Dirty
        } else {
            DirtyState::Clean
        }
    }

    /// Number of times the function has been evaluated.
    pub fn evaluation_count(&self) -> usize {
        self.evaluations.get()
    }

    /// Get the number of dependents, counting repeats.
    pub fn subscriber_count(&self) -> usize {
        self.output.subscriber_count()
    }
}

impl<R, I: Inputs, F> ExpressionNode<R, I, F> {
    /// Get the node's unique ID.
    pub fn id(&self) -> NodeId {
        self.output.id()
    }

    /// Get the input handles, in input order.
    pub fn inputs(&self) -> &I {
        &self.inputs
    }
}

impl<R, I, F> Node for ExpressionNode<R, I, F>
where
    R: Clone + PartialEq + 'static,
    I: Inputs,
    F: Compute<I::Values, R> + 'static,
{
    fn id(&self) -> NodeId {
        self.output.id()
    }

    fn update(&self) {
        match self.eval_policy.get() {
            EvalPolicy::Instant => {
                self.evaluate();
            }
            EvalPolicy::Lazy => {
                trace!(node = %self.id(), "input changed, marking dirty");
                self.dirty.set(true);
            }
            EvalPolicy::Count => {
                warn!(node = %self.id(), "eval policy sentinel in use, ignoring notification");
            }
        }
    }
}

impl<R, I, F> Observable for ExpressionNode<R, I, F>
where
    R: Clone + PartialEq + 'static,
    I: Inputs,
    F: Compute<I::Values, R> + 'static,
{
    type Value = R;

    fn get(&self) -> R {
        ExpressionNode::get(self)
    }

    fn subscribers(&self) -> &Subscribers {
        self.output.subscribers()
    }

    fn change_policy(&self) -> ChangePolicy {
        self.output.change_policy()
    }
}

impl<R, I: Inputs, F> Drop for ExpressionNode<R, I, F> {
    fn drop(&mut self) {
        let id = self.output.id();
        self.inputs.unsubscribe_all(id);
        debug!(node = %id, "dropped expression node, unsubscribed from inputs");
    }
}

impl<R: Debug, I: Inputs, F> Debug for ExpressionNode<R, I, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpressionNode")
            .field("output", &self.output)
            .field("arity", &I::ARITY)
            .field("eval_policy", &self.eval_policy.get())
            .field("dirty", &self.dirty.get())
            .field("evaluations", &self.evaluations.get())
            .finish()
    }
}
