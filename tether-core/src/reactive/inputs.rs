//! Typed input lists.
//!
//! An expression reads from a fixed, ordered list of inputs of independent
//! types and hands their values to a function positionally. The list is a
//! tuple of [`Input`] handles; [`Inputs`] turns it into a tuple of values and
//! wires subscriptions, and [`Compute`] calls an `Fn(A, B, ..) -> R` with that
//! value tuple. All three are implemented for tuples of one to eight inputs,
//! so a function whose arity or parameter types do not match its inputs is a
//! compile error.
//!
//! The `liftN` helpers take the inputs and the function as separate arguments.
//! Unlike [`ExpressionNode::new`], they let closure parameter types be
//! inferred from the inputs.

use std::rc::{Rc, Weak};

use super::expr::ExpressionNode;
use super::subscriber::{Node, NodeId, Subscribers};
use super::value::Observable;

/// A strong handle to a node an expression reads from.
pub trait Input: 'static {
    type Value: Clone;

    fn value(&self) -> Self::Value;

    fn subscribers(&self) -> &Subscribers;
}

impl<N> Input for Rc<N>
where
    N: Observable + ?Sized + 'static,
{
    type Value = N::Value;

    fn value(&self) -> N::Value {
        (**self).get()
    }

    fn subscribers(&self) -> &Subscribers {
        (**self).subscribers()
    }
}

/// An ordered tuple of inputs.
pub trait Inputs: 'static {
    /// One value per input, in input order.
    type Values;

    const ARITY: usize;

    /// Read every input, in order.
    fn values(&self) -> Self::Values;

    /// Register `node` with every input. An input listed twice gets two
    /// registrations.
    fn subscribe_all(&self, id: NodeId, node: &Weak<dyn Node>);

    /// Remove every registration of `id` from every input.
    fn unsubscribe_all(&self, id: NodeId);
}

/// A function callable with an unpacked argument tuple.
pub trait Compute<Args, R> {
    fn compute(&self, args: Args) -> R;
}

macro_rules! impl_arity {
    ($lift:ident, $arity:expr; $($ty:ident $var:ident $idx:tt),+) => {
        impl<$($ty: Input),+> Inputs for ($($ty,)+) {
            type Values = ($(<$ty as Input>::Value,)+);

            const ARITY: usize = $arity;

            fn values(&self) -> Self::Values {
                ($(self.$idx.value(),)+)
            }

            fn subscribe_all(&self, id: NodeId, node: &Weak<dyn Node>) {
                $(self.$idx.subscribers().subscribe(id, node.clone());)+
            }

            fn unsubscribe_all(&self, id: NodeId) {
                $(self.$idx.subscribers().unsubscribe(id);)+
            }
        }

        impl<Func, Ret, $($ty),+> Compute<($($ty,)+), Ret> for Func
        where
            Func: Fn($($ty),+) -> Ret,
        {
            fn compute(&self, args: ($($ty,)+)) -> Ret {
                let ($($var,)+) = args;
                self($($var),+)
            }
        }

        #[doc = concat!("Build an instant expression over ", stringify!($arity), " input(s).")]
        #[allow(clippy::too_many_arguments)]
        pub fn $lift<R, $($ty,)+ F>($($var: $ty,)+ f: F) -> Rc<ExpressionNode<R, ($($ty,)+), F>>
        where
            R: Clone + PartialEq + 'static,
            $($ty: Input,)+
            F: Fn($(<$ty as Input>::Value),+) -> R + 'static,
        {
            ExpressionNode::new(f, ($($var,)+))
        }
    };
}

impl_arity!(lift1, 1; A a 0);
impl_arity!(lift2, 2; A a 0, B b 1);
impl_arity!(lift3, 3; A a 0, B b 1, C c 2);
impl_arity!(lift4, 4; A a 0, B b 1, C c 2, D d 3);
impl_arity!(lift5, 5; A a 0, B b 1, C c 2, D d 3, E e 4);
impl_arity!(lift6, 6; A a 0, B b 1, C c 2, D d 3, E e 4, G g 5);
impl_arity!(lift7, 7; A a 0, B b 1, C c 2, D d 3, E e 4, G g 5, H h 6);
impl_arity!(lift8, 8; A a 0, B b 1, C c 2, D d 3, E e 4, G g 5, H h 6, J j 7);
