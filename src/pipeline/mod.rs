//! Pipeline composition.
//!
//! Nodes are joined with [`NodeExt::connect`](crate::core::NodeExt::connect)
//! or the `|` operator. Which joins are legal is decided by the [`Connect`]
//! rule table, keyed on the roles of both operands:
//!
//! - producer `|` transformer gives a producer
//! - producer `|` consumer runs the pipeline and gives its result
//! - transformer `|` transformer gives a transformer
//! - transformer `|` consumer gives a consumer
//!
//! No other pair has a rule, so connecting two producers or extending past a
//! consumer is rejected at compile time. [`dynamic::AnyNode`] covers the case
//! where roles are only known at runtime.

pub mod dynamic;
pub mod iterable;
pub mod sequence;

use std::marker::PhantomData;

use crate::core::{ConsumerRole, Node, ProducerRole, Result, RoleMarker, TransformerRole};

/// Two nodes called in sequence, acting in role `K`.
///
/// The composite has no hooks of its own. Each operand runs its own
/// lifecycle, so grouping does not change which hooks run or in what order.
#[derive(Debug, Clone)]
pub struct Chain<L, R, K> {
    first: L,
    second: R,
    _role: PhantomData<K>,
}

impl<L, R> Chain<L, R, ProducerRole> {
    /// Extends a producer with a transformer.
    pub fn append(producer: L, transformer: R) -> Self {
        Self::new(producer, transformer)
    }
}

impl<L, R> Chain<L, R, ConsumerRole> {
    /// Puts a transformer in front of a consumer.
    pub fn prepend(consumer: R, transformer: L) -> Self {
        Self::new(transformer, consumer)
    }
}

impl<L, R, K> Chain<L, R, K> {
    fn new(first: L, second: R) -> Self {
        Self {
            first,
            second,
            _role: PhantomData,
        }
    }

    /// The node that runs first.
    pub fn first(&self) -> &L {
        &self.first
    }

    /// The node that runs second.
    pub fn second(&self) -> &R {
        &self.second
    }
}

impl<L, R, K> Node for Chain<L, R, K>
where
    L: Node,
    R: Node<Input = L::Output>,
    K: RoleMarker,
{
    type Role = K;
    type Input = L::Input;
    type Output = R::Output;

    fn exec(&self, input: Self::Input) -> Result<Self::Output> {
        let intermediate = self.first.call(input)?;
        self.second.call(intermediate)
    }
}

/// A legal way to join a left node `L` to a right node `R`.
///
/// Implemented for pairs of role markers.
pub trait Connect<L, R> {
    /// A new node, or the pipeline's result for a terminal join
    type Output;

    fn connect(left: L, right: R) -> Self::Output;
}

impl<L, R> Connect<L, R> for (ProducerRole, TransformerRole)
where
    L: Node<Input = ()>,
    R: Node<Input = L::Output>,
{
    type Output = Chain<L, R, ProducerRole>;

    fn connect(left: L, right: R) -> Self::Output {
        Chain::append(left, right)
    }
}

impl<L, R> Connect<L, R> for (ProducerRole, ConsumerRole)
where
    L: Node<Input = ()>,
    R: Node<Input = L::Output>,
{
    type Output = Result<R::Output>;

    fn connect(left: L, right: R) -> Self::Output {
        let produced = left.call(())?;
        right.call(produced)
    }
}

impl<L, R> Connect<L, R> for (TransformerRole, TransformerRole)
where
    L: Node,
    R: Node<Input = L::Output>,
{
    type Output = Chain<L, R, TransformerRole>;

    fn connect(left: L, right: R) -> Self::Output {
        Chain::new(left, right)
    }
}

impl<L, R> Connect<L, R> for (TransformerRole, ConsumerRole)
where
    L: Node,
    R: Node<Input = L::Output>,
{
    type Output = Chain<L, R, ConsumerRole>;

    fn connect(left: L, right: R) -> Self::Output {
        Chain::prepend(right, left)
    }
}

/// Implements `|` as [`NodeExt::connect`](crate::core::NodeExt::connect)
/// for concrete node types.
macro_rules! impl_connect_op {
    ($([$($gen:ident),*] $ty:ty),* $(,)?) => {$(
        impl<$($gen,)* Rhs> ::std::ops::BitOr<Rhs> for $ty
        where
            $ty: $crate::core::Node,
            Rhs: $crate::core::Node,
            (
                <$ty as $crate::core::Node>::Role,
                <Rhs as $crate::core::Node>::Role,
            ): $crate::pipeline::Connect<$ty, Rhs>,
        {
            type Output = <(
                <$ty as $crate::core::Node>::Role,
                <Rhs as $crate::core::Node>::Role,
            ) as $crate::pipeline::Connect<$ty, Rhs>>::Output;

            fn bitor(self, rhs: Rhs) -> Self::Output {
                $crate::core::NodeExt::connect(self, rhs)
            }
        }
    )*};
}

pub(crate) use impl_connect_op;

impl_connect_op!([L, R, K] Chain<L, R, K>);
