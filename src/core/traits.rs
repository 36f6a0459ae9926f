//! Core traits for the node system.
//!
//! This module defines the three node roles and the lifecycle contract every
//! node runs under. A node wraps one primitive computation ([`Node::exec`])
//! and may override any of the hooks that surround it:
//!
//! 1. [`Node::before`] receives the input before the primitive runs.
//! 2. [`Node::exec`] runs the primitive.
//! 3. [`Node::computed`] receives the output if the primitive succeeded.
//! 4. [`Node::after`] is the finalizer. It runs on every exit path once
//!    `before` has succeeded, and a failure it returns replaces whatever
//!    the call was about to return.
//!
//! Hooks default to doing nothing, so most nodes only implement `exec`.

use std::fmt;

use crate::core::error::Result;
use crate::core::lifecycle::{self, Exit};
use crate::pipeline::iterable::Iterable;
use crate::pipeline::sequence::TrySequence;
use crate::pipeline::Connect;

/// Runtime tag for a node role, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    /// Zero-input node that originates a pipeline
    Producer,
    /// One-input, one-output node
    Transformer,
    /// One-input terminal node
    Consumer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Transformer => "transformer",
            Role::Consumer => "consumer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-level role of a node. Implemented only by the three role markers.
pub trait RoleMarker: sealed::Sealed {
    const ROLE: Role;
}

/// Marker for producer nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProducerRole;

/// Marker for transformer nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformerRole;

/// Marker for consumer nodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsumerRole;

impl RoleMarker for ProducerRole {
    const ROLE: Role = Role::Producer;
}

impl RoleMarker for TransformerRole {
    const ROLE: Role = Role::Transformer;
}

impl RoleMarker for ConsumerRole {
    const ROLE: Role = Role::Consumer;
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::ProducerRole {}
    impl Sealed for super::TransformerRole {}
    impl Sealed for super::ConsumerRole {}
}

/// A callable unit with a role, one primitive, and lifecycle hooks.
///
/// Producers use `()` as their input.
///
/// # Examples
///
/// ```rust
/// use pipeweld::prelude::*;
///
/// struct Doubler;
///
/// impl Node for Doubler {
///     type Role = TransformerRole;
///     type Input = i32;
///     type Output = i32;
///
///     fn exec(&self, input: i32) -> Result<i32> {
///         Ok(input * 2)
///     }
///
///     fn computed(&self, output: &i32) -> Result<()> {
///         if *output > 100 {
///             return Err(Error::custom("too large"));
///         }
///         Ok(())
///     }
/// }
///
/// assert_eq!(Doubler.call(21).unwrap(), 42);
/// assert!(Doubler.call(51).is_err());
/// ```
pub trait Node {
    /// The role this node plays when connected
    type Role: RoleMarker;
    /// The type of value this node accepts
    type Input;
    /// The type of value this node returns
    type Output;

    /// The primitive computation.
    ///
    /// Called by [`Node::call`] inside the lifecycle scope. Never retried or
    /// cached by the framework.
    fn exec(&self, input: Self::Input) -> Result<Self::Output>;

    /// Runs before the primitive with the input it is about to receive.
    ///
    /// A failure here skips the primitive, `computed`, and `after`.
    fn before(&self, _input: &Self::Input) -> Result<()> {
        Ok(())
    }

    /// Runs with the primitive's output when it succeeded.
    fn computed(&self, _output: &Self::Output) -> Result<()> {
        Ok(())
    }

    /// The finalizer.
    ///
    /// Receives how the call ended. Returning an error replaces the result
    /// the caller would otherwise observe.
    fn after(&self, _exit: Exit<'_>) -> Result<()> {
        Ok(())
    }

    /// Calls the node under the lifecycle contract.
    fn call(&self, input: Self::Input) -> Result<Self::Output> {
        lifecycle::call(self, input)
    }

    /// The runtime role tag of this node.
    fn role(&self) -> Role {
        <Self::Role as RoleMarker>::ROLE
    }
}

/// A node whose output is a sequence, observed element by element.
///
/// Wrap it in [`Iterable`] to get a node whose call returns a lazy iterator
/// that runs [`IterableNode::each`] on every element as it is drawn.
pub trait IterableNode: Node {
    /// The element type of the produced sequence
    type Item;

    /// Runs for every drawn element, in order, before it is handed out.
    ///
    /// A failure ends the sequence: the element is not handed out and the
    /// finalizer receives the failure.
    fn each(&self, _item: &Self::Item, _index: usize) -> Result<()> {
        Ok(())
    }
}

impl<N: Node + ?Sized> Node for Box<N> {
    type Role = N::Role;
    type Input = N::Input;
    type Output = N::Output;

    fn exec(&self, input: Self::Input) -> Result<Self::Output> {
        (**self).exec(input)
    }

    fn before(&self, input: &Self::Input) -> Result<()> {
        (**self).before(input)
    }

    fn computed(&self, output: &Self::Output) -> Result<()> {
        (**self).computed(output)
    }

    fn after(&self, exit: Exit<'_>) -> Result<()> {
        (**self).after(exit)
    }
}

impl<N: IterableNode + ?Sized> IterableNode for Box<N> {
    type Item = N::Item;

    fn each(&self, item: &Self::Item, index: usize) -> Result<()> {
        (**self).each(item, index)
    }
}

/// Extension trait for joining nodes and adapting them.
pub trait NodeExt: Node + Sized {
    /// Connects this node to `next`.
    ///
    /// | left        | right       | result                   |
    /// |-------------|-------------|--------------------------|
    /// | producer    | transformer | a new producer           |
    /// | producer    | consumer    | the pipeline's `Result`  |
    /// | transformer | transformer | a new transformer        |
    /// | transformer | consumer    | a new consumer           |
    ///
    /// Every other combination fails to compile. See
    /// [`AnyNode`](crate::pipeline::dynamic::AnyNode) for the runtime-checked
    /// version.
    fn connect<R>(self, next: R) -> <(Self::Role, R::Role) as Connect<Self, R>>::Output
    where
        R: Node,
        (Self::Role, R::Role): Connect<Self, R>,
    {
        <(Self::Role, R::Role) as Connect<Self, R>>::connect(self, next)
    }

    /// Wraps this node so its call yields a lazily observed sequence.
    fn iterable(self) -> Iterable<Self>
    where
        Self: IterableNode,
        Self::Output: TrySequence<Item = Self::Item>,
    {
        Iterable::new(self)
    }

    /// Boxes this node, erasing its concrete type.
    fn boxed(self) -> Box<dyn Node<Role = Self::Role, Input = Self::Input, Output = Self::Output>>
    where
        Self: 'static,
    {
        Box::new(self)
    }
}

impl<N: Node> NodeExt for N {}
