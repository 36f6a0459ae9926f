//! Source implementations for the pipeweld library.
//!
//! Sources are producer nodes: they take no input and originate a pipeline.

use crate::core::{IterableNode, Node, ProducerRole, Result};
use crate::pipeline::iterable::Iterable;
use crate::pipeline::sequence::TrySequence;

/// A producer that always returns the same value.
///
/// Each call hands out a clone of the stored value.
#[derive(Debug, Clone)]
pub struct ConstantSource<T> {
    value: T,
}

impl<T: Clone> ConstantSource<T> {
    /// Create a new constant source
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// The stored value.
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Clone> Node for ConstantSource<T> {
    type Role = ProducerRole;
    type Input = ();
    type Output = T;

    fn exec(&self, _input: ()) -> Result<T> {
        Ok(self.value.clone())
    }
}

impl<T> IterableNode for ConstantSource<T>
where
    T: Clone + TrySequence,
{
    type Item = T::Item;
}

crate::pipeline::impl_connect_op!([T] ConstantSource<T>);

/// A producer that always returns `value`.
pub fn constant<T: Clone>(value: T) -> ConstantSource<T> {
    ConstantSource::new(value)
}

/// An iterable producer that yields the elements of `value` on every call.
///
/// # Examples
///
/// ```rust
/// use pipeweld::prelude::*;
///
/// let digits = iter_constant(vec![1, 2, 3]);
/// let once: Result<Vec<i32>> = digits.iter().unwrap().collect();
/// let twice: Result<Vec<i32>> = digits.iter().unwrap().collect();
/// assert_eq!(once.unwrap(), twice.unwrap());
/// ```
pub fn iter_constant<T>(value: T) -> Iterable<ConstantSource<T>>
where
    T: Clone + TrySequence,
{
    Iterable::new(ConstantSource::new(value))
}
