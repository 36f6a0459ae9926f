//! Sink implementations for the pipeweld library.
//!
//! Sinks are consumer nodes: they end a pipeline, and connecting a producer
//! to one runs the whole pipeline.

use std::marker::PhantomData;

use crate::core::{ConsumerRole, Node, Result};

/// A consumer that returns its input unchanged.
///
/// Useful to run a producer chain whose last stage is a transformer.
///
/// # Examples
///
/// ```rust
/// use pipeweld::prelude::*;
///
/// let out = constant(2)
///     .connect(transformer_from_fn(|x: i32| Ok(x * 21)))
///     .connect(IdentitySink::new())
///     .unwrap();
/// assert_eq!(out, 42);
/// ```
///
/// A consumer ends a pipeline, so nothing can be connected after it:
///
/// ```compile_fail
/// use pipeweld::prelude::*;
///
/// let _ = IdentitySink::<i32>::new().connect(transformer_from_fn(|x: i32| Ok(x)));
/// ```
pub struct IdentitySink<T> {
    _phantom: PhantomData<fn(T) -> T>,
}

impl<T> IdentitySink<T> {
    /// Create a new identity sink
    pub fn new() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Default for IdentitySink<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for IdentitySink<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for IdentitySink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("IdentitySink")
    }
}

impl<T> Node for IdentitySink<T> {
    type Role = ConsumerRole;
    type Input = T;
    type Output = T;

    fn exec(&self, input: T) -> Result<T> {
        Ok(input)
    }
}
