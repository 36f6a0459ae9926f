//! Utility functions and helper types.
//!
//! The `*_from_fn` helpers turn an ordinary function or closure into a node
//! of the matching role, which is usually all a pipeline stage needs.

use std::fmt;
use std::marker::PhantomData;

use crate::core::{ConsumerRole, IterableNode, Node, ProducerRole, Result, TransformerRole};
use crate::pipeline::sequence::TrySequence;

/// Helper function to create a producer from a function
///
/// # Examples
///
/// ```rust
/// use pipeweld::prelude::*;
///
/// let answer = from_fn(|| Ok(42));
/// assert_eq!(answer.call(()).unwrap(), 42);
/// ```
pub fn from_fn<F, T>(f: F) -> FnProducer<F, T>
where
    F: Fn() -> Result<T>,
{
    FnProducer::new(f)
}

/// Helper function to create a transformer from a function
pub fn transformer_from_fn<F, S, T>(f: F) -> FnTransformer<F, S, T>
where
    F: Fn(S) -> Result<T>,
{
    FnTransformer::new(f)
}

/// Helper function to create a consumer from a function
pub fn consumer_from_fn<F, S, T>(f: F) -> FnConsumer<F, S, T>
where
    F: Fn(S) -> Result<T>,
{
    FnConsumer::new(f)
}

/// A producer created from a function
pub struct FnProducer<F, T> {
    f: F,
    _phantom: PhantomData<fn() -> T>,
}

impl<F, T> FnProducer<F, T>
where
    F: Fn() -> Result<T>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, T> Node for FnProducer<F, T>
where
    F: Fn() -> Result<T>,
{
    type Role = ProducerRole;
    type Input = ();
    type Output = T;

    fn exec(&self, _input: ()) -> Result<T> {
        (self.f)()
    }
}

impl<F, T> IterableNode for FnProducer<F, T>
where
    F: Fn() -> Result<T>,
    T: TrySequence,
{
    type Item = T::Item;
}

/// A transformer created from a function
pub struct FnTransformer<F, S, T> {
    f: F,
    _phantom: PhantomData<fn(S) -> T>,
}

impl<F, S, T> FnTransformer<F, S, T>
where
    F: Fn(S) -> Result<T>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, S, T> Node for FnTransformer<F, S, T>
where
    F: Fn(S) -> Result<T>,
{
    type Role = TransformerRole;
    type Input = S;
    type Output = T;

    fn exec(&self, input: S) -> Result<T> {
        (self.f)(input)
    }
}

impl<F, S, T> IterableNode for FnTransformer<F, S, T>
where
    F: Fn(S) -> Result<T>,
    T: TrySequence,
{
    type Item = T::Item;
}

/// A consumer created from a function
pub struct FnConsumer<F, S, T> {
    f: F,
    _phantom: PhantomData<fn(S) -> T>,
}

impl<F, S, T> FnConsumer<F, S, T>
where
    F: Fn(S) -> Result<T>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, S, T> Node for FnConsumer<F, S, T>
where
    F: Fn(S) -> Result<T>,
{
    type Role = ConsumerRole;
    type Input = S;
    type Output = T;

    fn exec(&self, input: S) -> Result<T> {
        (self.f)(input)
    }
}

impl<F, S, T> IterableNode for FnConsumer<F, S, T>
where
    F: Fn(S) -> Result<T>,
    T: TrySequence,
{
    type Item = T::Item;
}

impl<F: Clone, T> Clone for FnProducer<F, T> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<F: Clone, S, T> Clone for FnTransformer<F, S, T> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<F: Clone, S, T> Clone for FnConsumer<F, S, T> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<F, T> fmt::Debug for FnProducer<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnProducer")
    }
}

impl<F, S, T> fmt::Debug for FnTransformer<F, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnTransformer")
    }
}

impl<F, S, T> fmt::Debug for FnConsumer<F, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnConsumer")
    }
}

crate::pipeline::impl_connect_op!(
    [F, T] FnProducer<F, T>,
    [F, S, T] FnTransformer<F, S, T>,
);

/// Metrics collection utilities
#[cfg(feature = "metrics")]
pub mod metrics {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use crate::core::{Exit, IterableNode, Node, Result};

    /// Simple in-process counters for observing nodes
    #[derive(Debug, Clone, Default)]
    pub struct Metrics {
        calls: Arc<AtomicU64>,
        failures: Arc<AtomicU64>,
        drawn: Arc<AtomicU64>,
    }

    impl Metrics {
        /// Create new metrics
        pub fn new() -> Self {
            Self::default()
        }

        /// Record a finished call
        pub fn record_call(&self, ok: bool) {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if !ok {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
        }

        /// Record a drawn element
        pub fn record_drawn(&self) {
            self.drawn.fetch_add(1, Ordering::Relaxed);
        }

        /// Get current counts as (calls, failures, drawn)
        pub fn counts(&self) -> (u64, u64, u64) {
            (
                self.calls.load(Ordering::Relaxed),
                self.failures.load(Ordering::Relaxed),
                self.drawn.load(Ordering::Relaxed),
            )
        }
    }

    /// Wraps a node and records its calls into a [`Metrics`] set.
    pub struct Metered<N> {
        node: N,
        metrics: Metrics,
    }

    impl<N> Metered<N> {
        pub fn new(node: N, metrics: Metrics) -> Self {
            Self { node, metrics }
        }
    }

    impl<N: Node> Node for Metered<N> {
        type Role = N::Role;
        type Input = N::Input;
        type Output = N::Output;

        fn exec(&self, input: Self::Input) -> Result<Self::Output> {
            self.node.exec(input)
        }

        fn before(&self, input: &Self::Input) -> Result<()> {
            self.node.before(input)
        }

        fn computed(&self, output: &Self::Output) -> Result<()> {
            self.node.computed(output)
        }

        fn after(&self, exit: Exit<'_>) -> Result<()> {
            let finalized = self.node.after(exit);
            self.metrics
                .record_call(exit.error().is_none() && finalized.is_ok());
            finalized
        }
    }

    impl<N: IterableNode> IterableNode for Metered<N> {
        type Item = N::Item;

        fn each(&self, item: &Self::Item, index: usize) -> Result<()> {
            self.metrics.record_drawn();
            self.node.each(item, index)
        }
    }

    crate::pipeline::impl_connect_op!([N] Metered<N>);

}
