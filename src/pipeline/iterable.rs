//! Nodes whose output is a lazily drawn sequence.
//!
//! [`Iterable`] wraps any [`IterableNode`] of any role. Calling it runs the
//! wrapped node's `before`, primitive, and `computed` hooks up front, then
//! returns a [`Drawn`] iterator of `Result` elements. Each element passes
//! through [`IterableNode::each`] with its index just before it is handed out.
//!
//! The finalizer is tied to the sequence, not to the call:
//!
//! - it runs with [`Exit::Completed`](crate::core::Exit::Completed) when the
//!   sequence is exhausted
//! - it runs with [`Exit::Failed`](crate::core::Exit::Failed) when `each` fails
//!   or the underlying sequence yields an error
//! - it runs with [`Exit::Abandoned`](crate::core::Exit::Abandoned) when the
//!   sequence is closed with [`Drawn::close`] or dropped before exhaustion
//!
//! Whatever the finalizer returns is yielded as the last element: an `Err`
//! ends the sequence with that failure, even after every element was drawn.

use std::fmt;
use std::sync::Arc;

use crate::core::{Error, IterableNode, Node, Result, Scope};
use crate::pipeline::sequence::TrySequence;
use crate::util::{FnConsumer, FnProducer, FnTransformer};

/// Adapts an [`IterableNode`] into a node returning a lazy [`Drawn`] sequence.
///
/// # Examples
///
/// ```rust
/// use pipeweld::prelude::*;
///
/// let squares = Iterable::transformer(|xs: Vec<i32>| Ok(xs.into_iter().map(|x| x * x)));
/// let drawn: Result<Vec<i32>> = squares.call(vec![1, 2, 3]).unwrap().collect();
/// assert_eq!(drawn.unwrap(), vec![1, 4, 9]);
/// ```
pub struct Iterable<N> {
    node: Arc<N>,
}

impl<N> Iterable<N> {
    pub fn new(node: N) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    /// The wrapped node.
    pub fn inner(&self) -> &N {
        &self.node
    }
}

impl<F, I> Iterable<FnProducer<F, I>>
where
    F: Fn() -> Result<I>,
    I: TrySequence,
{
    /// An iterable producer from a function returning a sequence.
    pub fn producer(f: F) -> Self {
        Self::new(FnProducer::new(f))
    }
}

impl<F, S, I> Iterable<FnTransformer<F, S, I>>
where
    F: Fn(S) -> Result<I>,
    I: TrySequence,
{
    /// An iterable transformer from a function returning a sequence.
    pub fn transformer(f: F) -> Self {
        Self::new(FnTransformer::new(f))
    }
}

impl<F, S, I> Iterable<FnConsumer<F, S, I>>
where
    F: Fn(S) -> Result<I>,
    I: TrySequence,
{
    /// An iterable consumer from a function returning a sequence.
    pub fn consumer(f: F) -> Self {
        Self::new(FnConsumer::new(f))
    }
}

impl<N> Iterable<N>
where
    N: IterableNode<Input = ()>,
    N::Output: TrySequence<Item = N::Item>,
{
    /// Calls a producer and returns its sequence.
    pub fn iter(&self) -> Result<Drawn<N>> {
        self.call(())
    }
}

impl<N> Clone for Iterable<N> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for Iterable<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iterable").field("node", &self.node).finish()
    }
}

impl<N> Node for Iterable<N>
where
    N: IterableNode,
    N::Output: TrySequence<Item = N::Item>,
{
    type Role = N::Role;
    type Input = N::Input;
    type Output = Drawn<N>;

    fn exec(&self, input: Self::Input) -> Result<Self::Output> {
        let scope = Scope::enter(Arc::clone(&self.node), &input)?;
        let produced = self
            .node
            .exec(input)
            .and_then(|seq| self.node.computed(&seq).map(|()| seq));

        match produced {
            Ok(seq) => Ok(Drawn {
                iter: seq.into_try_iter(),
                scope: Some(scope),
                index: 0,
            }),
            Err(err) => scope.exit(Err(err)),
        }
    }
}

crate::pipeline::impl_connect_op!([N] Iterable<N>);

/// The lazy sequence returned by an [`Iterable`] node.
///
/// Yields `Ok` elements until the sequence ends. A failure from `each`, from
/// the underlying sequence, or from the finalizer is yielded once as `Err`,
/// after which the sequence is finished.
pub struct Drawn<N>
where
    N: IterableNode,
    N::Output: TrySequence<Item = N::Item>,
{
    iter: <N::Output as TrySequence>::Iter,
    scope: Option<Scope<Arc<N>>>,
    index: usize,
}

impl<N> Drawn<N>
where
    N: IterableNode,
    N::Output: TrySequence<Item = N::Item>,
{
    /// Number of elements handed out so far.
    pub fn drawn(&self) -> usize {
        self.index
    }

    /// Whether the finalizer has already run.
    pub fn is_finished(&self) -> bool {
        self.scope.is_none()
    }

    /// Releases the sequence.
    ///
    /// Runs the finalizer with `Exit::Abandoned` and returns its failure if
    /// the sequence was not finished yet. A finished sequence has already
    /// yielded its failure, so closing it is a no-op.
    pub fn close(mut self) -> Result<()> {
        match self.scope.take() {
            Some(scope) => scope.abandon(),
            None => Ok(()),
        }
    }

    fn fail(&mut self, err: Error) -> Result<N::Item> {
        tracing::debug!(drawn = self.index, error = %err, "sequence failed");
        match self.scope.take() {
            Some(scope) => scope.exit(Err(err)),
            None => Err(err),
        }
    }

    fn finish(&mut self) -> Result<()> {
        match self.scope.take() {
            Some(scope) => scope.exit(Ok(())),
            None => Ok(()),
        }
    }
}

impl<N> Iterator for Drawn<N>
where
    N: IterableNode,
    N::Output: TrySequence<Item = N::Item>,
{
    type Item = Result<N::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let scope = self.scope.as_ref()?;
        match self.iter.next() {
            Some(Ok(item)) => match scope.node().each(&item, self.index) {
                Ok(()) => {
                    self.index += 1;
                    Some(Ok(item))
                }
                Err(err) => Some(self.fail(err)),
            },
            Some(Err(err)) => Some(self.fail(err)),
            None => self.finish().err().map(Err),
        }
    }
}

impl<N> TrySequence for Drawn<N>
where
    N: IterableNode,
    N::Output: TrySequence<Item = N::Item>,
{
    type Item = N::Item;
    type Iter = Self;

    fn into_try_iter(self) -> Self {
        self
    }
}

impl<N> fmt::Debug for Drawn<N>
where
    N: IterableNode,
    N::Output: TrySequence<Item = N::Item>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Drawn")
            .field("drawn", &self.index)
            .field("finished", &self.is_finished())
            .finish()
    }
}

/// Iterating a producer directly: calls it, then yields its elements.
///
/// A failing call yields a single `Err`.
pub struct Items<N>
where
    N: IterableNode,
    N::Output: TrySequence<Item = N::Item>,
{
    drawn: Option<Drawn<N>>,
    failure: Option<Error>,
}

impl<N> Iterator for Items<N>
where
    N: IterableNode,
    N::Output: TrySequence<Item = N::Item>,
{
    type Item = Result<N::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(err) = self.failure.take() {
            return Some(Err(err));
        }
        self.drawn.as_mut()?.next()
    }
}

impl<'a, N> IntoIterator for &'a Iterable<N>
where
    N: IterableNode<Input = ()>,
    N::Output: TrySequence<Item = N::Item>,
{
    type Item = Result<N::Item>;
    type IntoIter = Items<N>;

    fn into_iter(self) -> Self::IntoIter {
        match self.iter() {
            Ok(drawn) => Items {
                drawn: Some(drawn),
                failure: None,
            },
            Err(err) => Items {
                drawn: None,
                failure: Some(err),
            },
        }
    }
}
