//! Processor implementations for the pipeweld library.
//!
//! Processors are transformer nodes over sequences. [`MapProcessor`] and
//! [`FilterProcessor`] are lazy and are normally used through the iterable
//! wrappers returned by [`map`] and [`filter`]. [`SumProcessor`] reduces a
//! sequence to one value.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use num_traits::Zero;

use crate::core::{IterableNode, Node, Result, TransformerRole};
use crate::pipeline::iterable::Iterable;
use crate::pipeline::sequence::TrySequence;

/// A processor that lazily applies a function to each element.
pub struct MapProcessor<F, I, T> {
    f: Arc<F>,
    _phantom: PhantomData<fn(I) -> T>,
}

impl<F, I, T> MapProcessor<F, I, T>
where
    I: TrySequence,
    F: Fn(I::Item) -> T,
{
    /// Create a new map processor
    pub fn new(f: F) -> Self {
        Self {
            f: Arc::new(f),
            _phantom: PhantomData,
        }
    }
}

impl<F, I, T> Node for MapProcessor<F, I, T>
where
    I: TrySequence,
    F: Fn(I::Item) -> T,
{
    type Role = TransformerRole;
    type Input = I;
    type Output = Mapped<I::Iter, F>;

    fn exec(&self, input: I) -> Result<Self::Output> {
        Ok(Mapped {
            iter: input.into_try_iter(),
            f: Arc::clone(&self.f),
        })
    }
}

impl<F, I, T> IterableNode for MapProcessor<F, I, T>
where
    I: TrySequence,
    F: Fn(I::Item) -> T,
{
    type Item = T;
}

/// Iterator returned by [`MapProcessor`].
///
/// Failures drawn from the input pass through unchanged.
pub struct Mapped<It, F> {
    iter: It,
    f: Arc<F>,
}

impl<It, F, S, T> Iterator for Mapped<It, F>
where
    It: Iterator<Item = Result<S>>,
    F: Fn(S) -> T,
{
    type Item = Result<T>;

    fn next(&mut self) -> Option<Result<T>> {
        let f = &self.f;
        self.iter.next().map(|item| item.map(|value| f(value)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<It, F, S, T> TrySequence for Mapped<It, F>
where
    It: Iterator<Item = Result<S>>,
    F: Fn(S) -> T,
{
    type Item = T;
    type Iter = Self;

    fn into_try_iter(self) -> Self {
        self
    }
}

/// A processor that lazily keeps the elements matching a predicate.
pub struct FilterProcessor<F, I> {
    predicate: Arc<F>,
    _phantom: PhantomData<fn(I)>,
}

impl<F, I> FilterProcessor<F, I>
where
    I: TrySequence,
    F: Fn(&I::Item) -> bool,
{
    /// Create a new filter processor
    pub fn new(predicate: F) -> Self {
        Self {
            predicate: Arc::new(predicate),
            _phantom: PhantomData,
        }
    }
}

impl<F, I> Node for FilterProcessor<F, I>
where
    I: TrySequence,
    F: Fn(&I::Item) -> bool,
{
    type Role = TransformerRole;
    type Input = I;
    type Output = Filtered<I::Iter, F>;

    fn exec(&self, input: I) -> Result<Self::Output> {
        Ok(Filtered {
            iter: input.into_try_iter(),
            predicate: Arc::clone(&self.predicate),
        })
    }
}

impl<F, I> IterableNode for FilterProcessor<F, I>
where
    I: TrySequence,
    F: Fn(&I::Item) -> bool,
{
    type Item = I::Item;
}

/// Iterator returned by [`FilterProcessor`].
///
/// Failures drawn from the input are always kept.
pub struct Filtered<It, F> {
    iter: It,
    predicate: Arc<F>,
}

impl<It, F, S> Iterator for Filtered<It, F>
where
    It: Iterator<Item = Result<S>>,
    F: Fn(&S) -> bool,
{
    type Item = Result<S>;

    fn next(&mut self) -> Option<Result<S>> {
        let predicate = &self.predicate;
        self.iter.find(|item| match item {
            Ok(value) => predicate(value),
            Err(_) => true,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.iter.size_hint().1)
    }
}

impl<It, F, S> TrySequence for Filtered<It, F>
where
    It: Iterator<Item = Result<S>>,
    F: Fn(&S) -> bool,
{
    type Item = S;
    type Iter = Self;

    fn into_try_iter(self) -> Self {
        self
    }
}

/// Addition used by [`SumProcessor`] to fold a sequence.
///
/// Numbers add, vectors and strings concatenate.
pub trait Accumulate<Rhs = Self> {
    fn accumulate(self, rhs: Rhs) -> Self;
}

macro_rules! impl_accumulate_add {
    ($($t:ty),* $(,)?) => {$(
        impl Accumulate for $t {
            fn accumulate(self, rhs: $t) -> $t {
                self + rhs
            }
        }

        impl<'a> Accumulate<&'a $t> for $t {
            fn accumulate(self, rhs: &'a $t) -> $t {
                self + *rhs
            }
        }
    )*};
}

impl_accumulate_add!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, Duration,
);

impl<T> Accumulate for Vec<T> {
    fn accumulate(mut self, rhs: Vec<T>) -> Vec<T> {
        self.extend(rhs);
        self
    }
}

impl<'a, T: Clone> Accumulate<&'a [T]> for Vec<T> {
    fn accumulate(mut self, rhs: &'a [T]) -> Vec<T> {
        self.extend_from_slice(rhs);
        self
    }
}

impl Accumulate for String {
    fn accumulate(mut self, rhs: String) -> String {
        self.push_str(&rhs);
        self
    }
}

impl<'a> Accumulate<&'a str> for String {
    fn accumulate(mut self, rhs: &'a str) -> String {
        self.push_str(rhs);
        self
    }
}

/// A processor that reduces a sequence by addition from an initial value.
///
/// # Examples
///
/// ```rust
/// use pipeweld::prelude::*;
///
/// assert_eq!(SumProcessor::<_, i32>::new().call(vec![1, 2, 3, 4]).unwrap(), 10);
///
/// let joined = SumProcessor::with_initial(Vec::new());
/// assert_eq!(joined.call(vec![vec![0], vec![1, 2]]).unwrap(), vec![0, 1, 2]);
/// ```
pub struct SumProcessor<I, T> {
    initial: T,
    _phantom: PhantomData<fn(I)>,
}

impl<I, T> SumProcessor<I, T>
where
    I: TrySequence,
    T: Clone + Accumulate<I::Item>,
{
    /// Create a sum processor starting from zero
    pub fn new() -> Self
    where
        T: Zero,
    {
        Self::with_initial(T::zero())
    }

    /// Create a sum processor starting from `initial`
    pub fn with_initial(initial: T) -> Self {
        Self {
            initial,
            _phantom: PhantomData,
        }
    }
}

impl<I, T> Default for SumProcessor<I, T>
where
    I: TrySequence,
    T: Clone + Zero + Accumulate<I::Item>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I, T> Node for SumProcessor<I, T>
where
    I: TrySequence,
    T: Clone + Accumulate<I::Item>,
{
    type Role = TransformerRole;
    type Input = I;
    type Output = T;

    fn exec(&self, input: I) -> Result<T> {
        input
            .into_try_iter()
            .try_fold(self.initial.clone(), |acc, item| Ok(acc.accumulate(item?)))
    }
}

crate::pipeline::impl_connect_op!(
    [F, I, T] MapProcessor<F, I, T>,
    [F, I] FilterProcessor<F, I>,
    [I, T] SumProcessor<I, T>,
);

/// An iterable transformer applying `f` to each element of its input.
///
/// # Examples
///
/// ```rust
/// use pipeweld::prelude::*;
///
/// let plus_one = map(|x: i32| x + 1);
/// assert_eq!(plus_one.call(vec![0, 1, 3]).unwrap().collect::<Vec<_>>(), vec![1, 2, 4]);
/// ```
pub fn map<F, I, T>(f: F) -> Iterable<MapProcessor<F, I, T>>
where
    I: TrySequence,
    F: Fn(I::Item) -> T,
{
    Iterable::new(MapProcessor::new(f))
}

/// An iterable transformer keeping the elements for which `predicate` holds.
pub fn filter<F, I>(predicate: F) -> Iterable<FilterProcessor<F, I>>
where
    I: TrySequence,
    F: Fn(&I::Item) -> bool,
{
    Iterable::new(FilterProcessor::new(predicate))
}

/// A transformer summing its input sequence from zero.
pub fn sum<I, T>() -> SumProcessor<I, T>
where
    I: TrySequence,
    T: Clone + Zero + Accumulate<I::Item>,
{
    SumProcessor::new()
}
