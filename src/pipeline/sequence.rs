//! Sequences whose elements may fail.
//!
//! Iterable nodes hand their output to [`TrySequence`], which yields
//! `Result` elements. Plain collections yield only `Ok`. Lazy sequences
//! produced by other nodes ([`Drawn`](crate::pipeline::iterable::Drawn),
//! [`Mapped`](crate::processors::Mapped), ...) carry the failures raised by
//! their hooks, so a downstream stage sees them where it draws.
//!
//! Iterators without an impl can be adapted with [`Plain`] or [`Fallible`].

use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::ops::{Range, RangeInclusive};

use crate::core::error::Result;

/// A sequence of `Result<Self::Item>`.
pub trait TrySequence {
    /// The element type on success
    type Item;
    /// The iterator drawing the elements
    type Iter: Iterator<Item = Result<Self::Item>>;

    fn into_try_iter(self) -> Self::Iter;
}

/// Iterator over a collection whose elements cannot fail.
#[derive(Debug, Clone)]
pub struct Infallible<I> {
    iter: I,
}

impl<I: Iterator> Iterator for Infallible<I> {
    type Item = Result<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<I: FusedIterator> FusedIterator for Infallible<I> {}

/// Adapts any iterable whose elements cannot fail.
///
/// # Examples
///
/// ```rust
/// use pipeweld::prelude::*;
///
/// let words = std::iter::repeat("ab").take(3);
/// let joined = SumProcessor::with_initial(String::new()).call(Plain(words)).unwrap();
/// assert_eq!(joined, "ababab");
/// ```
#[derive(Debug, Clone)]
pub struct Plain<I>(pub I);

impl<I: IntoIterator> TrySequence for Plain<I> {
    type Item = I::Item;
    type Iter = Infallible<I::IntoIter>;

    fn into_try_iter(self) -> Self::Iter {
        Infallible {
            iter: self.0.into_iter(),
        }
    }
}

/// Adapts an iterable that already yields `Result` elements.
#[derive(Debug, Clone)]
pub struct Fallible<I>(pub I);

impl<I, T> TrySequence for Fallible<I>
where
    I: IntoIterator<Item = Result<T>>,
{
    type Item = T;
    type Iter = I::IntoIter;

    fn into_try_iter(self) -> Self::Iter {
        self.0.into_iter()
    }
}

macro_rules! impl_plain_sequence {
    ($([$($gen:tt)*] $ty:ty),* $(,)?) => {$(
        impl<$($gen)*> TrySequence for $ty
        where
            $ty: IntoIterator,
        {
            type Item = <$ty as IntoIterator>::Item;
            type Iter = Infallible<<$ty as IntoIterator>::IntoIter>;

            fn into_try_iter(self) -> Self::Iter {
                Infallible {
                    iter: self.into_iter(),
                }
            }
        }
    )*};
}

impl_plain_sequence!(
    [T] Vec<T>,
    [T] VecDeque<T>,
    [T] Option<T>,
    [T, const N: usize] [T; N],
    ['a, T] &'a [T],
    ['a, T] &'a Vec<T>,
    [T] Range<T>,
    [T] RangeInclusive<T>,
    [T] std::vec::IntoIter<T>,
    ['a, T] std::slice::Iter<'a, T>,
    [I, F] std::iter::Map<I, F>,
    [I, P] std::iter::Filter<I, P>,
    [I] std::iter::Take<I>,
    [A, B] std::iter::Chain<A, B>,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;

    fn drain<S: TrySequence>(seq: S) -> Result<Vec<S::Item>> {
        seq.into_try_iter().collect()
    }

    #[test]
    fn test_collections_never_fail() {
        assert_eq!(drain(vec![1, 2, 3]).unwrap(), vec![1, 2, 3]);
        assert_eq!(drain(0..3).unwrap(), vec![0, 1, 2]);
        assert_eq!(drain(["a", "b"]).unwrap(), vec!["a", "b"]);
        assert_eq!(drain((1..=4).map(|x| x * 2)).unwrap(), vec![2, 4, 6, 8]);
        assert!(drain(None::<u8>).unwrap().is_empty());
    }

    #[test]
    fn test_plain_wraps_any_iterator() {
        let letters = Plain("abc".chars());
        assert_eq!(drain(letters).unwrap(), vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_fallible_keeps_errors() {
        let items: Vec<Result<i32>> = vec![Ok(1), Err(Error::custom("gap")), Ok(3)];
        let mut iter = Fallible(items).into_try_iter();
        assert_eq!(iter.next().unwrap().unwrap(), 1);
        assert_eq!(iter.next().unwrap().unwrap_err().to_string(), "gap");
    }
}
