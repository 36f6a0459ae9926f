//! Runtime-checked composition.
//!
//! [`AnyNode`] erases a node's concrete type but keeps its role as a tag.
//! Joining two of them checks the roles when the join happens and reports
//! [`Error::Unsupported`] for combinations the static API would refuse to
//! compile.

use std::fmt;
use std::ops::BitOr;

use crate::core::{ConsumerRole, Error, Node, ProducerRole, Result, Role, TransformerRole};
use crate::pipeline::Chain;

/// A boxed node of role `K`.
pub type BoxNode<K, S, T> = Box<dyn Node<Role = K, Input = S, Output = T>>;

/// A node of any role, taking `S` (ignored by producers) and returning `T`.
pub enum AnyNode<S, T> {
    Producer(BoxNode<ProducerRole, (), T>),
    Transformer(BoxNode<TransformerRole, S, T>),
    Consumer(BoxNode<ConsumerRole, S, T>),
}

/// The result of a runtime join: a new node, or a terminal value.
pub enum Connected<S, T> {
    Node(AnyNode<S, T>),
    Value(T),
}

impl<S: 'static, T: 'static> AnyNode<S, T> {
    pub fn producer<N>(node: N) -> Self
    where
        N: Node<Role = ProducerRole, Input = (), Output = T> + 'static,
    {
        AnyNode::Producer(Box::new(node))
    }

    pub fn transformer<N>(node: N) -> Self
    where
        N: Node<Role = TransformerRole, Input = S, Output = T> + 'static,
    {
        AnyNode::Transformer(Box::new(node))
    }

    pub fn consumer<N>(node: N) -> Self
    where
        N: Node<Role = ConsumerRole, Input = S, Output = T> + 'static,
    {
        AnyNode::Consumer(Box::new(node))
    }

    /// The role tag of the wrapped node.
    pub fn role(&self) -> Role {
        match self {
            AnyNode::Producer(_) => Role::Producer,
            AnyNode::Transformer(_) => Role::Transformer,
            AnyNode::Consumer(_) => Role::Consumer,
        }
    }

    /// Joins `self` to `next`, checking the roles.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] naming both roles when the join is not one of
    /// producer to transformer, producer to consumer, transformer to
    /// transformer, or transformer to consumer. A producer to consumer join
    /// runs the pipeline, so its failures are returned here as well.
    pub fn try_connect<U: 'static>(self, next: AnyNode<T, U>) -> Result<Connected<S, U>> {
        match (self, next) {
            (AnyNode::Producer(producer), AnyNode::Transformer(transformer)) => Ok(
                Connected::Node(AnyNode::Producer(Box::new(Chain::append(producer, transformer)))),
            ),
            (AnyNode::Producer(producer), AnyNode::Consumer(consumer)) => {
                let produced = producer.call(())?;
                consumer.call(produced).map(Connected::Value)
            }
            (AnyNode::Transformer(first), AnyNode::Transformer(second)) => {
                let chain: Chain<_, _, TransformerRole> = Chain::new(first, second);
                Ok(Connected::Node(AnyNode::Transformer(Box::new(chain))))
            }
            (AnyNode::Transformer(transformer), AnyNode::Consumer(consumer)) => Ok(
                Connected::Node(AnyNode::Consumer(Box::new(Chain::prepend(consumer, transformer)))),
            ),
            (left, right) => {
                let (left, right) = (left.role(), right.role());
                tracing::debug!(%left, %right, "rejected connect");
                Err(Error::unsupported(left, right))
            }
        }
    }

    /// Calls the wrapped node. A producer ignores `input`.
    pub fn call(&self, input: S) -> Result<T> {
        match self {
            AnyNode::Producer(node) => node.call(()),
            AnyNode::Transformer(node) => node.call(input),
            AnyNode::Consumer(node) => node.call(input),
        }
    }
}

impl<S: 'static, T: 'static, U: 'static> BitOr<AnyNode<T, U>> for AnyNode<S, T> {
    type Output = Result<Connected<S, U>>;

    fn bitor(self, rhs: AnyNode<T, U>) -> Self::Output {
        self.try_connect(rhs)
    }
}

impl<S: 'static, T: 'static> fmt::Debug for AnyNode<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyNode").field(&self.role()).finish()
    }
}

impl<S, T> Connected<S, T> {
    /// The joined node, if the join produced one.
    pub fn into_node(self) -> Option<AnyNode<S, T>> {
        match self {
            Connected::Node(node) => Some(node),
            Connected::Value(_) => None,
        }
    }

    /// The pipeline's result, if the join ran it.
    pub fn into_value(self) -> Option<T> {
        match self {
            Connected::Node(_) => None,
            Connected::Value(value) => Some(value),
        }
    }
}
