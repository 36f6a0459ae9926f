//! # Typed pipe composition for Rust
//!
//! This crate lets plain functions be wrapped into nodes and joined into
//! pipelines with a connect operator (`|`), with the joins checked by the
//! type system.
//!
//! ## Core Concepts
//!
//! - **Producer**: takes no input and originates a pipeline
//! - **Transformer**: takes one input and returns one output
//! - **Consumer**: takes one input and ends a pipeline
//! - **Lifecycle**: every call runs `before`, the primitive, `computed`, and a
//!   finalizer (`after`) that runs on every exit path
//! - **Iterable**: a node whose output is a lazy sequence of `Result`
//!   elements, with a hook for every drawn element
//!
//! Connecting a producer to a consumer runs the pipeline immediately.
//!
//! ## Example
//!
//! ```rust
//! use pipeweld::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let length = from_fn(|| Ok(0))
//!         | transformer_from_fn(|x: i32| Ok(x.to_string()))
//!         | consumer_from_fn(|s: String| Ok(s.len()));
//!     assert_eq!(length?, 1);
//!
//!     let odd_squares = iter_constant(1..=5)
//!         | filter(|x: &u32| x % 2 == 1)
//!         | map(|x: u32| x * x)
//!         | IdentitySink::new();
//!     assert_eq!(odd_squares?.collect::<Result<Vec<_>>>()?, vec![1, 9, 25]);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod pipeline;
pub mod processors;
pub mod sinks;
pub mod sources;
pub mod util;

// Re-export commonly used items
pub mod prelude {
    pub use crate::core::{
        ConsumerRole, Error, Exit, IntoError, IterableNode, Node, NodeExt, ProducerRole, Result,
        Role, TransformerRole,
    };
    pub use crate::pipeline::dynamic::{AnyNode, Connected};
    pub use crate::pipeline::iterable::{Drawn, Iterable};
    pub use crate::pipeline::sequence::{Fallible, Plain, TrySequence};
    pub use crate::pipeline::Chain;
    pub use crate::processors::{
        filter, map, sum, Accumulate, FilterProcessor, MapProcessor, SumProcessor,
    };
    pub use crate::sinks::IdentitySink;
    pub use crate::sources::{constant, iter_constant, ConstantSource};
    pub use crate::util::{
        consumer_from_fn, from_fn, transformer_from_fn, FnConsumer, FnProducer, FnTransformer,
    };
}

// Re-export main error type
pub use crate::core::error::{Error, Result};

#[cfg(feature = "metrics")]
pub use util::metrics;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
