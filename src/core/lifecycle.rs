//! The scoped call protocol shared by every node.
//!
//! [`Scope`] is acquired by running a node's `before` hook and releases by
//! running its `after` hook. Release happens exactly once: explicitly through
//! [`Scope::exit`], where a finalizer failure replaces the call's result, or
//! implicitly on drop, where it can only be logged.

use std::ops::Deref;

use crate::core::error::{Error, Result};
use crate::core::traits::{Node, Role};

/// How a scoped call ended, as seen by the finalizer.
#[derive(Debug, Clone, Copy)]
pub enum Exit<'a> {
    /// The primitive and the `computed` hook succeeded
    Completed,
    /// The primitive or the `computed` hook failed with this error
    Failed(&'a Error),
    /// The scope was dropped without an explicit exit: an unwinding panic,
    /// or a lazy sequence released before it was exhausted
    Abandoned,
}

impl<'a> Exit<'a> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Exit::Completed)
    }

    /// The failure being propagated, if any.
    pub fn error(&self) -> Option<&'a Error> {
        match self {
            Exit::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// An entered lifecycle scope for one call of a node.
///
/// Generic over how the node is held so that a borrowed node can be scoped
/// for a plain call and a shared node can be scoped for the lifetime of a
/// lazy sequence.
pub struct Scope<P>
where
    P: Deref,
    P::Target: Node,
{
    node: P,
    armed: bool,
}

impl<P> Scope<P>
where
    P: Deref,
    P::Target: Node,
{
    /// Runs the `before` hook and, if it succeeds, arms the finalizer.
    pub fn enter(node: P, input: &<P::Target as Node>::Input) -> Result<Self> {
        let role = node.role();
        tracing::trace!(%role, "entering node scope");
        if let Err(err) = node.before(input) {
            record_call(role, false);
            return Err(err);
        }
        Ok(Self { node, armed: true })
    }

    /// The node this scope belongs to.
    pub fn node(&self) -> &P::Target {
        &self.node
    }

    /// Runs the finalizer with the outcome of `result`.
    ///
    /// A finalizer failure wins over `result`, including over an error
    /// already in flight.
    pub fn exit<T>(mut self, result: Result<T>) -> Result<T> {
        self.armed = false;
        let role = self.node.role();
        let exit = match &result {
            Ok(_) => Exit::Completed,
            Err(err) => Exit::Failed(err),
        };
        let finalized = self.node.after(exit);
        tracing::trace!(
            %role,
            ok = result.is_ok(),
            finalizer_ok = finalized.is_ok(),
            "leaving node scope"
        );

        let result = match finalized {
            Ok(()) => result,
            Err(err) => Err(err),
        };
        record_call(role, result.is_ok());
        result
    }

    /// Runs the finalizer for an early release, returning its failure.
    pub fn abandon(mut self) -> Result<()> {
        self.armed = false;
        let role = self.node.role();
        tracing::trace!(%role, "abandoning node scope");
        let finalized = self.node.after(Exit::Abandoned);
        record_call(role, finalized.is_ok());
        finalized
    }
}

impl<P> Drop for Scope<P>
where
    P: Deref,
    P::Target: Node,
{
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        let role = self.node.role();
        if let Err(err) = self.node.after(Exit::Abandoned) {
            tracing::warn!(%role, error = %err, "finalizer failed while releasing node scope");
            record_call(role, false);
        } else {
            record_call(role, true);
        }
    }
}

/// Calls `node` with `input` under the full lifecycle contract.
pub fn call<N>(node: &N, input: N::Input) -> Result<N::Output>
where
    N: Node + ?Sized,
{
    let scope = Scope::enter(node, &input)?;
    let result = node
        .exec(input)
        .and_then(|output| node.computed(&output).map(|()| output));
    scope.exit(result)
}

#[cfg(feature = "metrics")]
fn record_call(role: Role, ok: bool) {
    metrics::counter!("pipeweld_node_calls_total", "role" => role.as_str()).increment(1);
    if !ok {
        metrics::counter!("pipeweld_node_failures_total", "role" => role.as_str()).increment(1);
    }
}

#[cfg(not(feature = "metrics"))]
fn record_call(_role: Role, _ok: bool) {}
