//! Error types for the node system.

use std::sync::Arc;

use crate::core::traits::Role;

/// The main error type for pipeweld.
///
/// Failures raised by a wrapped function or by a hook are returned to the
/// caller exactly as they were raised. The framework itself only ever
/// produces [`Error::Unsupported`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Two nodes were connected in a combination the roles do not allow
    #[error("unsupported roles for connect: '{left}' and '{right}'")]
    Unsupported { left: Role, right: Role },

    /// A wrapped function or hook failed with a foreign error type
    #[error("node failed: {0}")]
    Node(Arc<dyn std::error::Error + Send + Sync>),

    /// A custom error with a message
    #[error("{0}")]
    Custom(String),
}

// Convenience constructors
impl Error {
    /// Create the usage error raised by `connect`
    pub fn unsupported(left: Role, right: Role) -> Self {
        Error::Unsupported { left, right }
    }

    /// Create a node error from any error type
    pub fn node<E: std::error::Error + Send + Sync + 'static>(error: E) -> Self {
        Error::Node(Arc::new(error))
    }

    /// Create a custom error with a message
    pub fn custom<S: Into<String>>(message: S) -> Self {
        Error::Custom(message.into())
    }

    /// Returns `true` for the usage error raised by `connect`.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported { .. })
    }

    /// Attempts to view a wrapped foreign error as a concrete type.
    pub fn downcast_ref<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Error::Node(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for Error {
    fn from(e: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Error::Node(Arc::from(e))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Custom(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Custom(s.to_string())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Helper trait for converting foreign errors into our Error type
pub trait IntoError<T> {
    fn into_node_error(self) -> Result<T>;
}

impl<T, E> IntoError<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_node_error(self) -> Result<T> {
        self.map_err(Error::node)
    }
}
