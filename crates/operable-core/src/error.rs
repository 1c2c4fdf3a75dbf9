//! Error types for Operable core.

use std::fmt;

/// Environment precondition violations.
///
/// Raised by [`UiContext::ensure_live`](crate::UiContext::ensure_live) when
/// an operation runs outside a live UI context. These indicate a programming
/// error in the composing layer and are always surfaced synchronously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The operation ran on a thread other than the UI thread.
    WrongThread {
        /// Name of the operation that was attempted.
        operation: String,
    },
    /// The operation ran after the context was shut down.
    ShutDown {
        /// Name of the operation that was attempted.
        operation: String,
    },
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongThread { operation } => {
                write!(f, "{operation} must be performed on the UI thread")
            }
            Self::ShutDown { operation } => {
                write!(f, "{operation} invoked after the UI context was shut down")
            }
        }
    }
}

impl std::error::Error for ContextError {}

/// A specialized Result type for Operable core operations.
pub type Result<T> = std::result::Result<T, ContextError>;
