//! Error handling for the navigation stack.
//!
//! Navigation operations are fire-and-forget: once an operation has been
//! accepted by a backend its effects only show up in the resulting stack.
//! The errors defined here are the ones raised *synchronously* to the caller:
//!
//! - **Usage errors**: the caller broke an invariant, such as removing the
//!   root page or asking for the current component before a root exists.
//! - **Unimplemented operations**: the backing navigator does not support
//!   the requested operation (see
//!   [`NavigationBackend`](crate::navigator::NavigationBackend)).
//!
//! Pops that find nothing to remove are *not* errors; they complete quietly.
//!
//! # Examples
//!
//! ```
//! use gpui_stack_navigator::error::NavigationError;
//!
//! let err = NavigationError::NotImplemented {
//!     operation: "pop_to_root",
//!     backend: "WindowNavigator",
//! };
//! assert!(err.is_not_implemented());
//! assert_eq!(
//!     err.to_string(),
//!     "Operation 'pop_to_root' is not implemented by WindowNavigator"
//! );
//! ```

use crate::page::PageKey;
use std::fmt;

/// Errors raised synchronously by navigation APIs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// Attempted to destroy or pop the root page of the root layer.
    RootPageRemoval { key: PageKey },

    /// No root page has been set yet.
    NoRootPage,

    /// The backend does not implement the requested operation.
    NotImplemented {
        operation: &'static str,
        backend: &'static str,
    },

    /// The navigator outlived the stack it was created for.
    BackendReleased,

    /// No component is registered for the descriptor.
    ComponentNotFound { path: String },
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigationError::RootPageRemoval { key } => {
                write!(f, "Cannot remove the root page ({})", key)
            }
            NavigationError::NoRootPage => write!(f, "No root page has been set"),
            NavigationError::NotImplemented { operation, backend } => {
                write!(
                    f,
                    "Operation '{}' is not implemented by {}",
                    operation, backend
                )
            }
            NavigationError::BackendReleased => {
                write!(f, "Navigator is no longer attached to a navigation stack")
            }
            NavigationError::ComponentNotFound { path } => {
                write!(f, "No component registered for '{}'", path)
            }
        }
    }
}

impl std::error::Error for NavigationError {}

impl NavigationError {
    /// Build a [`NotImplemented`](Self::NotImplemented) error.
    pub const fn not_implemented(operation: &'static str, backend: &'static str) -> Self {
        Self::NotImplemented { operation, backend }
    }

    /// Check if this error reports an invariant violation by the caller.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            NavigationError::RootPageRemoval { .. }
                | NavigationError::NoRootPage
                | NavigationError::BackendReleased
        )
    }

    /// Check if this error reports an unsupported operation.
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, NavigationError::NotImplemented { .. })
    }
}

/// Result type used across the crate.
pub type Result<T, E = NavigationError> = std::result::Result<T, E>;
