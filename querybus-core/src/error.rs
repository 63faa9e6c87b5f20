//! Error types for querybus.
//!
//! - [`BusError`] - Conditions raised by the bus and its adapters
//! - [`BoxError`] - Opaque errors produced by handler logic
//!
//! Handler errors are never wrapped in [`BusError`]. They travel from the
//! handler to the caller as the same [`BoxError`] the handler returned.

use crate::query::QueryName;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the dispatch machinery itself.
///
/// Match on the variant to tell them apart; the message text is for humans.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BusError {
    /// No handler is bound to the resolved query name.
    #[error("unhandled query: {name}")]
    UnhandledQuery {
        /// The resolved name that had no binding.
        name: QueryName,
    },

    /// A handler is already registered for this query name.
    #[error("there is already a query handler registered for {name}")]
    DuplicateHandler {
        /// The name that was already bound.
        name: QueryName,
    },

    /// A typed handler received a query of a different concrete type.
    #[error("unable to convert query to {expected}")]
    QueryTypeMismatch {
        /// The type the handler was declared for.
        expected: &'static str,
    },

    /// The handler answered, but not with the requested type.
    #[error("query answer is not a {expected}")]
    UnexpectedAnswer {
        /// The type the caller asked for.
        expected: &'static str,
    },
}

impl BusError {
    /// Returns the bus error carried by an opaque error, if it is one.
    pub fn from_boxed(err: &BoxError) -> Option<&BusError> {
        err.downcast_ref::<BusError>()
    }
}
