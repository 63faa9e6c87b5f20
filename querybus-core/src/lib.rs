//! # querybus-core
//!
//! Core traits for the querybus in-process query dispatcher.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! code that defines queries or handlers without needing the registry
//! implementations in `querybus-std`.
//!
//! # Vocabulary
//!
//! - [`Query`] - A request routed to exactly one handler
//! - [`QueryName`] - The key a query is routed by, see [`resolve_query_name`]
//! - [`QueryHandler`] - The capability of answering a query
//! - [`Response`] - A handler's answer and error, either of which may be absent
//!
//! # Error Types
//!
//! - [`BusError`] - Conditions raised by the dispatch machinery
//! - [`BoxError`] - Opaque errors from handler logic, passed through unchanged

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod handler;
mod query;
mod response;

// Re-exports
pub use error::{BoxError, BusError};
pub use handler::{HandlerFn, QueryHandler, handler_fn};
pub use query::{AsAny, Query, QueryName, TypeIdentity, resolve_query_name};
pub use response::{Answer, IntoResponse, Response};
