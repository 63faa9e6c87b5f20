//! # querybus - In-Process Query Dispatch
//!
//! `querybus` routes a query value to the single handler registered for it
//! and hands back the handler's answer. Queries are routed by name: the name
//! a query reports about itself, or else one derived from its type.
//!
//! ## Quick Start
//!
//! ```rust
//! use querybus::{BoxError, Query, QueryBus};
//!
//! #[derive(Default, Query)]
//! #[query(name = "users/GetByID")]
//! struct GetUserById {
//!     id: u64,
//! }
//!
//! #[derive(Debug, PartialEq)]
//! struct User {
//!     name: String,
//! }
//!
//! let mut builder = QueryBus::<()>::builder();
//! builder
//!     .register_fn(|_ctx, query: GetUserById| {
//!         Ok::<_, BoxError>(User { name: format!("user-{}", query.id) })
//!     })
//!     .unwrap();
//! let bus = builder.build();
//!
//! let user: User = bus.ask(&(), GetUserById { id: 1 }).unwrap();
//! assert_eq!(user.name, "user-1");
//! ```
//!
//! ## Two Phases
//!
//! Register everything on a [`QueryBusBuilder`], then [`build`] it into a
//! [`QueryBus`] that is shared read-only. If handlers must be added while
//! queries are already flowing, use [`LiveQueryBus`] instead.
//!
//! [`build`]: QueryBusBuilder::build

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use querybus_core::{
    // Response
    Answer,
    // Error types
    BoxError,
    BusError,
    // Handler
    HandlerFn,
    IntoResponse,
    // Query
    Query,
    QueryHandler,
    QueryName,
    Response,
    TypeIdentity,
    handler_fn,
    resolve_query_name,
};

// Registries
pub use querybus_std::{HandlerTable, LiveQueryBus, QueryBus, QueryBusBuilder, SharedHandler};

// Adapters
pub use querybus_std::{TypedHandler, typed};

/// Reflective adapter for dynamically shaped functions.
pub mod reflect {
    pub use querybus_std::reflect::{DynamicFn, ReflectiveHandler, Value, wrap_dynamic};
}

/// Testing utilities.
pub mod testing {
    pub use querybus_std::testing::{CountingHandler, RecordingHandler};
}

/// Prelude module - common imports for querybus.
///
/// # Usage
///
/// ```rust
/// use querybus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, BusError, IntoResponse, LiveQueryBus, Query, QueryBus, QueryBusBuilder,
        QueryHandler, Response, handler_fn, typed,
    };
    pub use crate::reflect::wrap_dynamic;
}

#[cfg(feature = "macros")]
pub use querybus_macros::Query;
