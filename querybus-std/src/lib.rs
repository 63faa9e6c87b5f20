//! # querybus-std
//!
//! Standard implementations for the querybus query dispatcher.
//!
//! This crate provides:
//! - **Frozen registry**: [`QueryBusBuilder`] → [`QueryBus`], registration
//!   first, then lock-free dispatch from any number of threads
//! - **Live registry**: [`LiveQueryBus`], registration and dispatch through
//!   `&self` behind a reader-writer lock
//! - **Typed adapter**: [`typed`], registers `Fn(&C, Q) -> R` directly
//! - **Reflective adapter**: [`reflect::wrap_dynamic`], for function values
//!   whose shape is only known at runtime
//! - **Testing utilities**: [`testing`]
//!
//! # Choosing a Bus
//!
//! | Bus | Registration | Dispatch |
//! |-----|--------------|----------|
//! | `QueryBus` | via `QueryBusBuilder`, before `build()` | `&self`, no locking |
//! | `LiveQueryBus` | `&self`, any time | `&self`, read lock while looking up |

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use querybus_core;

// Modules
pub mod bus;
pub mod live;
pub mod reflect;
pub mod table;
pub mod testing;
pub mod typed;

pub use bus::{QueryBus, QueryBusBuilder};
pub use live::LiveQueryBus;
pub use reflect::{DynamicFn, ReflectiveHandler, wrap_dynamic};
pub use table::{HandlerTable, SharedHandler};
pub use typed::{TypedHandler, typed};
