//! # Query Handlers
//!
//! A handler is the terminal point of a dispatch: it receives the caller's
//! context and the type-erased query, and produces a [`Response`].
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `handler_fn(|ctx, query| ...)` for hand-written boxing
//! 2. **Struct implementation**: `impl QueryHandler<Ctx> for MyHandler`
//! 3. **Adapters**: the typed and reflective adapters in `querybus-std`
//!    build handlers from ordinary functions
//!
//! The context type `C` is chosen by the application. It is forwarded to the
//! handler untouched, so cancellation or deadlines it carries are the
//! handler's to honor.

use crate::{query::Query, response::Response};
use std::sync::Arc;

/// The capability of answering a query.
///
/// Object safe; registries store handlers as `Arc<dyn QueryHandler<C>>`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle queries with context `{C}`",
    label = "missing `QueryHandler<{C}>` implementation",
    note = "Wrap a closure with `handler_fn`, or build a handler with `typed` or `wrap_dynamic`."
)]
pub trait QueryHandler<C = ()>: Send + Sync + 'static {
    /// Answer the query.
    fn handle(&self, ctx: &C, query: Box<dyn Query>) -> Response;
}

impl<C: 'static> QueryHandler<C> for Box<dyn QueryHandler<C>> {
    fn handle(&self, ctx: &C, query: Box<dyn Query>) -> Response {
        (**self).handle(ctx, query)
    }
}

impl<C, H> QueryHandler<C> for Arc<H>
where
    C: 'static,
    H: QueryHandler<C> + ?Sized,
{
    fn handle(&self, ctx: &C, query: Box<dyn Query>) -> Response {
        (**self).handle(ctx, query)
    }
}

/// A handler backed by a closure over the type-erased query.
#[derive(Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap a closure as a [`QueryHandler`].
///
/// # Example
///
/// ```rust
/// use querybus_core::{Query, QueryHandler, Response, handler_fn};
///
/// struct Ping;
/// impl Query for Ping {}
///
/// let handler = handler_fn(|_ctx: &(), _query| Response::answered("pong"));
/// let response = handler.handle(&(), Box::new(Ping));
/// assert_eq!(response.answer_as::<&str>(), Some(&"pong"));
/// ```
pub fn handler_fn<C, F>(f: F) -> HandlerFn<F>
where
    F: Fn(&C, Box<dyn Query>) -> Response + Send + Sync + 'static,
{
    HandlerFn { f }
}

impl<C, F> QueryHandler<C> for HandlerFn<F>
where
    F: Fn(&C, Box<dyn Query>) -> Response + Send + Sync + 'static,
{
    fn handle(&self, ctx: &C, query: Box<dyn Query>) -> Response {
        (self.f)(ctx, query)
    }
}
