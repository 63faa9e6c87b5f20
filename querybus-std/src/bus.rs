//! Builder-then-freeze query bus.
//!
//! Handlers are registered on a [`QueryBusBuilder`], which is then frozen
//! into an immutable [`QueryBus`]. The frozen bus only takes `&self`, so it
//! can be shared across threads (e.g. behind an `Arc`) and dispatched to
//! concurrently without locking.

use crate::{table::HandlerTable, typed::typed};
use querybus_core::{
    BoxError, BusError, IntoResponse, Query, QueryHandler, QueryName, Response,
    resolve_query_name,
};
use std::any::Any;

/// Builder for constructing a [`QueryBus`].
///
/// # Example
/// ```
/// use querybus_core::{BoxError, Query};
/// use querybus_std::QueryBus;
///
/// #[derive(Default)]
/// struct CountUsers;
/// impl Query for CountUsers {}
///
/// let mut builder = QueryBus::<()>::builder();
/// builder
///     .register_fn(|_ctx, _query: CountUsers| Ok::<_, BoxError>(3usize))
///     .unwrap();
/// let bus = builder.build();
///
/// assert_eq!(bus.ask::<_, usize>(&(), CountUsers).unwrap(), 3);
/// ```
pub struct QueryBusBuilder<C = ()> {
    table: HandlerTable<C>,
}

impl<C: 'static> QueryBusBuilder<C> {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self {
            table: HandlerTable::new(),
        }
    }

    /// Create an empty builder with room for `capacity` handlers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HandlerTable::with_capacity(capacity),
        }
    }

    /// Bind `handler` to the name resolved from `sample`.
    ///
    /// The sample only carries type identity (or a self-reported name); it is
    /// not kept. Fails with [`BusError::DuplicateHandler`] if the name is
    /// already bound, in which case the existing handler stays.
    pub fn register<Q, H>(&mut self, sample: &Q, handler: H) -> Result<(), BusError>
    where
        Q: Query + ?Sized,
        H: QueryHandler<C>,
    {
        self.table.register(sample, handler)
    }

    /// Register a typed function for queries of type `Q`.
    ///
    /// `Q::default()` serves as the sample. For a query without a `Default`,
    /// use `register(&sample, typed(f))`.
    pub fn register_fn<Q, R, F>(&mut self, f: F) -> Result<(), BusError>
    where
        Q: Query + Default,
        R: IntoResponse + 'static,
        F: Fn(&C, Q) -> R + Send + Sync + 'static,
    {
        self.register(&Q::default(), typed::<C, Q, R, F>(f))
    }

    /// Check if a handler is bound for the name `sample` resolves to.
    pub fn contains<Q: Query + ?Sized>(&self, sample: &Q) -> bool {
        self.table.contains(resolve_query_name(sample).as_str())
    }

    /// Get the number of registered handlers.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if the builder has no handlers.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Freeze the registrations into a [`QueryBus`].
    pub fn build(self) -> QueryBus<C> {
        #[cfg(feature = "tracing")]
        tracing::debug!(handlers = self.table.len(), "query bus frozen");
        QueryBus::from_table(self.table)
    }
}

impl<C: 'static> Default for QueryBusBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable, thread-safe query bus.
///
/// Created by [`QueryBusBuilder::build`]. A `QueryBus` is itself a
/// [`QueryHandler`], so one bus can be mounted inside another.
pub struct QueryBus<C = ()> {
    table: HandlerTable<C>,
}

impl<C: 'static> QueryBus<C> {
    pub(crate) fn from_table(table: HandlerTable<C>) -> Self {
        Self { table }
    }

    /// Start building a bus.
    pub fn builder() -> QueryBusBuilder<C> {
        QueryBusBuilder::new()
    }

    /// Route `query` to its handler and return the handler's response.
    pub fn dispatch<Q: Query>(&self, ctx: &C, query: Q) -> Response {
        self.dispatch_boxed(ctx, Box::new(query))
    }

    /// Route an already type-erased query.
    ///
    /// The response is exactly what the handler returned. With no handler
    /// bound, the response carries [`BusError::UnhandledQuery`] and no answer.
    pub fn dispatch_boxed(&self, ctx: &C, query: Box<dyn Query>) -> Response {
        let name = resolve_query_name(&*query);
        match self.table.get(name.as_str()) {
            Some(handler) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(query = %name, "dispatching query");
                handler.handle(ctx, query)
            }
            None => Response::failed(BusError::UnhandledQuery { name }),
        }
    }

    /// Dispatch and take the answer as `O`.
    pub fn ask<Q: Query, O: Any>(&self, ctx: &C, query: Q) -> Result<O, BoxError> {
        self.dispatch(ctx, query).downcast()
    }

    /// Check if a handler is bound for the name `query` resolves to.
    pub fn handles<Q: Query + ?Sized>(&self, query: &Q) -> bool {
        self.table.contains(resolve_query_name(query).as_str())
    }

    /// Iterate over the bound names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &QueryName> {
        self.table.names()
    }

    /// Get the number of registered handlers.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if the bus has no handlers.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<C: 'static> QueryHandler<C> for QueryBus<C> {
    fn handle(&self, ctx: &C, query: Box<dyn Query>) -> Response {
        self.dispatch_boxed(ctx, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querybus_core::handler_fn;

    #[derive(Default)]
    struct Ping;
    impl Query for Ping {}

    #[derive(Default)]
    struct Unknown;
    impl Query for Unknown {}

    #[test]
    fn test_register_then_dispatch() {
        let mut builder = QueryBus::<()>::builder();
        builder
            .register(&Ping, handler_fn(|_: &(), _| Response::answered("pong")))
            .unwrap();
        assert!(builder.contains(&Ping));
        let bus = builder.build();

        assert_eq!(bus.ask::<_, &str>(&(), Ping).unwrap(), "pong");
        assert!(bus.handles(&Ping));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn test_unhandled_query() {
        let bus: QueryBus = QueryBus::builder().build();
        let response = bus.dispatch(&(), Unknown);
        assert!(response.answer().is_none());
        assert!(matches!(
            response.bus_error(),
            Some(BusError::UnhandledQuery { name }) if *name == resolve_query_name(&Unknown)
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let mut builder = QueryBusBuilder::<()>::with_capacity(1);
        builder.register_fn(|_, _: Ping| Ok::<_, BoxError>(1u8)).unwrap();
        let err = builder
            .register_fn(|_, _: Ping| Ok::<_, BoxError>(2u8))
            .unwrap_err();
        assert!(matches!(err, BusError::DuplicateHandler { .. }));

        let bus = builder.build();
        assert_eq!(bus.ask::<_, u8>(&(), Ping).unwrap(), 1);
    }

    #[test]
    fn test_register_typed_without_default() {
        struct Lookup(u32);
        impl Query for Lookup {}

        let mut builder = QueryBus::<()>::builder();
        builder
            .register(
                &Lookup(0),
                typed(|_: &(), q: Lookup| Ok::<_, BoxError>(q.0 + 1)),
            )
            .unwrap();
        let bus = builder.build();

        assert_eq!(bus.ask::<_, u32>(&(), Lookup(41)).unwrap(), 42);
    }

    #[test]
    fn test_bus_as_handler() {
        let mut inner = QueryBus::<()>::builder();
        inner.register_fn(|_, _: Ping| Ok::<_, BoxError>(42i32)).unwrap();

        let mut outer = QueryBus::<()>::builder();
        outer.register(&Ping, inner.build()).unwrap();
        let outer = outer.build();

        assert_eq!(outer.ask::<_, i32>(&(), Ping).unwrap(), 42);
    }
}
