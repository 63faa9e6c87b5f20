//! A query bus that stays open for registration while it dispatches.
//!
//! [`LiveQueryBus`] guards its table with a reader-writer lock, so `register`
//! and `dispatch` both take `&self`. The lock is released before a handler
//! runs; a handler may therefore register further handlers on the same bus.
//! Call [`LiveQueryBus::freeze`] once setup is over to drop the lock entirely.

use crate::{bus::QueryBus, table::HandlerTable, typed::typed};
use querybus_core::{
    BoxError, BusError, IntoResponse, Query, QueryHandler, Response, resolve_query_name,
};
use std::{
    any::Any,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// A lock-guarded query bus that accepts registrations at any time.
pub struct LiveQueryBus<C = ()> {
    table: RwLock<HandlerTable<C>>,
}

impl<C: 'static> LiveQueryBus<C> {
    /// Create a new empty bus.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(HandlerTable::new()),
        }
    }

    // A panicking handler never holds the lock, so a poisoned table is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HandlerTable<C>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HandlerTable<C>> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind `handler` to the name resolved from `sample`.
    pub fn register<Q, H>(&self, sample: &Q, handler: H) -> Result<(), BusError>
    where
        Q: Query + ?Sized,
        H: QueryHandler<C>,
    {
        self.write().register(sample, handler)
    }

    /// Register a typed function for queries of type `Q`.
    ///
    /// `Q::default()` serves as the sample. For a query without a `Default`,
    /// use `register(&sample, typed(f))`.
    pub fn register_fn<Q, R, F>(&self, f: F) -> Result<(), BusError>
    where
        Q: Query + Default,
        R: IntoResponse + 'static,
        F: Fn(&C, Q) -> R + Send + Sync + 'static,
    {
        self.register(&Q::default(), typed::<C, Q, R, F>(f))
    }

    /// Route `query` to its handler and return the handler's response.
    pub fn dispatch<Q: Query>(&self, ctx: &C, query: Q) -> Response {
        self.dispatch_boxed(ctx, Box::new(query))
    }

    /// Route an already type-erased query.
    pub fn dispatch_boxed(&self, ctx: &C, query: Box<dyn Query>) -> Response {
        let name = resolve_query_name(&*query);
        let handler = self.read().get(name.as_str()).cloned();
        match handler {
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
        self.read().contains(resolve_query_name(query).as_str())
    }

    /// Get the number of registered handlers.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the bus has no handlers.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Stop accepting registrations and drop the lock.
    pub fn freeze(self) -> QueryBus<C> {
        let table = self
            .table
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        QueryBus::from_table(table)
    }
}

impl<C: 'static> Default for LiveQueryBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: 'static> QueryHandler<C> for LiveQueryBus<C> {
    fn handle(&self, ctx: &C, query: Box<dyn Query>) -> Response {
        self.dispatch_boxed(ctx, query)
    }
}
