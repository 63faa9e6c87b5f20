//! Testing utilities for querybus.
//!
//! This module provides handlers that make it easy to assert how queries
//! were routed.
//!
//! - [`RecordingHandler`]: records the resolved name of every query it receives
//! - [`CountingHandler`]: counts invocations

use querybus_core::{Query, QueryHandler, QueryName, Response, resolve_query_name};
use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records the name of every query it receives.
///
/// Clones share the same record, so keep one clone for assertions and hand
/// the other to the bus.
///
/// # Example
///
/// ```rust
/// use querybus_core::Query;
/// use querybus_std::{QueryBus, testing::RecordingHandler};
///
/// struct Ping;
/// impl Query for Ping {}
///
/// let recorder = RecordingHandler::new();
/// let mut builder = QueryBus::<()>::builder();
/// builder.register(&Ping, recorder.clone()).unwrap();
/// let bus = builder.build();
///
/// let _ = bus.dispatch(&(), Ping);
/// assert_eq!(recorder.count(), 1);
/// ```
#[derive(Clone)]
pub struct RecordingHandler {
    names: Arc<Mutex<Vec<QueryName>>>,
    respond: Arc<dyn Fn() -> Response + Send + Sync>,
}

impl RecordingHandler {
    /// Create a recording handler that answers with an empty response.
    pub fn new() -> Self {
        Self::with_response(Response::empty)
    }

    /// Create a recording handler that answers with `respond()`.
    pub fn with_response(respond: impl Fn() -> Response + Send + Sync + 'static) -> Self {
        Self {
            names: Arc::new(Mutex::new(Vec::new())),
            respond: Arc::new(respond),
        }
    }

    /// Get a copy of the recorded names, in arrival order.
    pub fn names(&self) -> Vec<QueryName> {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get the number of recorded queries.
    pub fn count(&self) -> usize {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Clear the record.
    pub fn clear(&self) {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for RecordingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> QueryHandler<C> for RecordingHandler {
    fn handle(&self, _ctx: &C, query: Box<dyn Query>) -> Response {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(resolve_query_name(&*query));
        (self.respond)()
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations and answers with an empty response.
#[derive(Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<C> QueryHandler<C> for CountingHandler {
    fn handle(&self, _ctx: &C, _query: Box<dyn Query>) -> Response {
        self.count.fetch_add(1, Ordering::SeqCst);
        Response::empty()
    }
}
