//! The name → handler table shared by every bus flavor.
//!
//! A table only grows. Inserting under a name that is already bound fails
//! and leaves the existing binding in place.

use querybus_core::{BusError, Query, QueryHandler, QueryName, resolve_query_name};
use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

/// A handler as stored in a table.
pub type SharedHandler<C> = Arc<dyn QueryHandler<C>>;

/// A map from [`QueryName`] to the single handler bound to it.
pub struct HandlerTable<C> {
    map: HashMap<QueryName, SharedHandler<C>>,
}

impl<C: 'static> HandlerTable<C> {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Create an empty table with room for `capacity` handlers.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Bind `handler` under `name`.
    ///
    /// Returns [`BusError::DuplicateHandler`] if the name is taken.
    pub fn insert(&mut self, name: QueryName, handler: SharedHandler<C>) -> Result<(), BusError> {
        match self.map.entry(name) {
            Entry::Occupied(entry) => Err(BusError::DuplicateHandler {
                name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(query = %entry.key(), "registered query handler");
                entry.insert(handler);
                Ok(())
            }
        }
    }

    /// Bind `handler` under the name resolved from `sample`.
    pub fn register<Q, H>(&mut self, sample: &Q, handler: H) -> Result<(), BusError>
    where
        Q: Query + ?Sized,
        H: QueryHandler<C>,
    {
        self.insert(resolve_query_name(sample), Arc::new(handler))
    }

    /// Look up the handler bound to `name`.
    pub fn get(&self, name: &str) -> Option<&SharedHandler<C>> {
        self.map.get(name)
    }

    /// Check if a handler is bound to `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    /// Iterate over the bound names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &QueryName> {
        self.map.keys()
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl<C: 'static> Default for HandlerTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querybus_core::{Response, handler_fn};

    struct Lookup;
    impl Query for Lookup {}

    fn answering(value: u32) -> SharedHandler<()> {
        Arc::new(handler_fn(move |_: &(), _| Response::answered(value)))
    }

    #[test]
    fn test_basic_lookup() {
        let mut table = HandlerTable::new();
        table.insert(QueryName::new("a"), answering(1)).unwrap();
        table.insert(QueryName::new("b"), answering(2)).unwrap();

        let response = table.get("b").unwrap().handle(&(), Box::new(Lookup));
        assert_eq!(response.answer_as::<u32>(), Some(&2));
        assert!(table.get("unknown").is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_keeps_first_binding() {
        let mut table = HandlerTable::new();
        table.insert(QueryName::new("key"), answering(1)).unwrap();

        let result = table.insert(QueryName::new("key"), answering(2));
        assert!(matches!(result, Err(BusError::DuplicateHandler { ref name }) if name.as_str() == "key"));

        let response = table.get("key").unwrap().handle(&(), Box::new(Lookup));
        assert_eq!(response.answer_as::<u32>(), Some(&1));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_register_resolves_sample() {
        let mut table: HandlerTable<()> = HandlerTable::default();
        table
            .register(&Lookup, handler_fn(|_: &(), _| Response::empty()))
            .unwrap();
        assert!(table.contains(resolve_query_name(&Lookup).as_str()));
        assert!(!table.contains(resolve_query_name(&Box::new(Lookup)).as_str()));
    }
}
