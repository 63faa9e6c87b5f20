//! Query trait and dispatch name resolution.
//!
//! Every value sent through a bus implements [`Query`]. The bus routes it by
//! a [`QueryName`] resolved in two tiers:
//!
//! 1. **Self-reported**: if [`Query::query_name`] returns `Some`, that string
//!    is used verbatim.
//! 2. **Structural**: otherwise the name is derived from the concrete type,
//!    `"{module}/{Type}"` for a value and `"{module}/*{Type}"` for a value held
//!    through `Box`, `Arc` or `&'static`.
//!
//! Structural names come from [`std::any::type_name`]. They are stable for a
//! given build but are not meant to be persisted or sent across processes;
//! queries that need a durable name should report one.

use std::any::Any;
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// The canonical key a query is routed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryName(String);

impl QueryName {
    /// Create a name from any string.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for QueryName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for QueryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QueryName {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for QueryName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Upcasting support so a `Box<dyn Query>` can be narrowed back to its
/// concrete type.
///
/// Implemented for every sized `Any + Send + Sync` type. Call it as
/// `AsAny::into_any(query)` so the box itself is not taken as the receiver.
#[doc(hidden)]
pub trait AsAny: Any + Send + Sync {
    /// Convert the boxed value into `Box<dyn Any>`, keeping its concrete type.
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

/// A request routed to exactly one handler.
///
/// Implementing the trait with no methods gives the query a structural name.
/// Override [`query_name`](Query::query_name) (or use `#[derive(Query)]` with
/// `#[query(name = "...")]`) to give it a stable one.
///
/// Structural names only see the module path, so two distinct types with the
/// same name in one module (say, declared in sibling blocks of one function)
/// share a key. Such types need a self-reported name.
///
/// # Example
///
/// ```rust
/// use querybus_core::{Query, resolve_query_name};
///
/// struct GetUserById {
///     id: u64,
/// }
///
/// impl Query for GetUserById {
///     fn query_name(&self) -> Option<&str> {
///         Some("users/GetByID")
///     }
/// }
///
/// let name = resolve_query_name(&GetUserById { id: 1 });
/// assert_eq!(name.as_str(), "users/GetByID");
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Query",
    label = "missing `Query` implementation",
    note = "Queries must implement `Query` (or `#[derive(Query)]`) and be `Send + Sync + 'static`."
)]
pub trait Query: AsAny {
    /// The self-reported name of this query, if it has one.
    fn query_name(&self) -> Option<&str> {
        None
    }

    /// The structural identity used when no name is self-reported.
    #[doc(hidden)]
    fn type_identity(&self) -> TypeIdentity {
        TypeIdentity::of::<Self>()
    }
}

impl<T: Query> Query for Box<T> {
    fn query_name(&self) -> Option<&str> {
        (**self).query_name()
    }

    fn type_identity(&self) -> TypeIdentity {
        (**self).type_identity().indirect()
    }
}

impl<T: Query> Query for Arc<T> {
    fn query_name(&self) -> Option<&str> {
        (**self).query_name()
    }

    fn type_identity(&self) -> TypeIdentity {
        (**self).type_identity().indirect()
    }
}

impl<T: Query> Query for &'static T {
    fn query_name(&self) -> Option<&str> {
        (**self).query_name()
    }

    fn type_identity(&self) -> TypeIdentity {
        (**self).type_identity().indirect()
    }
}

/// The concrete type of a query plus whether it was reached through a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeIdentity {
    type_name: &'static str,
    indirect: bool,
}

impl TypeIdentity {
    /// Identity of a value held directly.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            indirect: false,
        }
    }

    /// Mark the identity as reached through an indirection.
    ///
    /// Nested indirection collapses into a single marker.
    pub const fn indirect(self) -> Self {
        Self {
            type_name: self.type_name,
            indirect: true,
        }
    }

    /// The full type name as reported by the compiler.
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the value was held through `Box`, `Arc` or a reference.
    pub const fn is_indirect(&self) -> bool {
        self.indirect
    }

    /// The module path of the type, empty for primitives and tuples.
    pub fn module_path(&self) -> &'static str {
        split_type_name(self.type_name).0
    }

    /// The bare type name, generic arguments included.
    pub fn name(&self) -> &'static str {
        split_type_name(self.type_name).1
    }

    /// The structural dispatch key.
    pub fn key(&self) -> String {
        let (module, name) = split_type_name(self.type_name);
        if self.indirect {
            format!("{module}/*{name}")
        } else {
            format!("{module}/{name}")
        }
    }
}

// Generic arguments may contain `::` themselves, so only the head before the
// first `<`, `(` or `[` is searched for the module separator.
fn split_type_name(type_name: &str) -> (&str, &str) {
    let head_end = type_name
        .find(['<', '(', '['])
        .unwrap_or(type_name.len());
    match type_name[..head_end].rfind("::") {
        Some(idx) => (&type_name[..idx], &type_name[idx + 2..]),
        None => ("", type_name),
    }
}

/// Resolve the dispatch name of a query.
///
/// The self-reported name wins; the structural name is the fallback.
pub fn resolve_query_name<Q: Query + ?Sized>(query: &Q) -> QueryName {
    match query.query_name() {
        Some(name) => QueryName::from(name),
        None => QueryName::from(query.type_identity().key()),
    }
}
