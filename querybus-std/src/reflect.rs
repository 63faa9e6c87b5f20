//! Reflective adapter for functions whose shape is only known at runtime.
//!
//! Prefer [`typed`](crate::typed::typed) whenever the query and answer types are
//! known at compile time. This adapter exists for callers that only hold a
//! dynamically built function value (a plugin table, a scripting bridge),
//! modeled as [`DynamicFn`]: a function from a list of type-erased values to
//! a list of type-erased values.
//!
//! # Calling convention
//!
//! The function is called with exactly two arguments:
//!
//! 1. the context, as `C` (cloned)
//! 2. the query, as its concrete type
//!
//! and must return either:
//!
//! - two or more values: the answer, then an error slot holding
//!   `Option<BoxError>` or a bare `BoxError` (extra values are ignored), or
//! - fewer than two values, meaning no answer and no error.
//!
//! The convention is the caller's obligation and is not checked up front.
//! An error slot of any other type panics when the handler runs.

use querybus_core::{AsAny, BoxError, Query, QueryHandler, Response};
use std::any::Any;

/// A type-erased argument or return value.
pub type Value = Box<dyn Any + Send>;

/// A function value invoked with type-erased arguments.
pub trait DynamicFn: Send + Sync + 'static {
    /// Call the function.
    fn call(&self, args: Vec<Value>) -> Vec<Value>;
}

impl<F> DynamicFn for F
where
    F: Fn(Vec<Value>) -> Vec<Value> + Send + Sync + 'static,
{
    fn call(&self, args: Vec<Value>) -> Vec<Value> {
        self(args)
    }
}

/// A handler that invokes a [`DynamicFn`].
pub struct ReflectiveHandler<F> {
    f: F,
}

/// Wrap a dynamically shaped function as a handler.
///
/// See the [module docs](self) for the calling convention.
///
/// # Example
///
/// ```rust
/// use querybus_core::{BoxError, Query, QueryHandler};
/// use querybus_std::reflect::{Value, wrap_dynamic};
///
/// struct Greet(String);
/// impl Query for Greet {}
///
/// let handler = wrap_dynamic(|mut args: Vec<Value>| -> Vec<Value> {
///     let query = args.pop().and_then(|q| q.downcast::<Greet>().ok()).unwrap();
///     vec![Box::new(format!("hello {}", query.0)), Box::new(None::<BoxError>)]
/// });
///
/// let response = handler.handle(&(), Box::new(Greet("Ada".into())));
/// assert_eq!(response.answer_as::<String>().map(String::as_str), Some("hello Ada"));
/// assert!(response.is_ok());
/// ```
pub fn wrap_dynamic<F: DynamicFn>(f: F) -> ReflectiveHandler<F> {
    ReflectiveHandler { f }
}

impl<C, F> QueryHandler<C> for ReflectiveHandler<F>
where
    C: Clone + Send + 'static,
    F: DynamicFn,
{
    /// # Panics
    ///
    /// Panics if the function returns an error slot that is neither
    /// `Option<BoxError>` nor `BoxError`.
    fn handle(&self, ctx: &C, query: Box<dyn Query>) -> Response {
        let ctx: Value = Box::new(ctx.clone());
        let query: Value = AsAny::into_any(query);

        let mut results = self.f.call(vec![ctx, query]).into_iter();
        match (results.next(), results.next()) {
            (Some(answer), Some(slot)) => Response::new(Some(answer), error_slot(slot)),
            _ => Response::empty(),
        }
    }
}

fn error_slot(slot: Value) -> Option<BoxError> {
    let slot = match slot.downcast::<Option<BoxError>>() {
        Ok(slot) => return *slot,
        Err(slot) => slot,
    };
    match slot.downcast::<BoxError>() {
        Ok(err) => Some(*err),
        Err(_) => panic!(
            "reflective query handler returned an error slot that is neither \
             Option<BoxError> nor BoxError"
        ),
    }
}
