//! Typed adapter: register plain `Fn(&C, Q) -> R` functions as handlers.
//!
//! The adapter narrows the incoming `Box<dyn Query>` to `Q` with a single
//! downcast. A query of any other type is answered with
//! [`BusError::QueryTypeMismatch`] without calling the function.

use querybus_core::{AsAny, BusError, IntoResponse, Query, QueryHandler, Response};
use std::marker::PhantomData;

/// A handler wrapping a function over a concrete query type.
pub struct TypedHandler<C, Q, R, F> {
    f: F,
    _marker: PhantomData<fn(&C, Q) -> R>,
}

/// Wrap `f` as a handler for queries of type `Q`.
///
/// # Example
///
/// ```rust
/// use querybus_core::{BoxError, Query, QueryHandler};
/// use querybus_std::typed;
///
/// struct Double(u32);
/// impl Query for Double {}
///
/// let handler = typed(|_ctx: &(), query: Double| Ok::<_, BoxError>(query.0 * 2));
/// let response = handler.handle(&(), Box::new(Double(21)));
/// assert_eq!(response.answer_as::<u32>(), Some(&42));
/// ```
pub fn typed<C, Q, R, F>(f: F) -> TypedHandler<C, Q, R, F>
where
    Q: Query,
    R: IntoResponse,
    F: Fn(&C, Q) -> R + Send + Sync + 'static,
{
    TypedHandler {
        f,
        _marker: PhantomData,
    }
}

impl<C, Q, R, F> QueryHandler<C> for TypedHandler<C, Q, R, F>
where
    C: 'static,
    Q: Query,
    R: IntoResponse + 'static,
    F: Fn(&C, Q) -> R + Send + Sync + 'static,
{
    fn handle(&self, ctx: &C, query: Box<dyn Query>) -> Response {
        match AsAny::into_any(query).downcast::<Q>() {
            Ok(query) => (self.f)(ctx, *query).into_response(),
            Err(_) => Response::failed(BusError::QueryTypeMismatch {
                expected: std::any::type_name::<Q>(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use querybus_core::BoxError;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    struct Square(i64);
    impl Query for Square {}

    struct Other;
    impl Query for Other {}

    #[test]
    fn test_matching_type_calls_function() {
        let handler = typed(|_: &(), q: Square| Ok::<_, BoxError>(q.0 * q.0));
        let response = handler.handle(&(), Box::new(Square(-4)));
        assert_eq!(response.answer_as::<i64>(), Some(&16));
    }

    #[test]
    fn test_mismatched_type_is_not_called() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let handler = typed(move |_: &(), q: Square| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, BoxError>(q.0)
        });

        let response = handler.handle(&(), Box::new(Other));
        assert!(response.answer().is_none());
        assert!(matches!(
            response.bus_error(),
            Some(BusError::QueryTypeMismatch { expected }) if expected.ends_with("Square")
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_boxed_query_is_a_different_type() {
        let handler = typed(|_: &(), q: Square| Ok::<_, BoxError>(q.0));
        let response = handler.handle(&(), Box::new(Box::new(Square(1))));
        assert!(matches!(
            response.bus_error(),
            Some(BusError::QueryTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_handler_error_passes_through() {
        #[derive(Debug, thiserror::Error)]
        #[error("negative input")]
        struct Negative;

        let handler = typed(|_: &(), q: Square| {
            if q.0 < 0 {
                Err(Negative)
            } else {
                Ok(q.0)
            }
        });
        let response = handler.handle(&(), Box::new(Square(-1)));
        let err = response.error().unwrap();
        assert!(err.downcast_ref::<Negative>().is_some());
        assert!(response.bus_error().is_none());
    }

    #[test]
    fn test_context_is_forwarded() {
        let handler = typed(|ctx: &String, _: Square| Ok::<_, BoxError>(ctx.clone()));
        let response = handler.handle(&"tenant-7".to_string(), Box::new(Square(0)));
        assert_eq!(response.answer_as::<String>().map(String::as_str), Some("tenant-7"));
    }
}
