//! Handler responses and conversion into them.

use crate::error::{BoxError, BusError};
use std::any::Any;
use std::fmt;

/// A type-erased query answer.
pub type Answer = Box<dyn Any + Send>;

/// What a handler produced: an optional answer and an optional error.
///
/// Both halves are independent. A handler may answer, fail, do both (a
/// partial answer alongside an error), or do neither. The bus hands the
/// response back to the caller exactly as the handler built it.
#[must_use]
pub struct Response {
    answer: Option<Answer>,
    error: Option<BoxError>,
}

impl Response {
    /// Build a response from both halves.
    pub fn new(answer: Option<Answer>, error: Option<BoxError>) -> Self {
        Self { answer, error }
    }

    /// A successful response carrying `answer`.
    pub fn answered<O: Any + Send>(answer: O) -> Self {
        Self {
            answer: Some(Box::new(answer)),
            error: None,
        }
    }

    /// A failed response with no answer.
    pub fn failed(error: impl Into<BoxError>) -> Self {
        Self {
            answer: None,
            error: Some(error.into()),
        }
    }

    /// A response with neither answer nor error.
    pub const fn empty() -> Self {
        Self {
            answer: None,
            error: None,
        }
    }

    /// The type-erased answer, if any.
    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    /// The answer viewed as `O`, if there is one of that type.
    pub fn answer_as<O: Any>(&self) -> Option<&O> {
        self.answer.as_ref()?.downcast_ref::<O>()
    }

    /// The error, if any.
    pub fn error(&self) -> Option<&BoxError> {
        self.error.as_ref()
    }

    /// The error as a [`BusError`], if the bus raised it.
    pub fn bus_error(&self) -> Option<&BusError> {
        self.error.as_ref().and_then(BusError::from_boxed)
    }

    /// Returns `true` if the response carries no error.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Split into answer and error.
    pub fn into_parts(self) -> (Option<Answer>, Option<BoxError>) {
        (self.answer, self.error)
    }

    /// Convert into a `Result`, dropping any answer that came with an error.
    pub fn into_result(self) -> Result<Option<Answer>, BoxError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.answer),
        }
    }

    /// Take the answer as `O`.
    ///
    /// The handler's error wins if there is one. A missing answer or one of
    /// another type yields [`BusError::UnexpectedAnswer`].
    pub fn downcast<O: Any>(self) -> Result<O, BoxError> {
        let unexpected = || -> BoxError {
            Box::new(BusError::UnexpectedAnswer {
                expected: std::any::type_name::<O>(),
            })
        };
        match self.into_result()? {
            Some(answer) => answer
                .downcast::<O>()
                .map(|answer| *answer)
                .map_err(|_| unexpected()),
            None => Err(unexpected()),
        }
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("answered", &self.answer.is_some())
            .field("error", &self.error)
            .finish()
    }
}

/// Conversion of a handler's return value into a [`Response`].
///
/// # Default Implementations
///
/// - `Response` → As is
/// - `Result<O, E>` → `Ok` answers with `O`, `Err` fails with `E` boxed
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `IntoResponse`",
    label = "missing `IntoResponse` implementation",
    note = "Typed handlers must return `Result<O, E>` or a `Response`."
)]
pub trait IntoResponse {
    /// Convert the output into a response.
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl<O, E> IntoResponse for Result<O, E>
where
    O: Any + Send,
    E: Into<BoxError>,
{
    fn into_response(self) -> Response {
        match self {
            Ok(answer) => Response::answered(answer),
            Err(err) => Response::failed(err),
        }
    }
}
