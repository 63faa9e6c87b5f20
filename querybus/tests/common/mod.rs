#![allow(dead_code)]

use querybus::{BoxError, Query};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

// ============================================================================
// Test Context
// ============================================================================

/// The per-call context handed to every handler.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    pub request_id: u64,
    pub cancelled: Arc<AtomicBool>,
}

impl RequestContext {
    pub fn new(request_id: u64) -> Self {
        Self {
            request_id,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Test Queries
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Query)]
#[query(name = "users/GetByID")]
pub struct GetUserById {
    pub id: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Query)]
pub struct ListUsers {
    pub limit: usize,
}

#[derive(Clone, Debug, Default, Query)]
pub struct SomeOtherQuery;

/// Reports the same name as `GetUserById` without being one.
#[derive(Clone, Debug, Default, Query)]
#[query(name = "users/GetByID")]
pub struct GetUserByEmail {
    pub email: String,
}

// ============================================================================
// Test Answers
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub name: String,
}

impl User {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("user {0} not found")]
pub struct NotFound(pub u64);

#[derive(Debug, thiserror::Error)]
#[error("request cancelled")]
pub struct Cancelled;

/// Typed handler used throughout the tests.
pub fn get_user(ctx: &RequestContext, query: GetUserById) -> Result<User, BoxError> {
    if ctx.is_cancelled() {
        return Err(Box::new(Cancelled));
    }
    match query.id {
        1 => Ok(User::named("Ada")),
        2 => Ok(User::named("Grace")),
        id => Err(Box::new(NotFound(id))),
    }
}
