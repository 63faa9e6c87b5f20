//! Registration while dispatching, and freezing a live bus.

#![cfg(feature = "macros")]

mod common;

use common::{GetUserById, ListUsers, RequestContext, SomeOtherQuery, User, get_user};
use querybus::{BoxError, BusError, LiveQueryBus, testing::CountingHandler};
use std::sync::Arc;

#[test]
fn test_register_from_other_threads() {
    let bus = Arc::new(LiveQueryBus::<RequestContext>::new());
    bus.register_fn(get_user).unwrap();

    std::thread::scope(|scope| {
        scope.spawn(|| {
            bus.register(&ListUsers::default(), CountingHandler::new())
                .unwrap();
        });
        scope.spawn(|| {
            for _ in 0..50 {
                let user: User = bus
                    .ask(&RequestContext::default(), GetUserById { id: 2 })
                    .unwrap();
                assert_eq!(user.name, "Grace");
            }
        });
    });

    assert_eq!(bus.len(), 2);
    assert!(bus.handles(&ListUsers::default()));
}

#[test]
fn test_racing_registrations_admit_one() {
    let bus = LiveQueryBus::<()>::new();

    let wins = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| bus.register(&SomeOtherQuery, CountingHandler::new())))
            .collect();
        handles
            .into_iter()
            .filter_map(|h| h.join().ok())
            .filter(Result::is_ok)
            .count()
    });

    assert_eq!(wins, 1);
    assert_eq!(bus.len(), 1);
}

#[test]
fn test_freeze_then_dispatch() {
    let bus = LiveQueryBus::<RequestContext>::default();
    bus.register_fn(get_user).unwrap();
    let bus = bus.freeze();

    let user: User = bus
        .ask(&RequestContext::default(), GetUserById { id: 1 })
        .unwrap();
    assert_eq!(user, User::named("Ada"));

    let err = bus
        .ask::<_, User>(&RequestContext::default(), SomeOtherQuery)
        .unwrap_err();
    assert!(matches!(
        BusError::from_boxed(&err),
        Some(BusError::UnhandledQuery { .. })
    ));
}

#[test]
fn test_duplicate_on_live_bus() {
    let bus = LiveQueryBus::<RequestContext>::new();
    bus.register_fn(get_user).unwrap();
    let err = bus
        .register_fn(|_ctx, _query: GetUserById| Ok::<_, BoxError>(User::named("Eve")))
        .unwrap_err();
    assert_eq!(
        err,
        BusError::DuplicateHandler {
            name: "users/GetByID".into()
        }
    );

    let user: User = bus
        .ask(&RequestContext::default(), GetUserById { id: 1 })
        .unwrap();
    assert_eq!(user.name, "Ada");
}
