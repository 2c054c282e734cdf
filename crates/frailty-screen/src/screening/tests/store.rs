use std::thread;
use std::time::Duration;

use super::common::*;
use crate::screening::domain::SessionId;
use crate::screening::store::{HistoryStore, InMemoryHistoryStore, StoreError, StoreLimits};

fn session(name: &str) -> SessionId {
    SessionId(name.to_string())
}

#[test]
fn open_rejects_sessions_past_the_limit() {
    let store = session_limited_store(3);
    for index in 0..3 {
        store
            .open(session(&format!("session-{index}")))
            .expect("session opens");
    }

    for _ in 0..10 {
        match store.open(session("session-overflow")) {
            Err(StoreError::SessionLimitReached { limit }) => assert_eq!(limit, 3),
            other => panic!("expected session limit, got {other:?}"),
        }
    }
    assert_eq!(store.session_count().expect("count"), 3);
}

#[test]
fn closing_a_session_frees_a_slot() {
    let store = session_limited_store(1);
    store.open(session("first")).expect("session opens");
    store.close(&session("first")).expect("session closes");

    store.open(session("second")).expect("slot reused");
    assert_eq!(store.session_count().expect("count"), 1);
}

#[test]
fn duplicate_session_is_rejected() {
    let store = InMemoryHistoryStore::new();
    store.open(session("shared")).expect("session opens");

    assert!(matches!(
        store.open(session("shared")),
        Err(StoreError::SessionExists(_))
    ));
}

#[test]
fn idle_sessions_are_discarded() {
    let store = InMemoryHistoryStore::with_limits(StoreLimits {
        max_sessions: Some(1),
        idle_timeout: Some(Duration::from_millis(20)),
        ..StoreLimits::default()
    });
    let abandoned = session("abandoned");
    store.open(abandoned.clone()).expect("session opens");
    store
        .append(&abandoned, history_entry("Resident A", best_case_intake()))
        .expect("entry recorded");

    thread::sleep(Duration::from_millis(60));

    store
        .open(session("fresh"))
        .expect("idle session no longer counts against the limit");
    assert!(matches!(
        store.entries(&abandoned),
        Err(StoreError::UnknownSession(_))
    ));
    assert_eq!(store.session_count().expect("count"), 1);
}

#[test]
fn unbounded_store_keeps_sessions_without_timeout() {
    let store = InMemoryHistoryStore::new();
    for index in 0..50 {
        store
            .open(session(&format!("session-{index}")))
            .expect("session opens");
    }
    assert_eq!(store.session_count().expect("count"), 50);
    assert_eq!(store.limits(), StoreLimits::default());
}
