use std::sync::Arc;

use super::common::*;
use crate::screening::domain::{RiskLevel, SessionId};
use crate::screening::history::{export_history, HistoryError, SerializationError};
use crate::screening::service::{ScreeningService, ScreeningServiceError};
use crate::screening::store::{HistoryStore, StoreError};
use crate::screening::ValidationError;

#[test]
fn assess_appends_to_session_history() {
    let (service, store) = build_service();
    let session = service.start_session().expect("session opens");

    let first = service
        .assess(&session, request("Resident A", worst_case_intake()))
        .expect("assessment recorded");
    service
        .assess(&session, request("Resident B", best_case_intake()))
        .expect("assessment recorded");

    assert_eq!(first.result.risk_level, RiskLevel::Frail);
    let history = service.history(&session).expect("history available");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], first);
    assert_eq!(history[1].patient_name.0, "Resident B");
    assert_eq!(store.entries(&session).expect("stored").len(), 2);
}

#[test]
fn sessions_do_not_share_history() {
    let (service, _) = build_service();
    let first = service.start_session().expect("session opens");
    let second = service.start_session().expect("session opens");
    assert_ne!(first, second);

    service
        .assess(&first, request("Resident A", best_case_intake()))
        .expect("assessment recorded");

    assert_eq!(service.history(&first).expect("history").len(), 1);
    assert!(service.history(&second).expect("history").is_empty());
}

#[test]
fn ending_a_session_discards_history() {
    let (service, store) = build_service();
    let session = service.start_session().expect("session opens");
    service
        .assess(&session, request("Resident A", best_case_intake()))
        .expect("assessment recorded");

    service.end_session(&session).expect("session closes");

    match service.history(&session) {
        Err(ScreeningServiceError::Store(StoreError::UnknownSession(id))) => {
            assert_eq!(id, session)
        }
        other => panic!("expected unknown session, got {other:?}"),
    }
    assert_eq!(store.session_count().expect("count"), 0);
}

#[test]
fn assess_rejects_unknown_session() {
    let (service, _) = build_service();
    let missing = SessionId("session-missing".to_string());

    match service.assess(&missing, request("Resident A", best_case_intake())) {
        Err(ScreeningServiceError::Store(StoreError::UnknownSession(_))) => {}
        other => panic!("expected unknown session, got {other:?}"),
    }
}

#[test]
fn invalid_intake_is_not_recorded() {
    let (service, _) = build_service();
    let session = service.start_session().expect("session opens");
    let intake = intake_with(|intake| intake.functional.timed_up_and_go_seconds = -1.0);

    match service.assess(&session, request("Resident A", intake)) {
        Err(ScreeningServiceError::Validation(ValidationError::OutOfRange { field, .. })) => {
            assert_eq!(field, "timed_up_and_go_seconds")
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(service.history(&session).expect("history").is_empty());
}

#[test]
fn preview_defaults_to_today() {
    let (service, _) = build_service();
    let mut request = request("Resident A", best_case_intake());
    request.evaluation_date = None;

    let entry = service.preview(request).expect("preview succeeds");

    assert_eq!(entry.evaluation_date, chrono::Local::now().date_naive());
}

#[test]
fn export_and_import_move_history_between_sessions() {
    let (service, _) = build_service();
    let source = service.start_session().expect("session opens");
    service
        .assess(&source, request("Resident A", worst_case_intake()))
        .expect("recorded");
    service
        .assess(&source, request("Resident B", best_case_intake()))
        .expect("recorded");

    let payload = service.export(&source).expect("export succeeds");
    let target = service.start_session().expect("session opens");
    let imported = service.import(&target, &payload).expect("import succeeds");

    assert_eq!(imported, 2);
    assert_eq!(
        service.history(&target).expect("history"),
        service.history(&source).expect("history")
    );
}

#[test]
fn import_propagates_malformed_payloads() {
    let (service, _) = build_service();
    let session = service.start_session().expect("session opens");

    match service.import(&session, b"{not json") {
        Err(ScreeningServiceError::Serialization(SerializationError::Malformed(_))) => {}
        other => panic!("expected malformed payload, got {other:?}"),
    }
}

#[test]
fn capped_sessions_reject_overflow() {
    let service = capped_service(2);
    let session = service.start_session().expect("session opens");
    for _ in 0..2 {
        service
            .assess(&session, request("Resident A", best_case_intake()))
            .expect("within cap");
    }

    match service.assess(&session, request("Resident A", best_case_intake())) {
        Err(ScreeningServiceError::Store(StoreError::History(
            HistoryError::CapacityReached { cap },
        ))) => assert_eq!(cap, 2),
        other => panic!("expected capacity error, got {other:?}"),
    }
}

#[test]
fn import_over_cap_appends_nothing() {
    let service = capped_service(2);
    let session = service.start_session().expect("session opens");
    service
        .assess(&session, request("Resident A", best_case_intake()))
        .expect("within cap");

    let entries = vec![
        history_entry("Resident B", best_case_intake()),
        history_entry("Resident C", best_case_intake()),
    ];
    let payload = export_history(&entries).expect("export succeeds");

    assert!(service.import(&session, &payload).is_err());
    assert_eq!(service.history(&session).expect("history").len(), 1);
}

#[test]
fn store_failures_surface_as_store_errors() {
    let service = ScreeningService::new(Arc::new(UnavailableStore));

    match service.start_session() {
        Err(ScreeningServiceError::Store(StoreError::Unavailable(reason))) => {
            assert!(reason.contains("offline"))
        }
        other => panic!("expected unavailable store, got {other:?}"),
    }
}

#[test]
fn session_ids_are_random_tokens() {
    let (service, _) = build_service();
    let first = service.start_session().expect("session opens");
    let second = service.start_session().expect("session opens");
    assert_ne!(first, second);

    for session in [&first, &second] {
        let token = session
            .0
            .strip_prefix("session-")
            .expect("session prefix");
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    assert!(matches!(
        service.history(&SessionId("session-000001".to_string())),
        Err(ScreeningServiceError::Store(StoreError::UnknownSession(_)))
    ));
}

#[test]
fn start_session_reports_the_session_limit() {
    let service = ScreeningService::new(Arc::new(session_limited_store(2)));
    service.start_session().expect("session opens");
    service.start_session().expect("session opens");

    match service.start_session() {
        Err(ScreeningServiceError::Store(StoreError::SessionLimitReached { limit })) => {
            assert_eq!(limit, 2)
        }
        other => panic!("expected session limit, got {other:?}"),
    }
}
