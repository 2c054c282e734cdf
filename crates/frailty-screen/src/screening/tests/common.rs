use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::screening::domain::{
    Demographics, FunctionalTests, IntakeRecord, Interview, PatientId, SessionId, Sex,
};
use crate::screening::history::HistoryEntry;
use crate::screening::service::{AssessmentRequest, ScreeningService};
use crate::screening::store::{HistoryStore, InMemoryHistoryStore, StoreError, StoreLimits};
use crate::screening::{screening_router, ScoringEngine};

/// Every measurement on the healthy side of its thresholds.
pub(super) fn best_case_intake() -> IntakeRecord {
    IntakeRecord {
        demographics: Demographics {
            age: 78,
            sex: Sex::Male,
            lived_alone: false,
        },
        interview: Interview {
            fell_last_year: false,
            fall_count: 0,
            fear_of_falling: false,
            chronic_pain: false,
            cognitive_issues: false,
            high_risk_medication: false,
        },
        functional: FunctionalTests {
            single_leg_stance_seconds: 35.0,
            timed_up_and_go_seconds: 10.0,
            chair_rise_seconds: 8.0,
            gait_speed_ms: 1.2,
            grip_strength_kg: 32.0,
            difficulty_rising_from_floor: false,
            orthopedic_anomalies: false,
        },
    }
}

pub(super) fn intake_with(adjust: impl FnOnce(&mut IntakeRecord)) -> IntakeRecord {
    let mut intake = best_case_intake();
    adjust(&mut intake);
    intake
}

/// Every rule that can fire does.
pub(super) fn worst_case_intake() -> IntakeRecord {
    intake_with(|intake| {
        intake.demographics.sex = Sex::Female;
        intake.interview = Interview {
            fell_last_year: true,
            fall_count: 4,
            fear_of_falling: true,
            chronic_pain: true,
            cognitive_issues: true,
            high_risk_medication: true,
        };
        intake.functional = FunctionalTests {
            single_leg_stance_seconds: 2.0,
            timed_up_and_go_seconds: 25.0,
            chair_rise_seconds: 20.0,
            gait_speed_ms: 0.4,
            grip_strength_kg: 9.5,
            difficulty_rising_from_floor: true,
            orthopedic_anomalies: true,
        };
    })
}

pub(super) fn evaluation_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
}

pub(super) fn request(patient: &str, intake: IntakeRecord) -> AssessmentRequest {
    AssessmentRequest {
        patient_name: PatientId(patient.to_string()),
        evaluation_date: Some(evaluation_date()),
        intake,
    }
}

pub(super) fn history_entry(patient: &str, intake: IntakeRecord) -> HistoryEntry {
    HistoryEntry {
        patient_name: PatientId(patient.to_string()),
        evaluation_date: evaluation_date(),
        result: ScoringEngine::new().score(&intake),
    }
}

pub(super) fn build_service() -> (
    ScreeningService<InMemoryHistoryStore>,
    Arc<InMemoryHistoryStore>,
) {
    let store = Arc::new(InMemoryHistoryStore::new());
    let service = ScreeningService::new(store.clone());
    (service, store)
}

pub(super) fn capped_service(cap: usize) -> ScreeningService<InMemoryHistoryStore> {
    ScreeningService::new(Arc::new(InMemoryHistoryStore::with_cap(Some(cap))))
}

pub(super) fn session_limited_store(max_sessions: usize) -> InMemoryHistoryStore {
    InMemoryHistoryStore::with_limits(StoreLimits {
        max_sessions: Some(max_sessions),
        ..StoreLimits::default()
    })
}

pub(super) fn router() -> axum::Router {
    let (service, _) = build_service();
    screening_router(Arc::new(service))
}

pub(super) struct UnavailableStore;

impl HistoryStore for UnavailableStore {
    fn open(&self, _session: SessionId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn append(&self, _session: &SessionId, _entry: HistoryEntry) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn extend(
        &self,
        _session: &SessionId,
        _entries: Vec<HistoryEntry>,
    ) -> Result<usize, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn entries(&self, _session: &SessionId) -> Result<Vec<HistoryEntry>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn close(&self, _session: &SessionId) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
