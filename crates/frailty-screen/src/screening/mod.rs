//! Frailty screening: intake validation, rule-based scoring, reporting, and session history.
//!
//! [`evaluate`] is the pure entry point. [`ScreeningService`] adds per-session history on top
//! of it and [`screening_router`] exposes the service over HTTP.

pub mod domain;
pub mod evaluation;
pub mod history;
pub mod report;
pub mod router;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentResult, Demographics, Dimension, DimensionSeverities, FunctionalTests,
    IntakeRecord, Interview, PatientId, RiskLevel, SessionId, Sex, MAX_SEVERITY,
};
pub use evaluation::{evaluate, ScoreComponent, ScoringEngine};
pub use history::{
    export_history, import_history, HistoryEntry, HistoryError, SerializationError,
    SessionHistory,
};
pub use report::{HistoryRow, ProfileAxis, ScreeningReport};
pub use router::screening_router;
pub use service::{AssessmentRequest, ScreeningService, ScreeningServiceError};
pub use store::{HistoryStore, InMemoryHistoryStore, StoreError, StoreLimits};
pub use validation::{IntakeGuard, ValidationError};
