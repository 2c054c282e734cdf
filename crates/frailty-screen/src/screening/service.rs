use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::domain::{AssessmentResult, IntakeRecord, PatientId, SessionId};
use super::evaluation::ScoringEngine;
use super::history::{export_history, import_history, HistoryEntry, SerializationError};
use super::store::{HistoryStore, StoreError};
use super::validation::{IntakeGuard, ValidationError};

/// Inbound request for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    pub patient_name: PatientId,
    /// Defaults to today when omitted.
    #[serde(default)]
    pub evaluation_date: Option<NaiveDate>,
    pub intake: IntakeRecord,
}

/// Service composing the intake guard, the scoring engine, and per-session history.
pub struct ScreeningService<S> {
    guard: IntakeGuard,
    engine: ScoringEngine,
    store: Arc<S>,
}

impl<S> ScreeningService<S>
where
    S: HistoryStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            guard: IntakeGuard,
            engine: ScoringEngine::new(),
            store,
        }
    }

    fn next_session_id() -> SessionId {
        SessionId(format!("session-{}", Uuid::new_v4().simple()))
    }

    /// Open a fresh, empty session history.
    pub fn start_session(&self) -> Result<SessionId, ScreeningServiceError> {
        let session = Self::next_session_id();
        if let Err(error) = self.store.open(session.clone()) {
            warn!(%error, "screening session not opened");
            return Err(error.into());
        }
        info!(session = %session.0, "screening session opened");
        Ok(session)
    }

    /// Validate and score an intake without recording it.
    pub fn evaluate(
        &self,
        intake: &IntakeRecord,
    ) -> Result<AssessmentResult, ScreeningServiceError> {
        if let Err(error) = self.guard.validate(intake) {
            warn!(field = error.field(), %error, "intake rejected");
            return Err(error.into());
        }
        Ok(self.engine.score(intake))
    }

    /// Build the history entry for a request without storing it.
    pub fn preview(
        &self,
        request: AssessmentRequest,
    ) -> Result<HistoryEntry, ScreeningServiceError> {
        let AssessmentRequest {
            patient_name,
            evaluation_date,
            intake,
        } = request;

        if let Err(error) = self.guard.validate_patient(&patient_name) {
            warn!(field = error.field(), %error, "intake rejected");
            return Err(error.into());
        }
        let result = self.evaluate(&intake)?;

        Ok(HistoryEntry {
            patient_name,
            evaluation_date: evaluation_date.unwrap_or_else(|| Local::now().date_naive()),
            result,
        })
    }

    /// Evaluate a request and append it to the session history.
    pub fn assess(
        &self,
        session: &SessionId,
        request: AssessmentRequest,
    ) -> Result<HistoryEntry, ScreeningServiceError> {
        let entry = self.preview(request)?;
        let recorded = self.store.append(session, entry.clone())?;

        info!(
            session = %session.0,
            patient = %entry.patient_name.0,
            score = entry.result.total_score,
            level = ?entry.result.risk_level,
            recorded,
            "assessment recorded"
        );

        Ok(entry)
    }

    pub fn history(
        &self,
        session: &SessionId,
    ) -> Result<Vec<HistoryEntry>, ScreeningServiceError> {
        Ok(self.store.entries(session)?)
    }

    /// Serialize the whole session history for download.
    pub fn export(&self, session: &SessionId) -> Result<Vec<u8>, ScreeningServiceError> {
        let entries = self.store.entries(session)?;
        let payload = export_history(&entries)?;
        debug!(session = %session.0, entries = entries.len(), "history exported");
        Ok(payload)
    }

    /// Append every entry of a previously exported history to the session.
    pub fn import(
        &self,
        session: &SessionId,
        payload: &[u8],
    ) -> Result<usize, ScreeningServiceError> {
        let entries = match import_history(payload) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(session = %session.0, %error, "history import rejected");
                return Err(error.into());
            }
        };
        let imported = entries.len();
        let total = self.store.extend(session, entries)?;
        info!(session = %session.0, imported, total, "history imported");
        Ok(imported)
    }

    /// Close the session; its history is discarded.
    pub fn end_session(&self, session: &SessionId) -> Result<(), ScreeningServiceError> {
        self.store.close(session)?;
        info!(session = %session.0, "screening session closed");
        Ok(())
    }
}

/// Error raised by the screening service.
#[derive(Debug, thiserror::Error)]
pub enum ScreeningServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Serialization(#[from] SerializationError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
