use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AssessmentResult, Dimension, PatientId, RiskLevel, MAX_SEVERITY};
use super::validation::{IntakeGuard, ValidationError};

/// Snapshot of one submitted evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub patient_name: PatientId,
    pub evaluation_date: NaiveDate,
    #[serde(flatten)]
    pub result: AssessmentResult,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("session history is full ({cap} entries)")]
    CapacityReached { cap: usize },
}

/// Append-only list of the assessments recorded during one session.
#[derive(Debug, Clone, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    cap: Option<usize>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(cap: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            cap,
        }
    }

    pub fn append(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        if let Some(cap) = self.cap {
            if self.entries.len() >= cap {
                return Err(HistoryError::CapacityReached { cap });
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Failures while producing or loading an exported history.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    #[error("malformed history payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("entry {index} has an invalid patient: {source}")]
    InvalidPatient {
        index: usize,
        source: ValidationError,
    },
    #[error("entry {index} is missing the {dimension:?} severity")]
    MissingDimension { index: usize, dimension: Dimension },
    #[error("entry {index} has {dimension:?} severity {value} outside 0..=5")]
    SeverityOutOfRange {
        index: usize,
        dimension: Dimension,
        value: f64,
    },
    #[error("entry {index} records {stored:?} for score {total_score}, expected {expected:?}")]
    InconsistentRiskLevel {
        index: usize,
        total_score: u32,
        stored: RiskLevel,
        expected: RiskLevel,
    },
}

/// Serialize the history as a pretty-printed JSON array, preserving order.
pub fn export_history(entries: &[HistoryEntry]) -> Result<Vec<u8>, SerializationError> {
    Ok(serde_json::to_vec_pretty(entries)?)
}

/// Load a document produced by [`export_history`].
pub fn import_history(payload: &[u8]) -> Result<Vec<HistoryEntry>, SerializationError> {
    let entries: Vec<HistoryEntry> = serde_json::from_slice(payload)?;

    for (index, entry) in entries.iter().enumerate() {
        check_entry(index, entry)?;
    }

    Ok(entries)
}

fn check_entry(index: usize, entry: &HistoryEntry) -> Result<(), SerializationError> {
    IntakeGuard
        .validate_patient(&entry.patient_name)
        .map_err(|source| SerializationError::InvalidPatient { index, source })?;

    let severities = &entry.result.dimension_severities;
    for dimension in Dimension::ordered() {
        if !severities.contains(dimension) {
            return Err(SerializationError::MissingDimension { index, dimension });
        }
        let value = severities.get(dimension);
        if !(0.0..=MAX_SEVERITY).contains(&value) {
            return Err(SerializationError::SeverityOutOfRange {
                index,
                dimension,
                value,
            });
        }
    }

    let expected = RiskLevel::from_score(entry.result.total_score);
    if entry.result.risk_level != expected {
        return Err(SerializationError::InconsistentRiskLevel {
            index,
            total_score: entry.result.total_score,
            stored: entry.result.risk_level,
            expected,
        });
    }

    Ok(())
}
