use std::ops::RangeInclusive;

use super::domain::{IntakeRecord, PatientId};

/// Raised when an intake field falls outside its declared domain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} out of range (expected {min}..={max}, found {found})")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        found: f64,
    },
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::NotFinite { field }
            | ValidationError::Blank { field } => field,
        }
    }
}

pub const AGE_RANGE: RangeInclusive<u8> = 65..=100;
pub const FALL_COUNT_RANGE: RangeInclusive<u32> = 1..=20;
pub const SINGLE_LEG_STANCE_RANGE: RangeInclusive<f64> = 0.0..=60.0;
pub const TIMED_UP_AND_GO_RANGE: RangeInclusive<f64> = 0.0..=60.0;
pub const CHAIR_RISE_RANGE: RangeInclusive<f64> = 0.0..=30.0;
pub const GAIT_SPEED_RANGE: RangeInclusive<f64> = 0.0..=2.0;
pub const GRIP_STRENGTH_RANGE: RangeInclusive<f64> = 0.0..=50.0;

/// Guard that rejects intakes the scoring rules are not defined for.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    pub fn validate(&self, intake: &IntakeRecord) -> Result<(), ValidationError> {
        check_count("age", intake.demographics.age.into(), widen(&AGE_RANGE))?;

        if let Some(falls) = intake.interview.recorded_falls() {
            check_count("fall_count", falls, FALL_COUNT_RANGE)?;
        }

        let tests = &intake.functional;
        check_measure(
            "single_leg_stance_seconds",
            tests.single_leg_stance_seconds,
            SINGLE_LEG_STANCE_RANGE,
        )?;
        check_measure(
            "timed_up_and_go_seconds",
            tests.timed_up_and_go_seconds,
            TIMED_UP_AND_GO_RANGE,
        )?;
        check_measure(
            "chair_rise_seconds",
            tests.chair_rise_seconds,
            CHAIR_RISE_RANGE,
        )?;
        check_measure("gait_speed_ms", tests.gait_speed_ms, GAIT_SPEED_RANGE)?;
        check_measure(
            "grip_strength_kg",
            tests.grip_strength_kg,
            GRIP_STRENGTH_RANGE,
        )?;

        Ok(())
    }

    pub fn validate_patient(&self, patient: &PatientId) -> Result<(), ValidationError> {
        if patient.0.trim().is_empty() {
            return Err(ValidationError::Blank {
                field: "patient_name",
            });
        }
        Ok(())
    }
}

fn widen(range: &RangeInclusive<u8>) -> RangeInclusive<u32> {
    u32::from(*range.start())..=u32::from(*range.end())
}

fn check_count(
    field: &'static str,
    value: u32,
    range: RangeInclusive<u32>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: f64::from(*range.start()),
            max: f64::from(*range.end()),
            found: f64::from(value),
        })
    }
}

fn check_measure(
    field: &'static str,
    value: f64,
    range: RangeInclusive<f64>,
) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: *range.start(),
            max: *range.end(),
            found: value,
        })
    }
}
