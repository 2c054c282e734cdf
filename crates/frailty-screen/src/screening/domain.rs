use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Identifier wrapper for the screened resident.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub String);

/// Identifier for one screening session; history never crosses sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Minimum dominant-hand grip strength below which sarcopenia risk is flagged.
    pub const fn grip_norm_kg(self) -> f64 {
        match self {
            Self::Female => 16.0,
            Self::Male => 27.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Demographics collected at intake. None of these feed the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demographics {
    pub age: u8,
    pub sex: Sex,
    #[serde(default)]
    pub lived_alone: bool,
}

/// Answers to the key interview questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interview {
    pub fell_last_year: bool,
    #[serde(default)]
    pub fall_count: u32,
    pub fear_of_falling: bool,
    pub chronic_pain: bool,
    pub cognitive_issues: bool,
    pub high_risk_medication: bool,
}

impl Interview {
    /// Number of falls in the past year, only when a fall was reported.
    pub fn recorded_falls(&self) -> Option<u32> {
        self.fell_last_year.then_some(self.fall_count)
    }
}

/// Measurements taken by a professional during the functional tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FunctionalTests {
    pub single_leg_stance_seconds: f64,
    pub timed_up_and_go_seconds: f64,
    /// Time for five sit-to-stand repetitions without using the arms.
    pub chair_rise_seconds: f64,
    pub gait_speed_ms: f64,
    pub grip_strength_kg: f64,
    pub difficulty_rising_from_floor: bool,
    pub orthopedic_anomalies: bool,
}

/// Structured intake handed to the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub demographics: Demographics,
    pub interview: Interview,
    pub functional: FunctionalTests,
}

/// Fixed axes of the frailty profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dimension {
    Falls,
    FearOfFalling,
    ChronicPain,
    CognitiveIssues,
    MedicationRisk,
    Balance,
    Mobility,
    LowerLimbStrength,
    GaitSpeed,
    GripStrength,
    FloorRise,
    Orthopedic,
}

impl Dimension {
    pub const fn ordered() -> [Self; 12] {
        [
            Self::Falls,
            Self::FearOfFalling,
            Self::ChronicPain,
            Self::CognitiveIssues,
            Self::MedicationRisk,
            Self::Balance,
            Self::Mobility,
            Self::LowerLimbStrength,
            Self::GaitSpeed,
            Self::GripStrength,
            Self::FloorRise,
            Self::Orthopedic,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Falls => "Past falls",
            Self::FearOfFalling => "Fear of falling",
            Self::ChronicPain => "Chronic pain",
            Self::CognitiveIssues => "Cognitive issues",
            Self::MedicationRisk => "Medication risk",
            Self::Balance => "Balance (single-leg stance)",
            Self::Mobility => "Mobility (TUG)",
            Self::LowerLimbStrength => "Lower-limb strength (chair rise)",
            Self::GaitSpeed => "Gait speed",
            Self::GripStrength => "Overall strength (grip)",
            Self::FloorRise => "Rising from the floor",
            Self::Orthopedic => "Orthopedics",
        }
    }
}

/// Upper bound of the severity scale; 0 is unproblematic.
pub const MAX_SEVERITY: f64 = 5.0;

/// Severity per dimension, always carrying every axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSeverities(BTreeMap<Dimension, f64>);

impl DimensionSeverities {
    pub fn zeroed() -> Self {
        Self(
            Dimension::ordered()
                .into_iter()
                .map(|dimension| (dimension, 0.0))
                .collect(),
        )
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        self.0.get(&dimension).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, dimension: Dimension) -> bool {
        self.0.contains_key(&dimension)
    }

    pub(crate) fn set(&mut self, dimension: Dimension, severity: f64) {
        self.0.insert(dimension, severity);
    }

    /// Entries in fixed axis order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f64)> + '_ {
        self.0.iter().map(|(dimension, severity)| (*dimension, *severity))
    }
}

impl Default for DimensionSeverities {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Frailty category derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Robust,
    PreFrail,
    Frail,
}

/// Output of one evaluation. Never mutated once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub total_score: u32,
    pub risk_level: RiskLevel,
    pub detected_factors: BTreeSet<String>,
    pub recommendations: BTreeSet<String>,
    pub dimension_severities: DimensionSeverities,
}
