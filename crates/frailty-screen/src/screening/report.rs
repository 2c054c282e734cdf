use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Dimension, PatientId, RiskLevel, MAX_SEVERITY};
use super::history::HistoryEntry;

const REFERRAL_GUIDANCE: [&str; 2] = [
    "Depending on the score, a physiotherapist should set up advice and a programme preserving locomotor capacity.",
    "Referral to the attending physician or a geriatrician is essential for frail and pre-frail residents, to assess general condition and adjust care.",
];

const MAINTENANCE_GUIDANCE: &str =
    "No specific recommendation stands out. Encourage continued physical activity and regular follow-up.";

/// One axis of the frailty profile chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileAxis {
    pub dimension: Dimension,
    pub label: &'static str,
    pub severity: f64,
}

/// Presentation-neutral view of one recorded assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreeningReport {
    pub patient_name: PatientId,
    pub evaluation_date: NaiveDate,
    pub total_score: u32,
    pub risk_level: RiskLevel,
    pub risk_label: &'static str,
    pub interpretation: &'static str,
    pub detected_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub follow_up: Vec<&'static str>,
    pub profile: Vec<ProfileAxis>,
    pub radial_range: [f64; 2],
}

impl ScreeningReport {
    pub fn from_entry(entry: &HistoryEntry) -> Self {
        let result = &entry.result;

        let follow_up = if result.recommendations.is_empty() {
            vec![MAINTENANCE_GUIDANCE]
        } else {
            REFERRAL_GUIDANCE.to_vec()
        };

        let profile = Dimension::ordered()
            .into_iter()
            .map(|dimension| ProfileAxis {
                dimension,
                label: dimension.label(),
                severity: result.dimension_severities.get(dimension),
            })
            .collect();

        Self {
            patient_name: entry.patient_name.clone(),
            evaluation_date: entry.evaluation_date,
            total_score: result.total_score,
            risk_level: result.risk_level,
            risk_label: result.risk_level.label(),
            interpretation: result.risk_level.interpretation(),
            detected_factors: result.detected_factors.iter().cloned().collect(),
            recommendations: result.recommendations.iter().cloned().collect(),
            follow_up,
            profile,
            radial_range: [0.0, MAX_SEVERITY],
        }
    }
}

/// Condensed row for history listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRow {
    pub patient_name: PatientId,
    pub evaluation_date: NaiveDate,
    pub total_score: u32,
    pub risk_level: RiskLevel,
}

impl From<&HistoryEntry> for HistoryRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            patient_name: entry.patient_name.clone(),
            evaluation_date: entry.evaluation_date,
            total_score: entry.result.total_score,
            risk_level: entry.result.risk_level,
        }
    }
}
