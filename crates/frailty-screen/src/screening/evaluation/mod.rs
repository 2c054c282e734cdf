mod policy;
mod rules;

pub use policy::{FRAIL_THRESHOLD, PRE_FRAIL_THRESHOLD};

use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::{AssessmentResult, DimensionSeverities, IntakeRecord, RiskLevel};
use super::validation::{IntakeGuard, ValidationError};

/// Stateless evaluator applying the scoring table to an intake.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Score an intake that already passed [`IntakeGuard::validate`].
    pub fn score(&self, intake: &IntakeRecord) -> AssessmentResult {
        let mut total_score = 0;
        let mut detected_factors = BTreeSet::new();
        let mut recommendations = BTreeSet::new();
        let mut dimension_severities = DimensionSeverities::zeroed();

        for rule in rules::fired(intake) {
            total_score += rule.weight;
            if let Some(factor) = rule.factor {
                detected_factors.insert(factor(intake));
            }
            if let Some(recommendation) = rule.recommendation {
                recommendations.insert(recommendation.to_string());
            }
            if let Some(effect) = &rule.effect {
                dimension_severities.set(effect.dimension, (effect.severity)(intake));
            }
        }

        AssessmentResult {
            total_score,
            risk_level: RiskLevel::from_score(total_score),
            detected_factors,
            recommendations,
            dimension_severities,
        }
    }

    /// Rules that contributed to the score, in table order.
    pub fn components(&self, intake: &IntakeRecord) -> Vec<ScoreComponent> {
        rules::fired(intake)
            .into_iter()
            .map(|rule| ScoreComponent {
                rule: rule.name,
                score: rule.weight,
                notes: rule.factor.map(|factor| factor(intake)),
            })
            .collect()
    }
}

/// Discrete contribution to an assessment, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreComponent {
    pub rule: &'static str,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Validate and score an intake.
pub fn evaluate(intake: &IntakeRecord) -> Result<AssessmentResult, ValidationError> {
    IntakeGuard.validate(intake)?;
    Ok(ScoringEngine::new().score(intake))
}
