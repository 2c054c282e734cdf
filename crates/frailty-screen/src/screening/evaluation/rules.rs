use super::super::domain::{Dimension, IntakeRecord};

/// Rules in the same group are mutually exclusive; the first match in table order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tier {
    Balance,
    GaitSpeed,
    GripStrength,
}

/// Severity written to one profile axis when a rule fires.
pub(crate) struct DimensionEffect {
    pub dimension: Dimension,
    pub severity: fn(&IntakeRecord) -> f64,
}

/// One row of the scoring table.
pub(crate) struct ScoringRule {
    pub name: &'static str,
    pub tier: Option<Tier>,
    pub weight: u32,
    pub applies: fn(&IntakeRecord) -> bool,
    pub factor: Option<fn(&IntakeRecord) -> String>,
    pub recommendation: Option<&'static str>,
    pub effect: Option<DimensionEffect>,
}

pub(crate) const TUG_THRESHOLD_SECONDS: f64 = 14.0;
/// Institutional TUG threshold. Only raises the mobility severity, never the score.
pub(crate) const TUG_INSTITUTIONAL_SECONDS: f64 = 20.0;
pub(crate) const CHAIR_RISE_THRESHOLD_SECONDS: f64 = 14.0;
pub(crate) const REPEATED_FALLS: u32 = 2;

fn repeated_falls(intake: &IntakeRecord) -> bool {
    intake
        .interview
        .recorded_falls()
        .is_some_and(|count| count >= REPEATED_FALLS)
}

fn grip_below_norm(intake: &IntakeRecord) -> bool {
    intake.functional.grip_strength_kg < intake.demographics.sex.grip_norm_kg()
}

/// Scoring table, ordered most severe first within each tier.
pub(crate) static RULES: [ScoringRule; 17] = [
    ScoringRule {
        name: "falls",
        tier: None,
        weight: 10,
        applies: |intake: &IntakeRecord| intake.interview.fell_last_year,
        factor: Some(|intake: &IntakeRecord| {
            format!(
                "Falls in the past year ({} times)",
                intake.interview.recorded_falls().unwrap_or_default()
            )
        }),
        recommendation: Some(
            "A history of falls is a major risk factor. Consider putting preventive measures in place.",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::Falls,
            severity: |intake: &IntakeRecord| if repeated_falls(intake) { 5.0 } else { 3.0 },
        }),
    },
    ScoringRule {
        name: "repeated_falls",
        tier: None,
        weight: 5,
        applies: repeated_falls,
        factor: None,
        recommendation: Some("Assess the context and circumstances of the repeated falls."),
        effect: None,
    },
    ScoringRule {
        name: "fear_of_falling",
        tier: None,
        weight: 8,
        applies: |intake: &IntakeRecord| intake.interview.fear_of_falling,
        factor: Some(|_: &IntakeRecord| "Fear of falling".to_string()),
        recommendation: Some(
            "Fear of falling can lead to activity restriction and calls for dedicated support.",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::FearOfFalling,
            severity: |_: &IntakeRecord| 5.0,
        }),
    },
    ScoringRule {
        name: "chronic_pain",
        tier: None,
        weight: 5,
        applies: |intake: &IntakeRecord| intake.interview.chronic_pain,
        factor: Some(|_: &IntakeRecord| "Chronic leg or back pain".to_string()),
        recommendation: Some("Manage pain to improve locomotor capacity."),
        effect: Some(DimensionEffect {
            dimension: Dimension::ChronicPain,
            severity: |_: &IntakeRecord| 3.0,
        }),
    },
    ScoringRule {
        name: "cognitive_issues",
        tier: None,
        weight: 10,
        applies: |intake: &IntakeRecord| intake.interview.cognitive_issues,
        factor: Some(|_: &IntakeRecord| "Suspected cognitive issues".to_string()),
        recommendation: Some(
            "Refer to the attending physician for a dedicated cognitive assessment.",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::CognitiveIssues,
            severity: |_: &IntakeRecord| 5.0,
        }),
    },
    ScoringRule {
        name: "high_risk_medication",
        tier: None,
        weight: 7,
        applies: |intake: &IntakeRecord| intake.interview.high_risk_medication,
        factor: Some(|_: &IntakeRecord| {
            "Psychotropic drugs or more than 4 medications".to_string()
        }),
        recommendation: Some(
            "Review the medication list with the physician to limit iatrogenic risk.",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::MedicationRisk,
            severity: |_: &IntakeRecord| 4.0,
        }),
    },
    ScoringRule {
        name: "single_leg_stance_under_5s",
        tier: Some(Tier::Balance),
        weight: 15,
        applies: |intake: &IntakeRecord| intake.functional.single_leg_stance_seconds < 5.0,
        factor: Some(|intake: &IntakeRecord| {
            format!(
                "Single-leg stance < 5s ({:?}s)",
                intake.functional.single_leg_stance_seconds
            )
        }),
        recommendation: Some(
            "Very high fall risk related to balance. Work specifically on balance.",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::Balance,
            severity: |_: &IntakeRecord| 5.0,
        }),
    },
    ScoringRule {
        name: "single_leg_stance_under_30s",
        tier: Some(Tier::Balance),
        weight: 5,
        applies: |intake: &IntakeRecord| intake.functional.single_leg_stance_seconds < 30.0,
        factor: Some(|intake: &IntakeRecord| {
            format!(
                "Single-leg stance < 30s ({:?}s)",
                intake.functional.single_leg_stance_seconds
            )
        }),
        recommendation: Some("Improve balance to reduce the risk of falling."),
        effect: Some(DimensionEffect {
            dimension: Dimension::Balance,
            severity: |_: &IntakeRecord| 3.0,
        }),
    },
    ScoringRule {
        name: "timed_up_and_go_over_14s",
        tier: None,
        weight: 12,
        applies: |intake: &IntakeRecord| {
            intake.functional.timed_up_and_go_seconds > TUG_THRESHOLD_SECONDS
        },
        factor: Some(|intake: &IntakeRecord| {
            format!(
                "Timed Up and Go > 14s ({:?}s)",
                intake.functional.timed_up_and_go_seconds
            )
        }),
        recommendation: Some(
            "Improve functional mobility and transition speed (sit-to-stand, walking).",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::Mobility,
            severity: |intake: &IntakeRecord| {
                if intake.functional.timed_up_and_go_seconds > TUG_INSTITUTIONAL_SECONDS {
                    5.0
                } else {
                    4.0
                }
            },
        }),
    },
    ScoringRule {
        name: "chair_rise_over_14s",
        tier: None,
        weight: 10,
        applies: |intake: &IntakeRecord| {
            intake.functional.chair_rise_seconds > CHAIR_RISE_THRESHOLD_SECONDS
        },
        factor: Some(|intake: &IntakeRecord| {
            format!(
                "Chair rise (5 reps) > 14s ({:?}s)",
                intake.functional.chair_rise_seconds
            )
        }),
        recommendation: Some("Probable sarcopenia. Strengthen the lower limbs."),
        effect: Some(DimensionEffect {
            dimension: Dimension::LowerLimbStrength,
            severity: |_: &IntakeRecord| 5.0,
        }),
    },
    ScoringRule {
        name: "gait_speed_under_0_65",
        tier: Some(Tier::GaitSpeed),
        weight: 15,
        applies: |intake: &IntakeRecord| intake.functional.gait_speed_ms < 0.65,
        factor: Some(|intake: &IntakeRecord| {
            format!(
                "Gait speed < 0.65 m/s ({:?} m/s)",
                intake.functional.gait_speed_ms
            )
        }),
        recommendation: Some(
            "Strong predictor of falls, loss of independence and decline. Urgent mobility intervention needed.",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::GaitSpeed,
            severity: |_: &IntakeRecord| 5.0,
        }),
    },
    ScoringRule {
        name: "gait_speed_under_0_8",
        tier: Some(Tier::GaitSpeed),
        weight: 10,
        applies: |intake: &IntakeRecord| intake.functional.gait_speed_ms < 0.8,
        factor: Some(|intake: &IntakeRecord| {
            format!(
                "Gait speed < 0.8 m/s ({:?} m/s)",
                intake.functional.gait_speed_ms
            )
        }),
        recommendation: Some(
            "Predicts mobility problems and falls. Work on walking endurance.",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::GaitSpeed,
            severity: |_: &IntakeRecord| 4.0,
        }),
    },
    ScoringRule {
        name: "gait_speed_under_1_0",
        tier: Some(Tier::GaitSpeed),
        weight: 5,
        applies: |intake: &IntakeRecord| intake.functional.gait_speed_ms < 1.0,
        factor: Some(|intake: &IntakeRecord| {
            format!(
                "Gait speed < 1.0 m/s ({:?} m/s)",
                intake.functional.gait_speed_ms
            )
        }),
        recommendation: Some("Frailty marker. Maintain and improve walking speed."),
        effect: Some(DimensionEffect {
            dimension: Dimension::GaitSpeed,
            severity: |_: &IntakeRecord| 2.5,
        }),
    },
    ScoringRule {
        name: "grip_strength_below_norm",
        tier: Some(Tier::GripStrength),
        weight: 12,
        applies: grip_below_norm,
        factor: Some(|intake: &IntakeRecord| {
            format!(
                "Grip strength below norm ({:?} kg vs norm {:.0} kg)",
                intake.functional.grip_strength_kg,
                intake.demographics.sex.grip_norm_kg()
            )
        }),
        recommendation: Some(
            "Sarcopenia risk. Refer to a physician for a nutritional assessment and global strengthening.",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::GripStrength,
            severity: |_: &IntakeRecord| 5.0,
        }),
    },
    ScoringRule {
        name: "grip_strength_within_norm",
        tier: Some(Tier::GripStrength),
        weight: 0,
        applies: |_: &IntakeRecord| true,
        factor: None,
        recommendation: None,
        effect: Some(DimensionEffect {
            dimension: Dimension::GripStrength,
            severity: |_: &IntakeRecord| 0.0,
        }),
    },
    ScoringRule {
        name: "difficulty_rising_from_floor",
        tier: None,
        weight: 8,
        applies: |intake: &IntakeRecord| intake.functional.difficulty_rising_from_floor,
        factor: Some(|_: &IntakeRecord| "Difficulty rising from the floor".to_string()),
        recommendation: Some("Practise rising from the floor safely."),
        effect: Some(DimensionEffect {
            dimension: Dimension::FloorRise,
            severity: |_: &IntakeRecord| 5.0,
        }),
    },
    ScoringRule {
        name: "orthopedic_anomalies",
        tier: None,
        weight: 7,
        applies: |intake: &IntakeRecord| intake.functional.orthopedic_anomalies,
        factor: Some(|_: &IntakeRecord| {
            "Orthopedic anomalies (foot, ankle, joints)".to_string()
        }),
        recommendation: Some(
            "In-depth orthopedic examination and targeted management of anomalies (e.g. ankle dorsiflexion).",
        ),
        effect: Some(DimensionEffect {
            dimension: Dimension::Orthopedic,
            severity: |_: &IntakeRecord| 4.0,
        }),
    },
];

/// Rules that fire for `intake`, honoring tier exclusivity.
pub(crate) fn fired(intake: &IntakeRecord) -> Vec<&'static ScoringRule> {
    let mut claimed: Vec<Tier> = Vec::new();
    let mut fired = Vec::new();

    for rule in &RULES {
        if let Some(tier) = rule.tier {
            if claimed.contains(&tier) {
                continue;
            }
        }

        if (rule.applies)(intake) {
            if let Some(tier) = rule.tier {
                claimed.push(tier);
            }
            fired.push(rule);
        }
    }

    fired
}
