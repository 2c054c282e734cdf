use chrono::NaiveDate;
use clap::Args;
use frailty_screen::error::AppError;
use frailty_screen::screening::{
    AssessmentRequest, InMemoryHistoryStore, IntakeRecord, PatientId, ScoreComponent,
    ScoringEngine, ScreeningReport, ScreeningService, SerializationError,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Path to an intake record stored as JSON
    #[arg(long)]
    pub(crate) intake: PathBuf,
    /// Patient name printed on the report
    #[arg(long, default_value = "Unnamed resident")]
    pub(crate) patient: String,
    /// Evaluation date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// List the points contributed by each rule
    #[arg(long)]
    pub(crate) explain: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        intake,
        patient,
        date,
        json,
        explain,
    } = args;

    let raw = std::fs::read(&intake)?;
    let intake = parse_intake(&raw)?;

    let service = ScreeningService::new(Arc::new(InMemoryHistoryStore::new()));
    let entry = service.preview(AssessmentRequest {
        patient_name: PatientId(patient),
        evaluation_date: date,
        intake,
    })?;
    let report = ScreeningReport::from_entry(&entry);

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(SerializationError::from)?;
        println!("{rendered}");
        return Ok(());
    }

    let components = if explain {
        ScoringEngine::new().components(&intake)
    } else {
        Vec::new()
    };
    print!("{}", render_report(&report, &components));
    Ok(())
}

fn parse_intake(raw: &[u8]) -> Result<IntakeRecord, SerializationError> {
    Ok(serde_json::from_slice(raw)?)
}

fn render_report(report: &ScreeningReport, components: &[ScoreComponent]) -> String {
    let mut out = String::new();
    out.push_str("=== Motor Frailty Screening ===\n");
    out.push_str(&format!(
        "Patient: {} | Evaluated: {}\n",
        report.patient_name.0, report.evaluation_date
    ));
    out.push_str(&format!(
        "Score: {} | Risk level: {}\n",
        report.total_score, report.risk_label
    ));
    out.push_str(&format!("{}\n", report.interpretation));

    out.push_str("\nDetected risk factors\n");
    if report.detected_factors.is_empty() {
        out.push_str("  none\n");
    }
    for factor in &report.detected_factors {
        out.push_str(&format!("  - {factor}\n"));
    }

    out.push_str("\nRecommendations\n");
    for recommendation in &report.recommendations {
        out.push_str(&format!("  - {recommendation}\n"));
    }
    for line in &report.follow_up {
        out.push_str(&format!("  * {line}\n"));
    }

    out.push_str("\nFrailty profile (0-5)\n");
    for axis in &report.profile {
        out.push_str(&format!("  {:<20} {:.1}\n", axis.label, axis.severity));
    }

    if !components.is_empty() {
        out.push_str("\nScore breakdown\n");
        for component in components {
            match &component.notes {
                Some(notes) => out.push_str(&format!(
                    "  {:<28} +{:<3} {}\n",
                    component.rule, component.score, notes
                )),
                None => out.push_str(&format!("  {:<28} +{}\n", component.rule, component.score)),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use frailty_screen::screening::RiskLevel;

    const INTAKE: &str = r#"{
        "demographics": { "age": 84, "sex": "female", "lived_alone": true },
        "interview": {
            "fell_last_year": true,
            "fall_count": 2,
            "fear_of_falling": true,
            "chronic_pain": false,
            "cognitive_issues": false,
            "high_risk_medication": false
        },
        "functional": {
            "single_leg_stance_seconds": 4.0,
            "timed_up_and_go_seconds": 12.0,
            "chair_rise_seconds": 11.0,
            "gait_speed_ms": 0.9,
            "grip_strength_kg": 18.0,
            "difficulty_rising_from_floor": false,
            "orthopedic_anomalies": false
        }
    }"#;

    fn sample_report() -> (ScreeningReport, Vec<ScoreComponent>) {
        let intake = parse_intake(INTAKE.as_bytes()).expect("intake parses");
        let service = ScreeningService::new(Arc::new(InMemoryHistoryStore::new()));
        let entry = service
            .preview(AssessmentRequest {
                patient_name: PatientId("Jeanne Martin".to_string()),
                evaluation_date: NaiveDate::from_ymd_opt(2025, 6, 2),
                intake,
            })
            .expect("intake is valid");
        let components = ScoringEngine::new().components(&intake);
        (ScreeningReport::from_entry(&entry), components)
    }

    #[test]
    fn text_report_lists_score_and_factors() {
        let (report, components) = sample_report();
        // falls 10 + repeated 5 + fear 8 + stance < 5s 15 + gait < 1.0 5
        assert_eq!(report.total_score, 43);
        assert_eq!(report.risk_level, RiskLevel::PreFrail);

        let rendered = render_report(&report, &components);
        assert!(rendered.contains("Patient: Jeanne Martin | Evaluated: 2025-06-02"));
        assert!(rendered.contains("Score: 43 | Risk level: Pre-frail"));
        assert!(rendered.contains("Falls in the past year (2 times)"));
        assert!(rendered.contains("Score breakdown"));
    }

    #[test]
    fn malformed_intake_is_a_serialization_error() {
        let err = parse_intake(b"{\"demographics\": 3}").expect_err("rejected");
        assert!(matches!(err, SerializationError::Malformed(_)));
    }
}
