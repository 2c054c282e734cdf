use super::super::domain::RiskLevel;

/// Scores at or above this value are classified as frail.
pub const FRAIL_THRESHOLD: u32 = 50;
/// Scores at or above this value (and below [`FRAIL_THRESHOLD`]) are pre-frail.
pub const PRE_FRAIL_THRESHOLD: u32 = 25;

impl RiskLevel {
    pub const fn from_score(total_score: u32) -> Self {
        if total_score >= FRAIL_THRESHOLD {
            Self::Frail
        } else if total_score >= PRE_FRAIL_THRESHOLD {
            Self::PreFrail
        } else {
            Self::Robust
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Robust => "Robust / not frail",
            Self::PreFrail => "Pre-frail",
            Self::Frail => "Frail",
        }
    }

    /// Narrative shown next to the level.
    pub const fn interpretation(self) -> &'static str {
        match self {
            Self::Frail => {
                "Numerous motor frailty indicators and a high fall risk. An urgent multidisciplinary \
                 assessment and comprehensive care are needed."
            }
            Self::PreFrail => {
                "Several frailty indicators. Targeted interventions and a programme preserving \
                 locomotor capacity are strongly recommended to prevent established frailty."
            }
            Self::Robust => {
                "Currently considered robust. A programme maintaining physical capacity is advised \
                 to preserve autonomy."
            }
        }
    }
}
