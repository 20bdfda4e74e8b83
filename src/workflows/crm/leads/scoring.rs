use serde::{Deserialize, Serialize};

use super::domain::CategoryScore;

/// Qualitative grade derived from the 0-100 total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Hot,
    Warm,
    Cold,
}

impl ScoreTier {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreTier::Hot => "hot",
            ScoreTier::Warm => "warm",
            ScoreTier::Cold => "cold",
        }
    }
}

/// Validation errors for a score breakdown. Checked before scoring so
/// `compute_total` never has to paper over a division by zero.
#[derive(Debug, thiserror::Error)]
pub enum ScoreBreakdownError {
    #[error("category '{category}' has a max score of zero")]
    ZeroMaxScore { category: String },
    #[error("category '{category}' scores {score} above its max of {max_score}")]
    ScoreAboveMax {
        category: String,
        score: u32,
        max_score: u32,
    },
}

/// Reject breakdown entries the scoring model cannot consume. Weight sums
/// other than 100 are deliberately not checked; see `compute_total`.
pub fn validate_breakdown(breakdown: &[CategoryScore]) -> Result<(), ScoreBreakdownError> {
    for entry in breakdown {
        if entry.max_score == 0 {
            return Err(ScoreBreakdownError::ZeroMaxScore {
                category: entry.category.clone(),
            });
        }
        if entry.score > entry.max_score {
            return Err(ScoreBreakdownError::ScoreAboveMax {
                category: entry.category.clone(),
                score: entry.score,
                max_score: entry.max_score,
            });
        }
    }
    Ok(())
}

/// Weighted total: sum of `(score / max_score) * weight` per category, with
/// the fractional remainder dropped (a 71.5 breakdown persists as 71).
/// Weights are applied as given; categories summing under 100 just lower the
/// reachable ceiling, and anything over is capped so the 0-100 contract
/// holds. Callers validate via `validate_breakdown` first.
pub fn compute_total(breakdown: &[CategoryScore]) -> u8 {
    let total: f64 = breakdown
        .iter()
        .map(|entry| {
            debug_assert!(entry.max_score > 0, "breakdown must be validated");
            // Multiply before dividing so integer inputs stay exact.
            f64::from(entry.score) * f64::from(entry.weight) / f64::from(entry.max_score)
        })
        .sum();

    total.floor().clamp(0.0, 100.0) as u8
}

/// Tier boundaries are inclusive on the lower bound: 80 is Hot, 60 is Warm.
pub const fn classify(total: u8) -> ScoreTier {
    if total >= 80 {
        ScoreTier::Hot
    } else if total >= 60 {
        ScoreTier::Warm
    } else {
        ScoreTier::Cold
    }
}

/// Signed trend between the freshly computed total and the score currently
/// persisted on the lead.
pub const fn delta(total: u8, previous: u8) -> i16 {
    total as i16 - previous as i16
}
