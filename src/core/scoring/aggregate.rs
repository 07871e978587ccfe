// src/core/scoring/aggregate.rs

use crate::core::error::ScoreError;
use crate::core::knowledge_base;
use crate::core::models::{Badge, CheckResult, OverallScore, ScoreContribution};

/// The combined outcome of every check.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub score: OverallScore,
    pub badges: Vec<Badge>,
}

/// `ceil(achieved / maximum * 100) / 100`, computed on integers so that
/// exact ratios such as 34/50 never drift upwards through float error.
pub fn normalize(total: ScoreContribution) -> Result<f64, ScoreError> {
    if total.maximum == 0 {
        return Err(ScoreError::EmptyMaximum);
    }
    let achieved = u64::from(total.achieved.min(total.maximum));
    let maximum = u64::from(total.maximum);
    let percent = (achieved * 100).div_ceil(maximum);
    Ok(percent as f64 / 100.0)
}

/// Sums the checks, normalizes, and derives badges and messages.
///
/// Messages are ordered: the protocol message, one weakness per applicable
/// check that fell short (in check order), then any supplementary notes.
pub fn aggregate(
    checks: &[CheckResult],
    protocol_message: &str,
    notes: Vec<String>,
) -> Result<Aggregate, ScoreError> {
    let total: ScoreContribution = checks.iter().map(|check| check.contribution).sum();
    let normalized = normalize(total)?;

    let mut ordered = checks.to_vec();
    ordered.sort_by_key(|check| check.kind);

    let badges = ordered.iter().filter_map(knowledge_base::badge_for).collect();

    let mut messages = vec![protocol_message.to_string()];
    messages.extend(
        ordered
            .iter()
            .filter_map(knowledge_base::weakness_for)
            .map(str::to_string),
    );
    messages.extend(notes);

    Ok(Aggregate {
        score: OverallScore {
            normalized,
            achieved_total: total.achieved,
            max_total: total.maximum,
            messages,
        },
        badges,
    })
}
