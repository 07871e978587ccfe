// src/core/scoring/incidents.rs

use crate::core::models::{IncidentRecord, ScoreContribution};
use chrono::Duration;

/// Fixes slower than this earn half credit.
pub const MAX_INCIDENT_RESPONSE_HOURS: i64 = 720;

const POINTS_PER_INCIDENT: u32 = 10;
const SLOW_FIX_POINTS: u32 = 5;

/// Remediation speed gated by disclosure volume.
///
/// Every incident adds 10 to the maximum; only fixed ones earn points, 10 when
/// fixed within 720 hours and 5 otherwise. A fixed record missing either date
/// is treated as slow. No incidents at all scores `0/0`.
pub fn score_incidents(incidents: &[IncidentRecord]) -> ScoreContribution {
    let threshold = Duration::hours(MAX_INCIDENT_RESPONSE_HOURS);
    let achieved = incidents
        .iter()
        .filter(|incident| incident.fixed)
        .map(|incident| match (incident.reported_date, incident.fixed_date) {
            (Some(reported), Some(fixed)) if fixed - reported <= threshold => POINTS_PER_INCIDENT,
            _ => SLOW_FIX_POINTS,
        })
        .sum();
    let maximum = POINTS_PER_INCIDENT * incidents.len() as u32;
    ScoreContribution::new(achieved, maximum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn incident(fixed_after_hours: Option<i64>, fixed: bool) -> IncidentRecord {
        let reported = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        IncidentRecord {
            reported_date: Some(reported),
            fixed_date: fixed_after_hours.map(|h| reported + Duration::hours(h)),
            fixed,
            kind: Some("Cross Site Scripting".to_string()),
            url: None,
        }
    }

    #[test]
    fn no_incidents_is_neutral() {
        assert_eq!(score_incidents(&[]), ScoreContribution::NONE);
    }

    #[test]
    fn fast_and_slow_fixes() {
        let score = score_incidents(&[incident(Some(48), true), incident(Some(2000), true)]);
        assert_eq!(score, ScoreContribution::new(15, 20));
    }

    #[test]
    fn threshold_is_inclusive() {
        assert_eq!(score_incidents(&[incident(Some(720), true)]), ScoreContribution::new(10, 10));
        assert_eq!(score_incidents(&[incident(Some(721), true)]), ScoreContribution::new(5, 10));
    }

    #[test]
    fn unfixed_incidents_only_raise_the_maximum() {
        let score = score_incidents(&[incident(None, false), incident(Some(1), true)]);
        assert_eq!(score, ScoreContribution::new(10, 20));
    }

    #[test]
    fn fixed_without_date_counts_as_slow() {
        assert_eq!(score_incidents(&[incident(None, true)]), ScoreContribution::new(5, 10));
    }

    #[test]
    fn undated_reports_still_raise_the_maximum() {
        let undated_fixed = IncidentRecord { reported_date: None, ..incident(Some(1), true) };
        let undated_open = IncidentRecord { reported_date: None, ..incident(None, false) };
        let score = score_incidents(&[incident(Some(1), true), undated_fixed, undated_open]);
        assert_eq!(score, ScoreContribution::new(15, 30));
    }
}
