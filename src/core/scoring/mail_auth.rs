// src/core/scoring/mail_auth.rs

use crate::core::models::ScoreContribution;

/// Points for one TXT record, or `None` when it carries no `all` qualifier.
///
/// `-all` (fail) → 5, `~all` (softfail) → 3, `?all` (neutral) → 2,
/// `+all` (pass everything) → 0.
pub fn spf_points(record: &str) -> Option<u32> {
    let record = record.trim();
    if record.ends_with("-all") {
        Some(5)
    } else if record.ends_with("~all") {
        Some(3)
    } else if record.ends_with("?all") {
        Some(2)
    } else if record.ends_with("+all") {
        Some(0)
    } else {
        None
    }
}

/// Sums every qualifying record; each one adds 5 to the maximum.
/// A domain without qualifying records scores `0/0`.
pub fn score_spf(records: &[String]) -> ScoreContribution {
    records
        .iter()
        .filter_map(|record| spf_points(record))
        .map(ScoreContribution::out_of_five)
        .sum()
}

/// A record starting with `v=DMARC` → 5/5, anything else → 0/5.
pub fn score_dmarc(record: Option<&str>) -> ScoreContribution {
    let points = match record {
        Some(r) if r.trim().starts_with("v=DMARC") => 5,
        _ => 0,
    };
    ScoreContribution::out_of_five(points)
}
