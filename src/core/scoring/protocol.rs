// src/core/scoring/protocol.rs

use crate::core::models::ScoreContribution;

pub const SECURE_MESSAGE: &str = "From the protocol level, Website is secure.";
pub const INSECURE_MESSAGE: &str =
    "Website is unencrypted and hence subject to Man-in-the-Middle (MITM) and Eavesdropping attacks.";
pub const UNKNOWN_MESSAGE: &str = "Protocol Not Found";

/// Scores the URL scheme.
///
/// An unrecognised scheme contributes `0/0`: it adds a message but cannot move
/// the achievable ceiling in either direction.
pub fn score_protocol(scheme: &str) -> (ScoreContribution, &'static str) {
    match scheme {
        "https" => (ScoreContribution::out_of_five(5), SECURE_MESSAGE),
        "http" => (ScoreContribution::out_of_five(0), INSECURE_MESSAGE),
        _ => (ScoreContribution::NONE, UNKNOWN_MESSAGE),
    }
}
