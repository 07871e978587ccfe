// src/core/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Why a score could not be computed.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    /// The primary probe could not resolve the host. Kept apart from other
    /// network failures so callers can answer "domain not found".
    #[error("Could not resolve host '{host}': {message}")]
    UnresolvableHost { host: String, message: String },

    #[error("Probe failed: {0}")]
    ProbeFailure(String),

    #[error("No applicable checks: the maximum achievable score is zero")]
    EmptyMaximum,

    #[error("Failed to set up probe clients: {0}")]
    ClientSetup(String),
}

/// Failure of the primary HEAD probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("DNS resolution failed for '{host}': {message}")]
    UnresolvableHost { host: String, message: String },

    #[error("{0}")]
    Transport(String),
}

impl From<ProbeError> for ScoreError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::UnresolvableHost { host, message } => {
                ScoreError::UnresolvableHost { host, message }
            }
            ProbeError::Transport(message) => ScoreError::ProbeFailure(message),
        }
    }
}

/// The server-signature catalog could not be loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Could not read server catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed server catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Server catalog entry {index} has an empty prefix")]
    EmptyPrefix { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unresolvable_probe_maps_to_unresolvable_host() {
        let err: ScoreError = ProbeError::UnresolvableHost {
            host: "nope.invalid".to_string(),
            message: "no such host".to_string(),
        }
        .into();
        assert!(matches!(err, ScoreError::UnresolvableHost { ref host, .. } if host == "nope.invalid"));
    }

    #[test]
    fn transport_probe_maps_to_probe_failure() {
        let err: ScoreError = ProbeError::Transport("connection reset".to_string()).into();
        assert!(matches!(err, ScoreError::ProbeFailure(ref m) if m == "connection reset"));
        assert_eq!(err.to_string(), "Probe failed: connection reset");
    }
}
