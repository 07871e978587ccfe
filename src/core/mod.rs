// src/core/mod.rs

/// Error types shared by the scanners and the scoring engine.
pub mod error;

/// Check and badge descriptions: titles, weaknesses and remediation advice.
pub mod knowledge_base;

/// Data structures passed between probes, scoring and the UI, such as
/// `ScoreContribution`, `CheckResult` and `ScoreReport`.
pub mod models;

/// Probe traits, their network implementations and the `ScoreEngine`
/// that orchestrates one scoring run.
pub mod scanner;

/// Pure scoring rules. Nothing here touches the network.
pub mod scoring;

pub mod server_catalog;
