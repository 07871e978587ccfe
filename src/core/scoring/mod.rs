// src/core/scoring/mod.rs

//! Pure scoring rules. Each scorer maps one category of probe output to
//! `(achieved, maximum)` contributions and never touches the network.

pub mod aggregate;
pub mod headers;
pub mod incidents;
pub mod mail_auth;
pub mod protocol;

pub use aggregate::{aggregate, normalize, Aggregate};
pub use headers::{score_probe, HeaderScores};
pub use incidents::score_incidents;
pub use mail_auth::{score_dmarc, score_spf};
pub use protocol::score_protocol;
