// src/lib.rs

pub mod config;
pub mod core;
pub mod logging;

pub use crate::config::ScoreConfig;
pub use crate::core::error::ScoreError;
pub use crate::core::models::ScoreReport;
pub use crate::core::scanner::ScoreEngine;
