// src/ui/widgets/mod.rs

pub mod analysis_view; // Badges and weaknesses, with details for the selection.
pub mod footer;
pub mod input;
pub mod summary; // Score gauge, certificate and server.
