//! Repository modules for the radar's stored entities.
//!
//! Each module adds methods to `RadarService` via `impl RadarService` blocks.

pub mod api_version;
pub mod notice;
pub mod technology;
