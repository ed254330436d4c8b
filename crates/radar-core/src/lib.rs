//! # radar-core
//!
//! Core types for the technology radar lifecycle engine.
//!
//! This crate provides the foundational types shared across all radar crates:
//! - Entity structs for technologies, API versions, deprecation notices and snapshots
//! - Classification and lifecycle enums with state machine transitions
//! - ID prefix constants and formatting helpers
//! - Domain events emitted by the engine for collaborators
//! - The validation layer
//! - The shared error taxonomy with machine-readable codes

pub mod entities;
pub mod enums;
pub mod errors;
pub mod events;
pub mod ids;
pub mod validation;
