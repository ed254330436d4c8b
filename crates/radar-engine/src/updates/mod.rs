//! Update builder types for entity revisions.
//!
//! Each builder produces an update struct with `Option` fields. Only `Some`
//! fields are applied; everything else keeps its stored value.

pub mod technology;
