//! Club domain model: entities, categories and insert requests.
//!
//! # Responsibility
//! - Define the records the reporting core reads (coaches, groups, persons,
//!   events, results).
//! - Define the closed category sets (level, track, sport, medal).
//!
//! # Invariants
//! - Entity ids are SQLite rowids and never reused by the storage layer.
//! - Events keep level/track/sport as raw labels; the enums describe the
//!   known vocabulary, not every persisted value.

pub mod category;
pub mod club;
