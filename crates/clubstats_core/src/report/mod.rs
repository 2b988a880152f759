//! Filtered aggregation reports.
//!
//! # Responsibility
//! - Compute report records from a club snapshot and a filter ([`engine`]).
//! - Render records as text ([`render`]) and export text to files
//!   ([`export`]).
//!
//! # Invariants
//! - Report computation is read-only and side-effect free.
//! - No report fails because nothing matched.

pub mod engine;
pub mod export;
pub mod render;
pub mod types;
