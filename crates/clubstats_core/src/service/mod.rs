//! Core use-case services.
//!
//! # Responsibility
//! - Turn a snapshot source plus a filter into finished report records.
//! - Keep the CLI decoupled from storage details.

pub mod report_service;
