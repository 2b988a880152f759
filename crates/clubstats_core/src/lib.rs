//! Core domain logic for club statistics.
//!
//! Reports are computed in memory over a [`ClubSnapshot`] loaded from
//! SQLite (or built directly), filtered by a [`FilterSpec`] and browsed
//! through a [`PagedSearchList`].

pub mod db;
pub mod filter;
pub mod list;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;
pub mod snapshot;

pub use filter::predicate::{Predicate, PredicateSet, PredicateShape};
pub use filter::{FilterInput, FilterSpec};
pub use list::highlight::{result_highlighter, Podium, RowHighlight};
pub use list::paged::{PageInfo, PagedSearchList};
pub use list::{ListError, TableRow};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::category::{Level, Medal, Sport, Track};
pub use model::club::{Coach, Event, Group, Person, ResultRecord};
pub use repo::{ClubRepository, RepoError, RepoResult, SnapshotSource, SqliteClubRepository};
pub use report::engine::ReportEngine;
pub use report::export::{export_report, ExportError, ExportFormat};
pub use report::types::{
    EntityKind, EntityReport, EventsBreakdown, LeaderboardRow, MedalCount, ReportSummary,
    ResultRow, StandingRow, YearlyRow,
};
pub use service::report_service::ReportService;
pub use snapshot::ClubSnapshot;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
