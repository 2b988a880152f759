//! Report use-case service.
//!
//! # Responsibility
//! - Load a fresh snapshot for every call and delegate to [`ReportEngine`].
//! - Pair entity reports with the entity they describe, for rendering.
//!
//! # Invariants
//! - Nothing is cached between calls; storage changes are visible on the
//!   next report.
//! - Unknown entity ids yield `entity: None` plus an empty report.

use crate::filter::FilterSpec;
use crate::model::club::{Coach, CoachId, Event, EventId, Group, GroupId, Person, PersonId};
use crate::repo::{RepoResult, SnapshotSource};
use crate::report::engine::ReportEngine;
use crate::report::types::{
    EntityReport, EventsBreakdown, LeaderboardRow, MedalCount, ResultRow, RosterEntry,
    StandingRow, YearlyRow,
};
use crate::snapshot::ClubSnapshot;
use serde::Serialize;

/// Entity report together with the entity row, when it exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView<E> {
    pub entity: Option<E>,
    pub report: EntityReport,
}

/// Group report with its member roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub group: Option<Group>,
    pub roster: Vec<RosterEntry>,
    pub report: EntityReport,
}

/// Standings of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingsView {
    pub event: Option<Event>,
    pub rows: Vec<StandingRow>,
}

/// Use-case service over any snapshot source.
pub struct ReportService<S: SnapshotSource> {
    source: S,
}

impl<S: SnapshotSource> ReportService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn medal_summary(&self, filter: &FilterSpec) -> RepoResult<MedalCount> {
        self.with_engine(|engine| engine.medal_summary(filter))
    }

    pub fn events_breakdown(&self, filter: &FilterSpec) -> RepoResult<EventsBreakdown> {
        self.with_engine(|engine| engine.events_breakdown(filter))
    }

    pub fn coach_leaderboard(&self, filter: &FilterSpec) -> RepoResult<Vec<LeaderboardRow>> {
        self.with_engine(|engine| engine.coach_leaderboard(filter))
    }

    pub fn yearly_dynamics(&self, filter: &FilterSpec) -> RepoResult<Vec<YearlyRow>> {
        self.with_engine(|engine| engine.yearly_dynamics(filter))
    }

    pub fn result_rows(&self, filter: &FilterSpec) -> RepoResult<Vec<ResultRow>> {
        self.with_engine(|engine| engine.result_rows(filter))
    }

    pub fn person_report(
        &self,
        person_id: PersonId,
        filter: &FilterSpec,
    ) -> RepoResult<EntityView<Person>> {
        let snapshot = self.source.load_snapshot()?;
        Ok(EntityView {
            entity: snapshot.person(person_id).cloned(),
            report: ReportEngine::new(&snapshot).person_report(person_id, filter),
        })
    }

    pub fn coach_report(
        &self,
        coach_id: CoachId,
        filter: &FilterSpec,
    ) -> RepoResult<EntityView<Coach>> {
        let snapshot = self.source.load_snapshot()?;
        Ok(EntityView {
            entity: snapshot.coach(coach_id).cloned(),
            report: ReportEngine::new(&snapshot).coach_report(coach_id, filter),
        })
    }

    pub fn group_report(&self, group_id: GroupId, filter: &FilterSpec) -> RepoResult<GroupView> {
        let snapshot = self.source.load_snapshot()?;
        let engine = ReportEngine::new(&snapshot);
        Ok(GroupView {
            group: snapshot.group(group_id).cloned(),
            roster: engine.group_roster(group_id),
            report: engine.group_report(group_id, filter),
        })
    }

    pub fn event_standings(&self, event_id: EventId) -> RepoResult<StandingsView> {
        let snapshot = self.source.load_snapshot()?;
        Ok(StandingsView {
            event: snapshot.event(event_id).cloned(),
            rows: ReportEngine::new(&snapshot).event_standings(event_id),
        })
    }

    fn with_engine<T>(&self, run: impl FnOnce(&ReportEngine<'_>) -> T) -> RepoResult<T> {
        let snapshot: ClubSnapshot = self.source.load_snapshot()?;
        Ok(run(&ReportEngine::new(&snapshot)))
    }
}
