//! Filtered aggregation over a club snapshot.
//!
//! # Responsibility
//! - Compose predicates once per call and apply them to the aggregation root
//!   (events directly, results through their event).
//! - Produce fixed-shape report records.
//!
//! # Invariants
//! - Read-only: the snapshot is never mutated and nothing is cached.
//! - Empty matches produce zero/empty reports, never errors.
//! - Unknown entity ids produce empty reports.

use crate::filter::predicate::{PredicateSet, PredicateShape};
use crate::filter::FilterSpec;
use crate::model::club::{is_prize, CoachId, Event, EventId, GroupId, PersonId, ResultRecord};
use crate::report::types::{
    EntityKind, EntityReport, EventsBreakdown, LeaderboardRow, MedalCount, ReportSummary,
    ResultRow, RosterEntry, StandingRow, YearlyRow,
};
use crate::snapshot::ClubSnapshot;
use chrono::Datelike;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

/// Report engine bound to one snapshot.
pub struct ReportEngine<'snap> {
    snapshot: &'snap ClubSnapshot,
}

#[derive(Default)]
struct CoachTally {
    medals: MedalCount,
    starts: u32,
    events: BTreeSet<EventId>,
    athletes: BTreeSet<PersonId>,
}

impl<'snap> ReportEngine<'snap> {
    pub fn new(snapshot: &'snap ClubSnapshot) -> Self {
        Self { snapshot }
    }

    /// Gold/silver/bronze totals over results whose event matches `filter`.
    pub fn medal_summary(&self, filter: &FilterSpec) -> MedalCount {
        let started_at = Instant::now();
        let joined = PredicateSet::compose(filter, PredicateShape::Joined);

        let mut count = MedalCount::default();
        let mut rows = 0usize;
        for (result, _) in self.matching_results(&joined) {
            count.record(result.medal);
            rows += 1;
        }

        log_run("medal_summary", &joined, rows, started_at);
        count
    }

    /// Matching events counted per level and per track.
    ///
    /// Labels outside the known vocabulary are skipped for that dimension.
    pub fn events_breakdown(&self, filter: &FilterSpec) -> EventsBreakdown {
        let started_at = Instant::now();
        let direct = PredicateSet::compose(filter, PredicateShape::Direct);

        let mut breakdown = EventsBreakdown::seeded();
        let mut rows = 0usize;
        for event in self.matching_events(&direct) {
            if let Some(level) = event.level_kind() {
                *breakdown.by_level.entry(level).or_insert(0) += 1;
            }
            if let Some(track) = event.track_kind() {
                *breakdown.by_track.entry(track).or_insert(0) += 1;
            }
            rows += 1;
        }

        log_run("events_breakdown", &direct, rows, started_at);
        breakdown
    }

    /// Per-coach medals, starts, distinct events and athletes.
    ///
    /// Results are attributed through person → group → coach; results of
    /// athletes without a coached group are left out. Rows are ordered by
    /// `(gold, silver, bronze, starts)` descending, ties by coach id.
    pub fn coach_leaderboard(&self, filter: &FilterSpec) -> Vec<LeaderboardRow> {
        let started_at = Instant::now();
        let joined = PredicateSet::compose(filter, PredicateShape::Joined);

        let mut tallies: BTreeMap<CoachId, CoachTally> = BTreeMap::new();
        for (result, event) in self.matching_results(&joined) {
            let Some(coach) = self.snapshot.coach_of(result.person_id) else {
                continue;
            };
            let tally = tallies.entry(coach.id).or_default();
            tally.medals.record(result.medal);
            tally.starts += 1;
            tally.events.insert(event.id);
            tally.athletes.insert(result.person_id);
        }

        let mut rows = tallies
            .into_iter()
            .filter_map(|(coach_id, tally)| {
                let coach = self.snapshot.coach(coach_id)?;
                Some(LeaderboardRow {
                    coach_id,
                    coach_name: coach.full_name.clone(),
                    medals: tally.medals,
                    starts: tally.starts,
                    events: count_u32(tally.events.len()),
                    athletes: count_u32(tally.athletes.len()),
                })
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));

        log_run("coach_leaderboard", &joined, rows.len(), started_at);
        rows
    }

    /// Results scoped to one person, coach or group, with summary.
    ///
    /// Coach and group scope follow current group membership.
    pub fn entity_report(&self, kind: EntityKind, id: i64, filter: &FilterSpec) -> EntityReport {
        let started_at = Instant::now();
        let joined = PredicateSet::compose(filter, PredicateShape::Joined);

        let mut rows = Vec::new();
        let mut summary = ReportSummary::default();
        let mut events = BTreeSet::new();
        let mut athletes = BTreeSet::new();

        for (result, event) in self.matching_results(&joined) {
            if !self.in_scope(kind, id, result) {
                continue;
            }
            summary.starts += 1;
            summary.medals.record(result.medal);
            if is_prize(result.place, result.medal) {
                summary.prizes += 1;
            }
            events.insert(event.id);
            athletes.insert(result.person_id);
            rows.push(self.result_row(result, event));
        }
        summary.events = count_u32(events.len());
        summary.athletes = count_u32(athletes.len());
        sort_newest_first(&mut rows);

        debug!(
            "event=report_run module=report kind=entity_report entity={:?} entity_id={} predicates={} rows={} duration_ms={}",
            kind,
            id,
            joined.len(),
            rows.len(),
            started_at.elapsed().as_millis()
        );
        EntityReport {
            kind,
            entity_id: id,
            rows,
            summary,
        }
    }

    pub fn person_report(&self, person_id: PersonId, filter: &FilterSpec) -> EntityReport {
        self.entity_report(EntityKind::Person, person_id, filter)
    }

    pub fn coach_report(&self, coach_id: CoachId, filter: &FilterSpec) -> EntityReport {
        self.entity_report(EntityKind::Coach, coach_id, filter)
    }

    pub fn group_report(&self, group_id: GroupId, filter: &FilterSpec) -> EntityReport {
        self.entity_report(EntityKind::Group, group_id, filter)
    }

    /// Every matching result as a flat row, newest first.
    pub fn result_rows(&self, filter: &FilterSpec) -> Vec<ResultRow> {
        let started_at = Instant::now();
        let joined = PredicateSet::compose(filter, PredicateShape::Joined);

        let mut rows = self
            .matching_results(&joined)
            .map(|(result, event)| self.result_row(result, event))
            .collect::<Vec<_>>();
        sort_newest_first(&mut rows);

        log_run("result_rows", &joined, rows.len(), started_at);
        rows
    }

    /// Events with results and medals per year, merged on the union of years.
    pub fn yearly_dynamics(&self, filter: &FilterSpec) -> Vec<YearlyRow> {
        let started_at = Instant::now();
        let direct = PredicateSet::compose(filter, PredicateShape::Direct);
        let joined = PredicateSet::compose(filter, PredicateShape::Joined);

        let with_results = self
            .snapshot
            .results()
            .map(|result| result.event_id)
            .collect::<BTreeSet<_>>();
        let mut events_by_year: BTreeMap<i32, BTreeSet<EventId>> = BTreeMap::new();
        for event in self.matching_events(&direct) {
            if with_results.contains(&event.id) {
                events_by_year
                    .entry(event.date.year())
                    .or_default()
                    .insert(event.id);
            }
        }

        let mut medals_by_year: BTreeMap<i32, MedalCount> = BTreeMap::new();
        for (result, event) in self.matching_results(&joined) {
            medals_by_year
                .entry(event.date.year())
                .or_default()
                .record(result.medal);
        }

        let years = events_by_year
            .keys()
            .chain(medals_by_year.keys())
            .copied()
            .collect::<BTreeSet<_>>();
        let rows = years
            .into_iter()
            .map(|year| {
                let events = events_by_year.get(&year).map_or(0, BTreeSet::len);
                let medals = medals_by_year.get(&year).copied().unwrap_or_default();
                YearlyRow {
                    year,
                    events: count_u32(events),
                    gold: medals.gold,
                    silver: medals.silver,
                    bronze: medals.bronze,
                    total_medals: medals.total(),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "event=report_run module=report kind=yearly_dynamics predicates={} years={} duration_ms={}",
            direct.len(),
            rows.len(),
            started_at.elapsed().as_millis()
        );
        rows
    }

    /// Current members of a group, ordered by last then first name.
    pub fn group_roster(&self, group_id: GroupId) -> Vec<RosterEntry> {
        let mut members = self
            .snapshot
            .persons()
            .filter(|person| person.group_id == Some(group_id))
            .collect::<Vec<_>>();
        members.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
                .then_with(|| a.id.cmp(&b.id))
        });
        members
            .into_iter()
            .map(|person| RosterEntry {
                person_id: person.id,
                full_name: person.full_name(),
                birthdate: person.birthdate,
                phone: person.phone.clone(),
            })
            .collect()
    }

    /// All results of one event, unfiltered.
    ///
    /// Ordered by place (absent last), medal rank (absent last), then athlete.
    pub fn event_standings(&self, event_id: EventId) -> Vec<StandingRow> {
        let mut rows = self
            .snapshot
            .results()
            .filter(|result| result.event_id == event_id)
            .map(|result| StandingRow {
                result_id: result.id,
                place: result.place,
                medal: result.medal,
                person_id: result.person_id,
                athlete: self.athlete_name(result.person_id),
                group_name: self
                    .snapshot
                    .group_of(result.person_id)
                    .map(|group| group.name.clone()),
                coach_name: self
                    .snapshot
                    .coach_of(result.person_id)
                    .map(|coach| coach.full_name.clone()),
                category: result.category.clone(),
                note: result.note.clone(),
            })
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| {
            (a.place.is_none(), a.place, a.medal.is_none(), a.medal, &a.athlete).cmp(&(
                b.place.is_none(),
                b.place,
                b.medal.is_none(),
                b.medal,
                &b.athlete,
            ))
        });
        rows
    }

    fn matching_events<'a>(
        &'a self,
        direct: &'a PredicateSet,
    ) -> impl Iterator<Item = &'snap Event> + 'a {
        self.snapshot
            .events()
            .filter(move |event| direct.matches_event(event))
    }

    fn matching_results<'a>(
        &'a self,
        joined: &'a PredicateSet,
    ) -> impl Iterator<Item = (&'snap ResultRecord, &'snap Event)> + 'a {
        let snapshot = self.snapshot;
        snapshot.results().filter_map(move |result| {
            let event = snapshot.event_of(result)?;
            joined.matches_event(event).then_some((result, event))
        })
    }

    fn in_scope(&self, kind: EntityKind, id: i64, result: &ResultRecord) -> bool {
        match kind {
            EntityKind::Person => result.person_id == id,
            EntityKind::Group => self
                .snapshot
                .person(result.person_id)
                .is_some_and(|person| person.group_id == Some(id)),
            EntityKind::Coach => self
                .snapshot
                .coach_of(result.person_id)
                .is_some_and(|coach| coach.id == id),
        }
    }

    fn result_row(&self, result: &ResultRecord, event: &Event) -> ResultRow {
        ResultRow {
            result_id: result.id,
            date: event.date,
            event_id: event.id,
            event_name: event.name.clone(),
            level: event.level.clone(),
            track: event.track.clone(),
            sport: event.sport.clone(),
            person_id: result.person_id,
            athlete: self.athlete_name(result.person_id),
            category: result.category.clone(),
            place: result.place,
            medal: result.medal,
            note: result.note.clone(),
        }
    }

    fn athlete_name(&self, person_id: PersonId) -> String {
        self.snapshot
            .person(person_id)
            .map(|person| person.full_name())
            .unwrap_or_default()
    }
}

fn sort_newest_first(rows: &mut [ResultRow]) {
    rows.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.result_id.cmp(&a.result_id))
    });
}

fn count_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn log_run(kind: &'static str, predicates: &PredicateSet, rows: usize, started_at: Instant) {
    debug!(
        "event=report_run module=report kind={kind} predicates={} filter=\"{}\" rows={rows} duration_ms={}",
        predicates.len(),
        predicates.describe(),
        started_at.elapsed().as_millis()
    );
}

#[cfg(test)]
mod tests {
    use super::ReportEngine;
    use crate::filter::FilterSpec;
    use crate::model::category::Medal;
    use crate::model::club::{NewCoach, NewEvent, NewGroup, NewPerson, NewResult};
    use crate::snapshot::ClubSnapshot;
    use chrono::NaiveDate;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn results_with_dangling_event_are_ignored() {
        let mut snapshot = ClubSnapshot::new();
        let person = snapshot.insert_person(NewPerson::new("Smith", "Anna"));
        snapshot.upsert_result(NewResult::new(99, person).medal(Medal::Gold));

        let engine = ReportEngine::new(&snapshot);
        assert_eq!(engine.medal_summary(&FilterSpec::any()).total(), 0);
        assert!(engine.yearly_dynamics(&FilterSpec::any()).is_empty());
    }

    #[test]
    fn standings_put_unplaced_results_last() {
        let mut snapshot = ClubSnapshot::new();
        let coach = snapshot.insert_coach(NewCoach::new("Ivanov"));
        let group = snapshot.insert_group(NewGroup::new("Juniors", "Tourism").coached_by(coach));
        let a = snapshot.insert_person(NewPerson::new("Adams", "Al").in_group(group));
        let b = snapshot.insert_person(NewPerson::new("Brown", "Bo"));
        let c = snapshot.insert_person(NewPerson::new("Clark", "Cy"));
        let event = snapshot.insert_event(NewEvent::new(
            "Cup",
            date("2023-01-01"),
            "Region",
            "Sport",
            "Tourism",
        ));
        snapshot.upsert_result(NewResult::new(event, a));
        snapshot.upsert_result(NewResult::new(event, b).place(2));
        snapshot.upsert_result(NewResult::new(event, c).place(1).medal(Medal::Gold));

        let standings = ReportEngine::new(&snapshot).event_standings(event);
        let order = standings.iter().map(|row| row.person_id).collect::<Vec<_>>();
        assert_eq!(order, vec![c, b, a]);
        assert_eq!(standings[2].coach_name.as_deref(), Some("Ivanov"));
        assert_eq!(standings[0].group_name, None);
    }
}
