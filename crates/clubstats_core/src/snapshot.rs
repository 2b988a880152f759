//! Read-only club snapshot consumed by the report engine.
//!
//! # Responsibility
//! - Hold all five entity tables keyed by id.
//! - Resolve the relations reports walk (result → event, result → person →
//!   group → coach).
//! - Offer an in-memory write path with the same identity rules as storage,
//!   so reports can be exercised without SQLite.
//!
//! # Invariants
//! - Iteration over every table is in ascending id order.
//! - At most one result exists per `(event_id, person_id, category)`.

use crate::model::club::{
    Coach, CoachId, Event, EventId, Group, GroupId, NewCoach, NewEvent, NewGroup, NewPerson,
    NewResult, Person, PersonId, ResultId, ResultRecord,
};
use std::collections::BTreeMap;

/// Immutable-by-convention view over club data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubSnapshot {
    coaches: BTreeMap<CoachId, Coach>,
    groups: BTreeMap<GroupId, Group>,
    persons: BTreeMap<PersonId, Person>,
    events: BTreeMap<EventId, Event>,
    results: BTreeMap<ResultId, ResultRecord>,
}

impl ClubSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from already-identified rows (storage load path).
    ///
    /// Later rows win when ids collide.
    pub fn from_rows(
        coaches: Vec<Coach>,
        groups: Vec<Group>,
        persons: Vec<Person>,
        events: Vec<Event>,
        results: Vec<ResultRecord>,
    ) -> Self {
        Self {
            coaches: coaches.into_iter().map(|row| (row.id, row)).collect(),
            groups: groups.into_iter().map(|row| (row.id, row)).collect(),
            persons: persons.into_iter().map(|row| (row.id, row)).collect(),
            events: events.into_iter().map(|row| (row.id, row)).collect(),
            results: results.into_iter().map(|row| (row.id, row)).collect(),
        }
    }

    pub fn insert_coach(&mut self, coach: NewCoach) -> CoachId {
        let id = next_id(&self.coaches);
        self.coaches.insert(
            id,
            Coach {
                id,
                full_name: coach.full_name,
                phone: coach.phone,
            },
        );
        id
    }

    pub fn insert_group(&mut self, group: NewGroup) -> GroupId {
        let id = next_id(&self.groups);
        self.groups.insert(
            id,
            Group {
                id,
                name: group.name,
                sport: group.sport,
                coach_id: group.coach_id,
            },
        );
        id
    }

    pub fn insert_person(&mut self, person: NewPerson) -> PersonId {
        let id = next_id(&self.persons);
        self.persons.insert(
            id,
            Person {
                id,
                last_name: person.last_name,
                first_name: person.first_name,
                birthdate: person.birthdate,
                address: person.address,
                phone: person.phone,
                group_id: person.group_id,
            },
        );
        id
    }

    pub fn insert_event(&mut self, event: NewEvent) -> EventId {
        let id = next_id(&self.events);
        self.events.insert(
            id,
            Event {
                id,
                name: event.name,
                date: event.date,
                level: event.level,
                track: event.track,
                sport: event.sport,
                location: event.location,
                expected_total: event.expected_total,
            },
        );
        id
    }

    /// Inserts a result or replaces the one with the same
    /// `(event, person, category)` triple, keeping its id.
    pub fn upsert_result(&mut self, result: NewResult) -> ResultId {
        let existing = self
            .results
            .values()
            .find(|row| {
                row.event_id == result.event_id
                    && row.person_id == result.person_id
                    && row.category == result.category
            })
            .map(|row| row.id);
        let id = existing.unwrap_or_else(|| next_id(&self.results));
        self.results.insert(
            id,
            ResultRecord {
                id,
                event_id: result.event_id,
                person_id: result.person_id,
                category: result.category,
                place: result.place,
                medal: result.medal,
                note: result.note,
            },
        );
        id
    }

    pub fn coach(&self, id: CoachId) -> Option<&Coach> {
        self.coaches.get(&id)
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(&id)
    }

    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.persons.get(&id)
    }

    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    pub fn coaches(&self) -> impl Iterator<Item = &Coach> {
        self.coaches.values()
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.values()
    }

    pub fn results(&self) -> impl Iterator<Item = &ResultRecord> {
        self.results.values()
    }

    /// Event referenced by a result, if it exists in this snapshot.
    pub fn event_of(&self, result: &ResultRecord) -> Option<&Event> {
        self.events.get(&result.event_id)
    }

    /// Group of a person, if assigned and present.
    pub fn group_of(&self, person_id: PersonId) -> Option<&Group> {
        let group_id = self.persons.get(&person_id)?.group_id?;
        self.groups.get(&group_id)
    }

    /// Coach of a person through their group.
    pub fn coach_of(&self, person_id: PersonId) -> Option<&Coach> {
        let coach_id = self.group_of(person_id)?.coach_id?;
        self.coaches.get(&coach_id)
    }

    /// Row counts as `(coaches, groups, persons, events, results)`.
    pub fn table_sizes(&self) -> (usize, usize, usize, usize, usize) {
        (
            self.coaches.len(),
            self.groups.len(),
            self.persons.len(),
            self.events.len(),
            self.results.len(),
        )
    }
}

fn next_id<T>(table: &BTreeMap<i64, T>) -> i64 {
    table.keys().next_back().map_or(1, |last| last + 1)
}
