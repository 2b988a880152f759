//! Club entities and their insert requests.
//!
//! # Responsibility
//! - Define read models for the five club tables.
//! - Define `New*` requests used by both the SQLite repository and the
//!   in-memory snapshot.
//!
//! # Invariants
//! - A result is identified by `(event_id, person_id, category)`; the empty
//!   string is the default category.
//! - `place` and `medal` are independent; neither is derived from the other.

use crate::model::category::{Level, Medal, Track};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type CoachId = i64;
pub type GroupId = i64;
pub type PersonId = i64;
pub type EventId = i64;
pub type ResultId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    pub id: CoachId,
    pub full_name: String,
    pub phone: Option<String>,
}

/// Training group. `(name, sport)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub sport: String,
    pub coach_id: Option<CoachId>,
}

/// Club member (athlete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub last_name: String,
    pub first_name: String,
    pub birthdate: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub group_id: Option<GroupId>,
}

impl Person {
    /// Display name in `Last First` order.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }
}

/// Competition. `(name, date, location)` is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub date: NaiveDate,
    /// Raw level label; see [`Event::level_kind`].
    pub level: String,
    /// Raw track label; see [`Event::track_kind`].
    pub track: String,
    pub sport: String,
    pub location: Option<String>,
    /// Announced number of participants across all clubs.
    pub expected_total: Option<u32>,
}

impl Event {
    /// Returns the known level, or `None` for labels outside the vocabulary.
    pub fn level_kind(&self) -> Option<Level> {
        Level::from_label(&self.level)
    }

    /// Returns the known track, or `None` for labels outside the vocabulary.
    pub fn track_kind(&self) -> Option<Track> {
        Track::from_label(&self.track)
    }
}

/// One athlete's outcome at one event in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: ResultId,
    pub event_id: EventId,
    pub person_id: PersonId,
    pub category: String,
    pub place: Option<u32>,
    pub medal: Option<Medal>,
    pub note: Option<String>,
}

impl ResultRecord {
    /// Prize result: a named medal, or a place from 1 to 3.
    ///
    /// A row satisfying both conditions is still one prize.
    pub fn is_prize(&self) -> bool {
        is_prize(self.place, self.medal)
    }
}

pub(crate) fn is_prize(place: Option<u32>, medal: Option<Medal>) -> bool {
    medal.is_some() || matches!(place, Some(1..=3))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoach {
    pub full_name: String,
    pub phone: Option<String>,
}

impl NewCoach {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            phone: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub sport: String,
    pub coach_id: Option<CoachId>,
}

impl NewGroup {
    pub fn new(name: impl Into<String>, sport: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sport: sport.into(),
            coach_id: None,
        }
    }

    pub fn coached_by(mut self, coach_id: CoachId) -> Self {
        self.coach_id = Some(coach_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub last_name: String,
    pub first_name: String,
    pub birthdate: Option<NaiveDate>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub group_id: Option<GroupId>,
}

impl NewPerson {
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
            birthdate: None,
            address: None,
            phone: None,
            group_id: None,
        }
    }

    pub fn in_group(mut self, group_id: GroupId) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn born(mut self, birthdate: NaiveDate) -> Self {
        self.birthdate = Some(birthdate);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub name: String,
    pub date: NaiveDate,
    pub level: String,
    pub track: String,
    pub sport: String,
    pub location: Option<String>,
    pub expected_total: Option<u32>,
}

impl NewEvent {
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        level: impl Into<String>,
        track: impl Into<String>,
        sport: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            date,
            level: level.into(),
            track: track.into(),
            sport: sport.into(),
            location: None,
            expected_total: None,
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Upsert request for a result; the `(event, person, category)` triple is
/// the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResult {
    pub event_id: EventId,
    pub person_id: PersonId,
    pub category: String,
    pub place: Option<u32>,
    pub medal: Option<Medal>,
    pub note: Option<String>,
}

impl NewResult {
    pub fn new(event_id: EventId, person_id: PersonId) -> Self {
        Self {
            event_id,
            person_id,
            category: String::new(),
            place: None,
            medal: None,
            note: None,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn place(mut self, place: u32) -> Self {
        self.place = Some(place);
        self
    }

    pub fn medal(mut self, medal: Medal) -> Self {
        self.medal = Some(medal);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::is_prize;
    use crate::model::category::Medal;

    #[test]
    fn prize_counts_medal_or_podium_place() {
        assert!(is_prize(Some(5), Some(Medal::Silver)));
        assert!(is_prize(Some(2), None));
        assert!(is_prize(Some(1), Some(Medal::Gold)));
        assert!(!is_prize(Some(10), None));
        assert!(!is_prize(Some(0), None));
        assert!(!is_prize(None, None));
    }
}
