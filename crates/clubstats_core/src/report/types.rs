//! Report record shapes.
//!
//! Every report returns one of these fixed-shape records; none of them know
//! how they are rendered.

use crate::list::TableRow;
use crate::model::category::{Level, Medal, Track};
use crate::model::club::{CoachId, EventId, PersonId, ResultId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Column index of `Place` in [`ResultRow`] table cells.
pub const RESULT_PLACE_COLUMN: usize = 5;
/// Column index of `Medal` in [`ResultRow`] table cells.
pub const RESULT_MEDAL_COLUMN: usize = 6;
/// Column index of `Place` in [`StandingRow`] table cells.
pub const STANDING_PLACE_COLUMN: usize = 0;
/// Column index of `Medal` in [`StandingRow`] table cells.
pub const STANDING_MEDAL_COLUMN: usize = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MedalCount {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCount {
    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }

    /// Counts one result's medal; `None` leaves every counter unchanged.
    pub fn record(&mut self, medal: Option<Medal>) {
        match medal {
            Some(Medal::Gold) => self.gold += 1,
            Some(Medal::Silver) => self.silver += 1,
            Some(Medal::Bronze) => self.bronze += 1,
            None => {}
        }
    }
}

/// Event counts per level and per track.
///
/// Both maps hold every known category, including those with zero events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventsBreakdown {
    pub by_level: BTreeMap<Level, u32>,
    pub by_track: BTreeMap<Track, u32>,
}

impl EventsBreakdown {
    pub(crate) fn seeded() -> Self {
        Self {
            by_level: Level::ALL.into_iter().map(|level| (level, 0)).collect(),
            by_track: Track::ALL.into_iter().map(|track| (track, 0)).collect(),
        }
    }
}

/// One coach's aggregated results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardRow {
    pub coach_id: CoachId,
    pub coach_name: String,
    #[serde(flatten)]
    pub medals: MedalCount,
    pub starts: u32,
    pub events: u32,
    pub athletes: u32,
}

impl LeaderboardRow {
    /// Composite ranking key, compared descending.
    pub fn rank_key(&self) -> (u32, u32, u32, u32) {
        (
            self.medals.gold,
            self.medals.silver,
            self.medals.bronze,
            self.starts,
        )
    }
}

/// Entity an [`EntityReport`] is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Person,
    Coach,
    Group,
}

/// One result joined with its event and athlete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    pub result_id: ResultId,
    pub date: NaiveDate,
    pub event_id: EventId,
    pub event_name: String,
    pub level: String,
    pub track: String,
    pub sport: String,
    pub person_id: PersonId,
    pub athlete: String,
    pub category: String,
    pub place: Option<u32>,
    pub medal: Option<Medal>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub starts: u32,
    #[serde(flatten)]
    pub medals: MedalCount,
    /// Rows with a medal or a place from 1 to 3, each counted once.
    pub prizes: u32,
    pub events: u32,
    pub athletes: u32,
}

impl ReportSummary {
    /// Prize share in percent rounded to one decimal; `None` without starts.
    pub fn prize_share_percent(&self) -> Option<f64> {
        if self.starts == 0 {
            return None;
        }
        let share = f64::from(self.prizes) * 100.0 / f64::from(self.starts);
        Some((share * 10.0).round() / 10.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityReport {
    pub kind: EntityKind,
    pub entity_id: i64,
    /// Most recent first.
    pub rows: Vec<ResultRow>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct YearlyRow {
    pub year: i32,
    pub events: u32,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub total_medals: u32,
}

/// Group member line for group reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub person_id: PersonId,
    pub full_name: String,
    pub birthdate: Option<NaiveDate>,
    pub phone: Option<String>,
}

/// One line of an event's standings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StandingRow {
    pub result_id: ResultId,
    pub place: Option<u32>,
    pub medal: Option<Medal>,
    pub person_id: PersonId,
    pub athlete: String,
    pub group_name: Option<String>,
    pub coach_name: Option<String>,
    pub category: String,
    pub note: Option<String>,
}

fn opt_cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl TableRow for ResultRow {
    fn columns() -> &'static [&'static str] {
        &[
            "id", "Date", "Event", "Athlete", "Category", "Place", "Medal", "Note",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.result_id.to_string(),
            self.date.to_string(),
            self.event_name.clone(),
            self.athlete.clone(),
            self.category.clone(),
            opt_cell(self.place),
            opt_cell(self.medal),
            self.note.clone().unwrap_or_default(),
        ]
    }
}

impl TableRow for LeaderboardRow {
    fn columns() -> &'static [&'static str] {
        &[
            "id", "Coach", "Gold", "Silver", "Bronze", "Starts", "Events", "Athletes",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.coach_id.to_string(),
            self.coach_name.clone(),
            self.medals.gold.to_string(),
            self.medals.silver.to_string(),
            self.medals.bronze.to_string(),
            self.starts.to_string(),
            self.events.to_string(),
            self.athletes.to_string(),
        ]
    }
}

impl TableRow for YearlyRow {
    fn columns() -> &'static [&'static str] {
        &["Year", "Events", "Gold", "Silver", "Bronze", "Medals"]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.year.to_string(),
            self.events.to_string(),
            self.gold.to_string(),
            self.silver.to_string(),
            self.bronze.to_string(),
            self.total_medals.to_string(),
        ]
    }
}

impl TableRow for StandingRow {
    fn columns() -> &'static [&'static str] {
        &[
            "Place", "Medal", "Athlete", "Group", "Coach", "Category", "Note",
        ]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            opt_cell(self.place),
            opt_cell(self.medal),
            self.athlete.clone(),
            self.group_name.clone().unwrap_or_default(),
            self.coach_name.clone().unwrap_or_default(),
            self.category.clone(),
            self.note.clone().unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::{MedalCount, ReportSummary};
    use crate::model::category::Medal;

    #[test]
    fn medal_count_ignores_missing_medal() {
        let mut count = MedalCount::default();
        for medal in [Some(Medal::Gold), None, Some(Medal::Bronze), Some(Medal::Gold)] {
            count.record(medal);
        }
        assert_eq!(count.gold, 2);
        assert_eq!(count.silver, 0);
        assert_eq!(count.bronze, 1);
        assert_eq!(count.total(), 3);
    }

    #[test]
    fn prize_share_rounds_to_one_decimal() {
        let summary = ReportSummary {
            starts: 3,
            prizes: 1,
            ..ReportSummary::default()
        };
        assert_eq!(summary.prize_share_percent(), Some(33.3));
        assert_eq!(ReportSummary::default().prize_share_percent(), None);
    }
}
