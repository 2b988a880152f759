//! SQLite implementation of the club repository and snapshot source.
//!
//! # Responsibility
//! - Insert coaches, groups, persons and events; upsert results by their
//!   `(event, person, category)` identity.
//! - Refuse deletes of rows that are still referenced.
//! - Load the five tables into a [`ClubSnapshot`].
//!
//! # Invariants
//! - Dates are stored as `YYYY-MM-DD` text; anything else fails the load.
//! - Medals are stored lowercase; `NULL`, `''` and `'none'` mean no medal.

use crate::model::category::Medal;
use crate::model::club::{
    Coach, CoachId, Event, EventId, Group, GroupId, NewCoach, NewEvent, NewGroup, NewPerson,
    NewResult, Person, PersonId, ResultId, ResultRecord,
};
use crate::repo::{ClubRepository, RepoError, RepoResult, SnapshotSource};
use crate::snapshot::ClubSnapshot;
use chrono::NaiveDate;
use log::info;
use rusqlite::{params, Connection, Row};
use std::time::Instant;

const DATE_FORMAT: &str = "%Y-%m-%d";
const REQUIRED_TABLES: [&str; 5] = ["coaches", "training_groups", "persons", "events", "results"];

/// Table metadata used by guarded deletes.
struct Table {
    entity: &'static str,
    name: &'static str,
    key: &'static str,
    /// `(table, column)` pairs that reference this table's key.
    referenced_by: &'static [(&'static str, &'static str)],
}

const COACHES: Table = Table {
    entity: "coach",
    name: "coaches",
    key: "coach_id",
    referenced_by: &[("training_groups", "coach_id")],
};

const GROUPS: Table = Table {
    entity: "group",
    name: "training_groups",
    key: "group_id",
    referenced_by: &[("persons", "group_id")],
};

const PERSONS: Table = Table {
    entity: "person",
    name: "persons",
    key: "person_id",
    referenced_by: &[("results", "person_id")],
};

const EVENTS: Table = Table {
    entity: "event",
    name: "events",
    key: "event_id",
    referenced_by: &[("results", "event_id")],
};

const RESULTS: Table = Table {
    entity: "result",
    name: "results",
    key: "result_id",
    referenced_by: &[],
};

/// SQLite-backed club repository.
pub struct SqliteClubRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteClubRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - [`RepoError::MissingRequiredTable`] when the club schema is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    fn delete_guarded(&self, table: &Table, id: i64) -> RepoResult<()> {
        for &(referencing, column) in table.referenced_by {
            let in_use: i64 = self.conn.query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {referencing} WHERE {column} = ?1);"),
                [id],
                |row| row.get(0),
            )?;
            if in_use == 1 {
                return Err(RepoError::InUse {
                    entity: table.entity,
                    id,
                    referenced_by: referencing,
                });
            }
        }

        let changed = self.conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1;", table.name, table.key),
            [id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: table.entity,
                id,
            });
        }
        Ok(())
    }
}

impl ClubRepository for SqliteClubRepository<'_> {
    fn create_coach(&self, coach: &NewCoach) -> RepoResult<CoachId> {
        self.conn.execute(
            "INSERT INTO coaches (full_name, phone) VALUES (?1, ?2);",
            params![coach.full_name, coach.phone],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_group(&self, group: &NewGroup) -> RepoResult<GroupId> {
        self.conn.execute(
            "INSERT INTO training_groups (name, sport, coach_id) VALUES (?1, ?2, ?3);",
            params![group.name, group.sport, group.coach_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_person(&self, person: &NewPerson) -> RepoResult<PersonId> {
        self.conn.execute(
            "INSERT INTO persons (last_name, first_name, birthdate, address, phone, group_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                person.last_name,
                person.first_name,
                person.birthdate.map(date_to_db),
                person.address,
                person.phone,
                person.group_id,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn create_event(&self, event: &NewEvent) -> RepoResult<EventId> {
        self.conn.execute(
            "INSERT INTO events (name, date, level, track, sport, location, expected_total)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                event.name,
                date_to_db(event.date),
                event.level,
                event.track,
                event.sport,
                event.location,
                event.expected_total,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn upsert_result(&self, result: &NewResult) -> RepoResult<ResultId> {
        let id = self.conn.query_row(
            "INSERT INTO results (event_id, person_id, category, place, medal, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (event_id, person_id, category) DO UPDATE SET
                place = excluded.place,
                medal = excluded.medal,
                note = excluded.note
             RETURNING result_id;",
            params![
                result.event_id,
                result.person_id,
                result.category,
                result.place,
                result.medal.map(Medal::as_str),
                result.note,
            ],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn delete_coach(&self, id: CoachId) -> RepoResult<()> {
        self.delete_guarded(&COACHES, id)
    }

    fn delete_group(&self, id: GroupId) -> RepoResult<()> {
        self.delete_guarded(&GROUPS, id)
    }

    fn delete_person(&self, id: PersonId) -> RepoResult<()> {
        self.delete_guarded(&PERSONS, id)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        self.delete_guarded(&EVENTS, id)
    }

    fn delete_result(&self, id: ResultId) -> RepoResult<()> {
        self.delete_guarded(&RESULTS, id)
    }
}

impl SnapshotSource for SqliteClubRepository<'_> {
    /// Reads all five tables.
    ///
    /// # Side effects
    /// - Emits a `snapshot_load` event with row counts.
    fn load_snapshot(&self) -> RepoResult<ClubSnapshot> {
        let started_at = Instant::now();
        let snapshot = ClubSnapshot::from_rows(
            query_all(
                self.conn,
                "SELECT coach_id, full_name, phone FROM coaches;",
                parse_coach_row,
            )?,
            query_all(
                self.conn,
                "SELECT group_id, name, sport, coach_id FROM training_groups;",
                parse_group_row,
            )?,
            query_all(
                self.conn,
                "SELECT person_id, last_name, first_name, birthdate, address, phone, group_id
                 FROM persons;",
                parse_person_row,
            )?,
            query_all(
                self.conn,
                "SELECT event_id, name, date, level, track, sport, location, expected_total
                 FROM events;",
                parse_event_row,
            )?,
            query_all(
                self.conn,
                "SELECT result_id, event_id, person_id, category, place, medal, note
                 FROM results;",
                parse_result_row,
            )?,
        );

        let (coaches, groups, persons, events, results) = snapshot.table_sizes();
        info!(
            "event=snapshot_load module=repo status=ok coaches={coaches} groups={groups} persons={persons} events={events} results={results} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(snapshot)
    }
}

fn query_all<T>(
    conn: &Connection,
    sql: &str,
    parse: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([])?;
    let mut parsed = Vec::new();
    while let Some(row) = rows.next()? {
        parsed.push(parse(row)?);
    }
    Ok(parsed)
}

fn parse_coach_row(row: &Row<'_>) -> RepoResult<Coach> {
    Ok(Coach {
        id: row.get("coach_id")?,
        full_name: row.get("full_name")?,
        phone: row.get("phone")?,
    })
}

fn parse_group_row(row: &Row<'_>) -> RepoResult<Group> {
    Ok(Group {
        id: row.get("group_id")?,
        name: row.get("name")?,
        sport: row.get("sport")?,
        coach_id: row.get("coach_id")?,
    })
}

fn parse_person_row(row: &Row<'_>) -> RepoResult<Person> {
    let birthdate = match row.get::<_, Option<String>>("birthdate")? {
        Some(text) if !text.trim().is_empty() => Some(parse_date(&text, "persons.birthdate")?),
        _ => None,
    };
    Ok(Person {
        id: row.get("person_id")?,
        last_name: row.get("last_name")?,
        first_name: row.get("first_name")?,
        birthdate,
        address: row.get("address")?,
        phone: row.get("phone")?,
        group_id: row.get("group_id")?,
    })
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let date_text: String = row.get("date")?;
    Ok(Event {
        id: row.get("event_id")?,
        name: row.get("name")?,
        date: parse_date(&date_text, "events.date")?,
        level: row.get("level")?,
        track: row.get("track")?,
        sport: row.get("sport")?,
        location: row.get("location")?,
        expected_total: parse_count(row.get("expected_total")?, "events.expected_total")?,
    })
}

fn parse_result_row(row: &Row<'_>) -> RepoResult<ResultRecord> {
    let medal = match row.get::<_, Option<String>>("medal")? {
        None => None,
        Some(text) => parse_medal(&text)?,
    };
    Ok(ResultRecord {
        id: row.get("result_id")?,
        event_id: row.get("event_id")?,
        person_id: row.get("person_id")?,
        category: row.get("category")?,
        place: parse_count(row.get("place")?, "results.place")?,
        medal,
        note: row.get("note")?,
    })
}

fn parse_date(text: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{text}` in {column}")))
}

fn parse_count(value: Option<i64>, column: &str) -> RepoResult<Option<u32>> {
    value
        .map(|raw| {
            u32::try_from(raw)
                .map_err(|_| RepoError::InvalidData(format!("invalid count `{raw}` in {column}")))
        })
        .transpose()
}

fn parse_medal(text: &str) -> RepoResult<Option<Medal>> {
    let normalized = text.trim().to_ascii_lowercase();
    if normalized.is_empty() || normalized == "none" {
        return Ok(None);
    }
    Medal::parse(&normalized)
        .map(Some)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid medal `{text}` in results.medal")))
}

fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
