use chrono::NaiveDate;
use clubstats_core::db::open_db_in_memory;
use clubstats_core::model::club::{NewCoach, NewEvent, NewGroup, NewPerson, NewResult};
use clubstats_core::{
    ClubRepository, FilterSpec, Medal, RepoError, ReportService, SnapshotSource,
    SqliteClubRepository,
};
use rusqlite::Connection;

struct Seeded {
    coach: i64,
    group: i64,
    person: i64,
    event: i64,
}

fn seed(repo: &SqliteClubRepository<'_>) -> Seeded {
    let coach = repo.create_coach(&NewCoach::new("Ivanova Olga")).unwrap();
    let group = repo
        .create_group(&NewGroup::new("Juniors", "Orienteering").coached_by(coach))
        .unwrap();
    let person = repo
        .create_person(
            &NewPerson::new("Smith", "Anna")
                .in_group(group)
                .born(date("2010-04-12")),
        )
        .unwrap();
    let event = repo
        .create_event(
            &NewEvent::new("Spring Cup", date("2023-05-01"), "Region", "Sport", "Orienteering")
                .at("Park"),
        )
        .unwrap();
    Seeded {
        coach,
        group,
        person,
        event,
    }
}

#[test]
fn try_new_requires_club_schema() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteClubRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("coaches")));
}

#[test]
fn upsert_result_replaces_same_triple_and_keeps_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClubRepository::try_new(&conn).unwrap();
    let seeded = seed(&repo);

    let first = repo
        .upsert_result(&NewResult::new(seeded.event, seeded.person).place(4))
        .unwrap();
    let second = repo
        .upsert_result(
            &NewResult::new(seeded.event, seeded.person)
                .place(1)
                .medal(Medal::Gold),
        )
        .unwrap();
    let other_category = repo
        .upsert_result(&NewResult::new(seeded.event, seeded.person).category("W14"))
        .unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other_category);

    let snapshot = repo.load_snapshot().unwrap();
    assert_eq!(snapshot.results().count(), 2);
    let replaced = snapshot.results().find(|r| r.id == first).unwrap();
    assert_eq!(replaced.place, Some(1));
    assert_eq!(replaced.medal, Some(Medal::Gold));
    assert_eq!(replaced.category, "");
}

#[test]
fn deletes_of_referenced_rows_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClubRepository::try_new(&conn).unwrap();
    let seeded = seed(&repo);
    let result = repo
        .upsert_result(&NewResult::new(seeded.event, seeded.person))
        .unwrap();

    assert!(matches!(
        repo.delete_coach(seeded.coach),
        Err(RepoError::InUse {
            entity: "coach",
            referenced_by: "training_groups",
            ..
        })
    ));
    assert!(matches!(
        repo.delete_group(seeded.group),
        Err(RepoError::InUse { entity: "group", .. })
    ));
    assert!(matches!(
        repo.delete_person(seeded.person),
        Err(RepoError::InUse { entity: "person", .. })
    ));
    assert!(matches!(
        repo.delete_event(seeded.event),
        Err(RepoError::InUse { entity: "event", .. })
    ));

    repo.delete_result(result).unwrap();
    repo.delete_event(seeded.event).unwrap();
    repo.delete_person(seeded.person).unwrap();
    repo.delete_group(seeded.group).unwrap();
    repo.delete_coach(seeded.coach).unwrap();
}

#[test]
fn deleting_missing_rows_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClubRepository::try_new(&conn).unwrap();

    let err = repo.delete_result(77).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { entity: "result", id: 77 }));
    assert_eq!(err.to_string(), "result not found: 77");
}

#[test]
fn load_snapshot_decodes_all_tables() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClubRepository::try_new(&conn).unwrap();
    let seeded = seed(&repo);
    repo.upsert_result(
        &NewResult::new(seeded.event, seeded.person)
            .place(2)
            .medal(Medal::Silver)
            .note("photo finish"),
    )
    .unwrap();

    let snapshot = repo.load_snapshot().unwrap();
    assert_eq!(snapshot.table_sizes(), (1, 1, 1, 1, 1));
    let person = snapshot.person(seeded.person).unwrap();
    assert_eq!(person.birthdate, Some(date("2010-04-12")));
    assert_eq!(snapshot.coach_of(seeded.person).unwrap().full_name, "Ivanova Olga");
    let event = snapshot.event(seeded.event).unwrap();
    assert_eq!(event.location.as_deref(), Some("Park"));
    let result = snapshot.results().next().unwrap();
    assert_eq!(result.note.as_deref(), Some("photo finish"));
}

#[test]
fn legacy_none_medal_text_decodes_as_no_medal() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClubRepository::try_new(&conn).unwrap();
    let seeded = seed(&repo);
    let id = repo
        .upsert_result(&NewResult::new(seeded.event, seeded.person).place(9))
        .unwrap();
    conn.execute("UPDATE results SET medal = 'none' WHERE result_id = ?1;", [id])
        .unwrap();

    let snapshot = repo.load_snapshot().unwrap();
    assert_eq!(snapshot.results().next().unwrap().medal, None);
}

#[test]
fn invalid_persisted_values_fail_the_load() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteClubRepository::try_new(&conn).unwrap();
    let seeded = seed(&repo);

    conn.execute(
        "UPDATE events SET date = '01.05.2023' WHERE event_id = ?1;",
        [seeded.event],
    )
    .unwrap();
    let err = repo.load_snapshot().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
    assert!(err.to_string().contains("events.date"));
}

#[test]
fn report_service_sees_writes_made_after_previous_report() {
    let conn = open_db_in_memory().unwrap();
    let writer = SqliteClubRepository::try_new(&conn).unwrap();
    let seeded = seed(&writer);
    let service = ReportService::new(SqliteClubRepository::try_new(&conn).unwrap());

    assert_eq!(service.medal_summary(&FilterSpec::any()).unwrap().total(), 0);

    writer
        .upsert_result(&NewResult::new(seeded.event, seeded.person).medal(Medal::Bronze))
        .unwrap();
    let medals = service.medal_summary(&FilterSpec::any()).unwrap();
    assert_eq!(medals.bronze, 1);
    assert_eq!(medals.total(), 1);
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}
