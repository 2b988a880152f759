//! Repository layer contracts and persistence implementations.
//!
//! # Responsibility
//! - Define the write contract for club data ([`ClubRepository`]) and the
//!   read contract reports consume ([`SnapshotSource`]).
//! - Isolate SQLite query details from report orchestration.
//!
//! # Invariants
//! - Deletes never cascade: a row still referenced elsewhere is rejected with
//!   [`RepoError::InUse`].
//! - Read paths reject invalid persisted state instead of masking it.

pub mod club_repo;

use crate::db::DbError;
use crate::model::club::{
    CoachId, EventId, GroupId, NewCoach, NewEvent, NewGroup, NewPerson, NewResult, PersonId,
    ResultId,
};
use crate::snapshot::ClubSnapshot;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use club_repo::SqliteClubRepository;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: i64,
    },
    /// Delete refused because another table still references the row.
    InUse {
        entity: &'static str,
        id: i64,
        referenced_by: &'static str,
    },
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InUse {
                entity,
                id,
                referenced_by,
            } => write!(f, "{entity} {id} is still referenced by {referenced_by}"),
            Self::InvalidData(message) => write!(f, "invalid persisted club data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; run migrations first")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Write access to club data.
pub trait ClubRepository {
    fn create_coach(&self, coach: &NewCoach) -> RepoResult<CoachId>;
    fn create_group(&self, group: &NewGroup) -> RepoResult<GroupId>;
    fn create_person(&self, person: &NewPerson) -> RepoResult<PersonId>;
    fn create_event(&self, event: &NewEvent) -> RepoResult<EventId>;
    /// Inserts a result, or replaces the row with the same
    /// `(event, person, category)` triple and returns its id.
    fn upsert_result(&self, result: &NewResult) -> RepoResult<ResultId>;
    fn delete_coach(&self, id: CoachId) -> RepoResult<()>;
    fn delete_group(&self, id: GroupId) -> RepoResult<()>;
    fn delete_person(&self, id: PersonId) -> RepoResult<()>;
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
    fn delete_result(&self, id: ResultId) -> RepoResult<()>;
}

/// Source of read-only snapshots for report runs.
pub trait SnapshotSource {
    fn load_snapshot(&self) -> RepoResult<ClubSnapshot>;
}

impl SnapshotSource for ClubSnapshot {
    fn load_snapshot(&self) -> RepoResult<ClubSnapshot> {
        Ok(self.clone())
    }
}
