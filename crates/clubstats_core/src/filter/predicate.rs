//! Typed predicate composition for report filters.
//!
//! # Responsibility
//! - Turn a [`FilterSpec`] into an ordered, ANDed predicate list.
//! - Evaluate predicates against events directly, or against the event a
//!   result references.
//!
//! # Invariants
//! - Each constrained filter field yields exactly one predicate.
//! - Order is always `date_from, date_to, sport, track, level`.
//! - Joined predicates never match a result whose event is missing.

use crate::filter::FilterSpec;
use crate::model::club::{Event, ResultRecord};
use crate::snapshot::ClubSnapshot;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Which row an aggregation is rooted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateShape {
    /// Compare against an event's own columns.
    Direct,
    /// Compare against the event reached through a result's event reference.
    Joined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventField {
    Date,
    Sport,
    Track,
    Level,
}

impl EventField {
    fn column(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Sport => "sport",
            Self::Track => "track",
            Self::Level => "level",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gte,
    Lte,
}

impl CompareOp {
    fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering == Ordering::Equal,
            Self::Gte => ordering != Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Gte => ">=",
            Self::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PredicateValue {
    Date(NaiveDate),
    Label(String),
}

/// One `field op value` comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub shape: PredicateShape,
    pub field: EventField,
    pub op: CompareOp,
    pub value: PredicateValue,
}

impl Predicate {
    /// Evaluates this comparison against an event's columns.
    ///
    /// A field/value type mismatch never matches.
    pub fn matches_event(&self, event: &Event) -> bool {
        let ordering = match (self.field, &self.value) {
            (EventField::Date, PredicateValue::Date(value)) => event.date.cmp(value),
            (EventField::Sport, PredicateValue::Label(value)) => event.sport.as_str().cmp(value),
            (EventField::Track, PredicateValue::Label(value)) => event.track.as_str().cmp(value),
            (EventField::Level, PredicateValue::Label(value)) => event.level.as_str().cmp(value),
            _ => return false,
        };
        self.op.accepts(ordering)
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.shape {
            PredicateShape::Direct => "event",
            PredicateShape::Joined => "result.event",
        };
        write!(f, "{prefix}.{} {} ", self.field.column(), self.op.symbol())?;
        match &self.value {
            PredicateValue::Date(value) => write!(f, "{value}"),
            PredicateValue::Label(value) => write!(f, "'{value}'"),
        }
    }
}

/// Composes the ordered predicate list for one filter and shape.
pub fn compose(filter: &FilterSpec, shape: PredicateShape) -> Vec<Predicate> {
    let mut predicates = Vec::with_capacity(5);
    let mut push = |field, op, value| {
        predicates.push(Predicate {
            shape,
            field,
            op,
            value,
        })
    };

    if let Some(from) = filter.date_from() {
        push(EventField::Date, CompareOp::Gte, PredicateValue::Date(from));
    }
    if let Some(to) = filter.date_to() {
        push(EventField::Date, CompareOp::Lte, PredicateValue::Date(to));
    }
    if let Some(sport) = filter.sport() {
        push(
            EventField::Sport,
            CompareOp::Eq,
            PredicateValue::Label(sport.to_string()),
        );
    }
    if let Some(track) = filter.track() {
        push(
            EventField::Track,
            CompareOp::Eq,
            PredicateValue::Label(track.to_string()),
        );
    }
    if let Some(level) = filter.level() {
        push(
            EventField::Level,
            CompareOp::Eq,
            PredicateValue::Label(level.to_string()),
        );
    }

    predicates
}

/// ANDed predicate list bound to one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateSet {
    shape: PredicateShape,
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    pub fn compose(filter: &FilterSpec, shape: PredicateShape) -> Self {
        Self {
            shape,
            predicates: compose(filter, shape),
        }
    }

    pub fn shape(&self) -> PredicateShape {
        self.shape
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Returns whether every predicate accepts the event.
    pub fn matches_event(&self, event: &Event) -> bool {
        self.predicates
            .iter()
            .all(|predicate| predicate.matches_event(event))
    }

    /// Resolves the result's event and evaluates every predicate on it.
    pub fn matches_result(&self, snapshot: &ClubSnapshot, result: &ResultRecord) -> bool {
        snapshot
            .event_of(result)
            .is_some_and(|event| self.matches_event(event))
    }

    /// Stable one-line form for log fields.
    pub fn describe(&self) -> String {
        if self.predicates.is_empty() {
            return "none".to_string();
        }
        self.predicates
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" AND ")
    }
}

#[cfg(test)]
mod tests {
    use super::{compose, CompareOp, EventField, PredicateSet, PredicateShape};
    use crate::filter::FilterSpec;
    use crate::model::club::Event;
    use chrono::NaiveDate;

    fn event(date: &str, level: &str) -> Event {
        Event {
            id: 1,
            name: "Cup".to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            level: level.to_string(),
            track: "Sport".to_string(),
            sport: "Orienteering".to_string(),
            location: None,
            expected_total: None,
        }
    }

    #[test]
    fn empty_filter_composes_no_predicates() {
        assert!(compose(&FilterSpec::any(), PredicateShape::Direct).is_empty());
    }

    #[test]
    fn predicate_order_is_deterministic() {
        let filter = FilterSpec::any()
            .with_level("Region")
            .with_sport("Tourism")
            .with_date_to("2024-12-31")
            .with_track("Sport")
            .with_date_from("2024-01-01");

        let fields = compose(&filter, PredicateShape::Joined)
            .into_iter()
            .map(|p| (p.field, p.op))
            .collect::<Vec<_>>();
        assert_eq!(
            fields,
            vec![
                (EventField::Date, CompareOp::Gte),
                (EventField::Date, CompareOp::Lte),
                (EventField::Sport, CompareOp::Eq),
                (EventField::Track, CompareOp::Eq),
                (EventField::Level, CompareOp::Eq),
            ]
        );
    }

    #[test]
    fn date_range_is_inclusive() {
        let filter = FilterSpec::any()
            .with_date_from("2023-06-01")
            .with_date_to("2023-06-01");
        let set = PredicateSet::compose(&filter, PredicateShape::Direct);
        assert!(set.matches_event(&event("2023-06-01", "Region")));
        assert!(!set.matches_event(&event("2023-06-02", "Region")));
        assert!(!set.matches_event(&event("2023-05-31", "Region")));
    }

    #[test]
    fn describe_renders_stable_text() {
        let filter = FilterSpec::any().with_date_from("2023-01-01").with_level("Region");
        let set = PredicateSet::compose(&filter, PredicateShape::Joined);
        assert_eq!(
            set.describe(),
            "result.event.date >= 2023-01-01 AND result.event.level = 'Region'"
        );
        assert_eq!(
            PredicateSet::compose(&FilterSpec::any(), PredicateShape::Direct).describe(),
            "none"
        );
    }
}
