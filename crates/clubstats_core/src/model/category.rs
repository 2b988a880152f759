//! Closed category vocabularies used by events, results and filters.
//!
//! # Invariants
//! - `ALL` lists are in declaration order; report maps keyed by these enums
//!   iterate in the same order.
//! - `label()` is the persisted and displayed form; `from_label` is exact.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Competition tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    District,
    Region,
    Republic,
    International,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::District,
        Level::Region,
        Level::Republic,
        Level::International,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::District => "District",
            Self::Region => "Region",
            Self::Republic => "Republic",
            Self::International => "International",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == value)
    }
}

/// Organizational line an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Track {
    Education,
    Sport,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Education, Track::Sport];

    pub fn label(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Sport => "Sport",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|track| track.label() == value)
    }
}

/// Sport discipline offered by the club.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sport {
    Orienteering,
    Tourism,
    Spartakiad,
}

impl Sport {
    pub const ALL: [Sport; 3] = [Sport::Orienteering, Sport::Tourism, Sport::Spartakiad];

    pub fn label(self) -> &'static str {
        match self {
            Self::Orienteering => "Orienteering",
            Self::Tourism => "Tourism",
            Self::Spartakiad => "Spartakiad",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sport| sport.label() == value)
    }
}

/// Named medal. "No medal" is modelled as `Option::<Medal>::None`.
///
/// Ordering follows medal rank: gold < silver < bronze.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub const ALL: [Medal; 3] = [Medal::Gold, Medal::Silver, Medal::Bronze];

    /// Persisted lowercase form (`gold|silver|bronze`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "gold" => Some(Self::Gold),
            "silver" => Some(Self::Silver),
            "bronze" => Some(Self::Bronze),
            _ => None,
        }
    }
}

macro_rules! display_via {
    ($ty:ty, $method:ident) => {
        impl Display for $ty {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.$method())
            }
        }
    };
}

display_via!(Level, label);
display_via!(Track, label);
display_via!(Sport, label);
display_via!(Medal, as_str);

#[cfg(test)]
mod tests {
    use super::{Level, Medal, Track};

    #[test]
    fn labels_roundtrip_for_every_known_value() {
        for level in Level::ALL {
            assert_eq!(Level::from_label(level.label()), Some(level));
        }
        for track in Track::ALL {
            assert_eq!(Track::from_label(track.label()), Some(track));
        }
    }

    #[test]
    fn from_label_is_exact() {
        assert_eq!(Level::from_label("region"), None);
        assert_eq!(Level::from_label(" Region"), None);
        assert_eq!(Medal::parse("Gold"), None);
        assert_eq!(Medal::parse("none"), None);
    }

    #[test]
    fn medal_ordering_follows_rank() {
        assert!(Medal::Gold < Medal::Silver);
        assert!(Medal::Silver < Medal::Bronze);
    }
}
