//! Row classification for podium places and medals.

use crate::model::category::Medal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Podium {
    First,
    Second,
    Third,
}

impl Podium {
    pub fn from_place(place: u32) -> Option<Self> {
        match place {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            _ => None,
        }
    }
}

/// Visual classification of one result row. Place and medal highlight
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowHighlight {
    pub place: Option<Podium>,
    pub medal: Option<Medal>,
}

impl RowHighlight {
    /// Returns `None` when neither place nor medal is highlighted.
    pub fn classify(place: Option<u32>, medal: Option<Medal>) -> Option<Self> {
        let place = place.and_then(Podium::from_place);
        if place.is_none() && medal.is_none() {
            return None;
        }
        Some(Self { place, medal })
    }

    /// Style tag names, place first.
    pub fn style_tags(&self) -> Vec<&'static str> {
        let place = self.place.map(|podium| match podium {
            Podium::First => "place_1",
            Podium::Second => "place_2",
            Podium::Third => "place_3",
        });
        let medal = self.medal.map(|medal| match medal {
            Medal::Gold => "medal_gold",
            Medal::Silver => "medal_silver",
            Medal::Bronze => "medal_bronze",
        });
        place.into_iter().chain(medal).collect()
    }
}

/// Builds a classifier reading place and medal from the given cell indexes.
///
/// Unparsable or missing cells are treated as absent.
pub fn result_highlighter(
    place_column: usize,
    medal_column: usize,
) -> impl Fn(&[String]) -> Option<RowHighlight> {
    move |cells: &[String]| {
        let place = cells
            .get(place_column)
            .and_then(|cell| cell.trim().parse::<u32>().ok());
        let medal = cells
            .get(medal_column)
            .and_then(|cell| Medal::parse(cell.trim()));
        RowHighlight::classify(place, medal)
    }
}
