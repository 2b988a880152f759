//! Report filter values and predicate composition.
//!
//! # Responsibility
//! - Normalize raw filter-bar input into an immutable [`FilterSpec`].
//! - Compose typed predicates from a [`FilterSpec`] (see [`predicate`]).
//!
//! # Invariants
//! - Blank fields are unconstrained.
//! - Unparsable dates are unconstrained; they never surface as errors.

pub mod predicate;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw filter-bar input, exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterInput {
    pub date_from: String,
    pub date_to: String,
    pub sport: String,
    pub track: String,
    pub level: String,
}

/// Normalized, immutable report scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    sport: Option<String>,
    track: Option<String>,
    level: Option<String>,
}

impl FilterSpec {
    /// Unconstrained filter.
    pub fn any() -> Self {
        Self::default()
    }

    /// Normalizes raw input with the lenient policy: blank or malformed
    /// values are dropped.
    pub fn from_input(input: &FilterInput) -> Self {
        Self {
            date_from: normalize_date("date_from", &input.date_from),
            date_to: normalize_date("date_to", &input.date_to),
            sport: normalize_label(&input.sport),
            track: normalize_label(&input.track),
            level: normalize_label(&input.level),
        }
    }

    pub fn with_date_from(mut self, raw: &str) -> Self {
        self.date_from = normalize_date("date_from", raw);
        self
    }

    pub fn with_date_to(mut self, raw: &str) -> Self {
        self.date_to = normalize_date("date_to", raw);
        self
    }

    pub fn with_sport(mut self, raw: &str) -> Self {
        self.sport = normalize_label(raw);
        self
    }

    pub fn with_track(mut self, raw: &str) -> Self {
        self.track = normalize_label(raw);
        self
    }

    pub fn with_level(mut self, raw: &str) -> Self {
        self.level = normalize_label(raw);
        self
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    pub fn sport(&self) -> Option<&str> {
        self.sport.as_deref()
    }

    pub fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }

    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    /// Returns whether no field constrains the report.
    pub fn is_unconstrained(&self) -> bool {
        self.date_from.is_none()
            && self.date_to.is_none()
            && self.sport.is_none()
            && self.track.is_none()
            && self.level.is_none()
    }
}

/// Parses a strict `YYYY-MM-DD` date; anything else is unconstrained.
pub fn parse_filter_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    // chrono accepts unpadded fields; the filter contract is the padded form.
    if trimmed.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

fn normalize_date(field: &'static str, raw: &str) -> Option<NaiveDate> {
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = parse_filter_date(raw);
    if parsed.is_none() {
        debug!("event=filter_normalize module=filter status=dropped field={field} reason=bad_date");
    }
    parsed
}

fn normalize_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_filter_date, FilterInput, FilterSpec};
    use chrono::NaiveDate;

    #[test]
    fn blank_input_is_unconstrained() {
        let spec = FilterSpec::from_input(&FilterInput {
            date_from: "  ".to_string(),
            sport: "\t".to_string(),
            ..FilterInput::default()
        });
        assert!(spec.is_unconstrained());
    }

    #[test]
    fn malformed_dates_normalize_to_unconstrained() {
        let spec = FilterSpec::any()
            .with_date_from("2023-13-01")
            .with_date_to("yesterday");
        assert_eq!(spec.date_from(), None);
        assert_eq!(spec.date_to(), None);
        assert!(spec.is_unconstrained());
    }

    #[test]
    fn unpadded_dates_are_rejected() {
        assert_eq!(parse_filter_date("2023-1-5"), None);
        assert_eq!(
            parse_filter_date(" 2023-01-05 "),
            NaiveDate::from_ymd_opt(2023, 1, 5)
        );
    }

    #[test]
    fn labels_are_trimmed_and_kept_verbatim() {
        let spec = FilterSpec::any().with_level(" Region ").with_sport("Tourism");
        assert_eq!(spec.level(), Some("Region"));
        assert_eq!(spec.sport(), Some("Tourism"));
        assert_eq!(spec.track(), None);
    }
}
