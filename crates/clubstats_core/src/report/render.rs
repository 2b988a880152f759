//! Plain-text rendering of report records.
//!
//! Output is line oriented; summary lines use `Key: value` so the CSV
//! exporter can split them into two columns.

use crate::model::club::{Coach, Event, Group, Person};
use crate::report::types::{
    EntityReport, EventsBreakdown, LeaderboardRow, MedalCount, ResultRow, RosterEntry,
    StandingRow, YearlyRow,
};

pub fn render_medal_summary(medals: &MedalCount) -> String {
    [
        "Medal tally (filtered):".to_string(),
        format!("  Gold: {}", medals.gold),
        format!("  Silver: {}", medals.silver),
        format!("  Bronze: {}", medals.bronze),
        format!("  Total: {}", medals.total()),
    ]
    .join("\n")
}

pub fn render_events_breakdown(breakdown: &EventsBreakdown) -> String {
    let mut lines = vec!["Events by level:".to_string()];
    lines.extend(
        breakdown
            .by_level
            .iter()
            .map(|(level, count)| format!("  {level}: {count}")),
    );
    lines.push(String::new());
    lines.push("Events by track:".to_string());
    lines.extend(
        breakdown
            .by_track
            .iter()
            .map(|(track, count)| format!("  {track}: {count}")),
    );
    lines.join("\n")
}

pub fn render_leaderboard(rows: &[LeaderboardRow]) -> String {
    if rows.is_empty() {
        return "No coach data within the filter.".to_string();
    }
    let mut lines = vec!["Coach results:".to_string()];
    for row in rows {
        lines.push(format!(
            "  {}: gold {}, silver {}, bronze {}, starts {}, events {}, athletes {}",
            row.coach_name,
            row.medals.gold,
            row.medals.silver,
            row.medals.bronze,
            row.starts,
            row.events,
            row.athletes
        ));
    }
    lines.join("\n")
}

pub fn render_person_report(person: &Person, report: &EntityReport) -> String {
    let mut lines = vec![format!("Athlete: {}", person.full_name())];
    if report.rows.is_empty() {
        lines.push("No starts within the filter.".to_string());
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push("Starts:".to_string());
    lines.extend(report.rows.iter().map(|row| {
        format!(
            "  {} - {} ({}, {}, {}) - {}{}",
            row.date,
            row.event_name,
            row.level,
            row.track,
            row.sport,
            row.category,
            outcome_suffix(row)
        )
    }));
    lines.push(String::new());
    let summary = &report.summary;
    let share = summary.prize_share_percent().unwrap_or(0.0);
    lines.push(format!(
        "Total starts: {}; prizes: {}; prize share: {share:.1}%",
        summary.starts, summary.prizes
    ));
    lines.join("\n")
}

pub fn render_coach_report(coach: &Coach, report: &EntityReport) -> String {
    let mut lines = vec![format!("Coach: {}", coach.full_name)];
    let summary = &report.summary;
    lines.push(format!(
        "Starts: {} / Events: {} / Athletes: {} / Medals - gold: {}, silver: {}, bronze: {}",
        summary.starts,
        summary.events,
        summary.athletes,
        summary.medals.gold,
        summary.medals.silver,
        summary.medals.bronze
    ));
    lines.push(String::new());
    lines.push("Results:".to_string());
    push_result_lines(&mut lines, &report.rows);
    lines.join("\n")
}

pub fn render_group_report(group: &Group, roster: &[RosterEntry], report: &EntityReport) -> String {
    let mut lines = vec![format!("Group: {} ({})", group.name, group.sport), String::new()];
    lines.push("Members:".to_string());
    if roster.is_empty() {
        lines.push("  -".to_string());
    }
    for member in roster {
        let born = member
            .birthdate
            .map(|date| date.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("  {} ({born})", member.full_name));
    }

    lines.push(String::new());
    lines.push("Results:".to_string());
    push_result_lines(&mut lines, &report.rows);
    if !report.rows.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Total results: {}; prizes: {}",
            report.summary.starts, report.summary.prizes
        ));
    }
    lines.join("\n")
}

pub fn render_yearly(rows: &[YearlyRow]) -> String {
    if rows.is_empty() {
        return "No data for yearly dynamics.".to_string();
    }
    let mut lines = vec!["Yearly dynamics:".to_string()];
    lines.extend(rows.iter().map(|row| {
        format!(
            "  {}: events {}, medals {} (gold {}, silver {}, bronze {})",
            row.year, row.events, row.total_medals, row.gold, row.silver, row.bronze
        )
    }));
    lines.join("\n")
}

pub fn render_event_standings(event: &Event, rows: &[StandingRow]) -> String {
    let location = event.location.as_deref().unwrap_or("-");
    let mut lines = vec![format!(
        "{} - {} / {} / {} / {} / {}",
        event.date, event.name, event.level, event.track, event.sport, location
    )];
    if rows.is_empty() {
        lines.push("No results recorded.".to_string());
    }
    for row in rows {
        let place = row.place.map_or_else(|| "-".to_string(), |p| p.to_string());
        let medal = row.medal.map(|m| m.as_str()).unwrap_or("");
        lines.push(
            format!(
                "  {place}. {} [{}] coach {} {} {medal}",
                row.athlete,
                row.group_name.as_deref().unwrap_or("-"),
                row.coach_name.as_deref().unwrap_or("-"),
                row.category
            )
            .trim_end()
            .to_string(),
        );
    }
    lines.join("\n")
}

fn push_result_lines(lines: &mut Vec<String>, rows: &[ResultRow]) {
    if rows.is_empty() {
        lines.push("  No data within the filter.".to_string());
        return;
    }
    lines.extend(rows.iter().map(|row| {
        format!(
            "  {} - {} - {} - {}{}",
            row.date,
            row.event_name,
            row.athlete,
            row.category,
            outcome_suffix(row)
        )
    }));
}

fn outcome_suffix(row: &ResultRow) -> String {
    let place = row
        .place
        .map(|place| format!(", place {place}"))
        .unwrap_or_default();
    let medal = row
        .medal
        .map(|medal| format!(" {medal}"))
        .unwrap_or_default();
    format!("{place}{medal}")
}
