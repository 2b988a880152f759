//! Club statistics CLI.
//!
//! Usage:
//!   clubstats --db club.db medals --from 2023-01-01 --level Region
//!   clubstats --db club.db person 12 --format json
//!   clubstats --db club.db coaches --export coaches.csv
//!   clubstats --db club.db results --search smith --page-size 20 --page 2

use clap::{Args, Parser, Subcommand, ValueEnum};
use clubstats_core::db::open_db;
use clubstats_core::list::highlight::result_highlighter;
use clubstats_core::list::paged::PagedSearchList;
use clubstats_core::report::export::{export_report, ExportFormat};
use clubstats_core::report::render;
use clubstats_core::report::types::{ResultRow, RESULT_MEDAL_COLUMN, RESULT_PLACE_COLUMN};
use clubstats_core::{
    default_log_level, init_logging, FilterInput, FilterSpec, ReportService, SqliteClubRepository,
};
use log::info;
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "clubstats")]
#[command(about = "Filtered medal, coach and yearly reports for a sports club database")]
#[command(version)]
struct Cli {
    /// Path to the SQLite club database (created when missing)
    #[arg(long, global = true, default_value = "club.db")]
    db: PathBuf,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files; logging is off when omitted
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(flatten)]
    filter: FilterArgs,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also write the text report to this file (.csv selects CSV, anything else TXT)
    #[arg(long, global = true)]
    export: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Earliest event date, YYYY-MM-DD
    #[arg(long = "from", global = true)]
    date_from: Option<String>,

    /// Latest event date, YYYY-MM-DD
    #[arg(long = "to", global = true)]
    date_to: Option<String>,

    /// Exact sport label
    #[arg(long, global = true)]
    sport: Option<String>,

    /// Exact track label (Education, Sport)
    #[arg(long, global = true)]
    track: Option<String>,

    /// Exact level label (District, Region, Republic, International)
    #[arg(long, global = true)]
    level: Option<String>,
}

impl FilterArgs {
    fn to_spec(&self) -> FilterSpec {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        FilterSpec::from_input(&FilterInput {
            date_from: text(&self.date_from),
            date_to: text(&self.date_to),
            sport: text(&self.sport),
            track: text(&self.track),
            level: text(&self.level),
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Plain text report
    Text,
    /// Pretty-printed JSON records
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Gold/silver/bronze totals
    Medals,
    /// Event counts by level and by track
    Breakdown,
    /// Coach leaderboard
    Coaches,
    /// Events and medals per year
    Yearly,
    /// Results of one athlete
    Person { id: i64 },
    /// Results of one coach's athletes
    Coach { id: i64 },
    /// Roster and results of one training group
    Group { id: i64 },
    /// Standings of one event (ignores the filter)
    Event { id: i64 },
    /// Browse all filtered results as a paged table
    Results {
        /// Case-insensitive text to search in any column
        #[arg(long, default_value = "")]
        search: String,

        /// Rows per page; non-positive values fall back to 50
        #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
        page_size: i64,

        /// One-based page number, clamped to the last page
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
}

/// A finished command: text for humans and export, JSON for tools.
struct Output {
    text: String,
    json: serde_json::Value,
}

impl Output {
    fn new(text: String, record: &impl Serialize) -> CliResult<Self> {
        Ok(Self {
            text,
            json: serde_json::to_value(record)?,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let log_dir = absolute_dir(log_dir)?;
        init_logging(level, &log_dir.to_string_lossy())?;
    }

    let conn = open_db(&cli.db)?;
    let service = ReportService::new(SqliteClubRepository::try_new(&conn)?);
    let filter = cli.filter.to_spec();

    let output = match cli.command {
        Commands::Medals => {
            let medals = service.medal_summary(&filter)?;
            Output::new(render::render_medal_summary(&medals), &medals)?
        }
        Commands::Breakdown => {
            let breakdown = service.events_breakdown(&filter)?;
            Output::new(render::render_events_breakdown(&breakdown), &breakdown)?
        }
        Commands::Coaches => {
            let rows = service.coach_leaderboard(&filter)?;
            Output::new(render::render_leaderboard(&rows), &rows)?
        }
        Commands::Yearly => {
            let rows = service.yearly_dynamics(&filter)?;
            Output::new(render::render_yearly(&rows), &rows)?
        }
        Commands::Person { id } => {
            let view = service.person_report(id, &filter)?;
            let person = view.entity.as_ref().ok_or_else(|| not_found("person", id))?;
            Output::new(render::render_person_report(person, &view.report), &view)?
        }
        Commands::Coach { id } => {
            let view = service.coach_report(id, &filter)?;
            let coach = view.entity.as_ref().ok_or_else(|| not_found("coach", id))?;
            Output::new(render::render_coach_report(coach, &view.report), &view)?
        }
        Commands::Group { id } => {
            let view = service.group_report(id, &filter)?;
            let group = view.group.as_ref().ok_or_else(|| not_found("group", id))?;
            let text = render::render_group_report(group, &view.roster, &view.report);
            Output::new(text, &view)?
        }
        Commands::Event { id } => {
            let view = service.event_standings(id)?;
            let event = view.event.as_ref().ok_or_else(|| not_found("event", id))?;
            Output::new(render::render_event_standings(event, &view.rows), &view)?
        }
        Commands::Results {
            search,
            page_size,
            page,
        } => browse_results(service.result_rows(&filter)?, &search, page_size, page)?,
    };

    match cli.format {
        OutputFormat::Text => println!("{}", output.text),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output.json)?),
    }

    if let Some(path) = &cli.export {
        export_report(&output.text, path, ExportFormat::from_path(path))?;
        info!("event=cli_export module=cli status=ok");
    }
    Ok(())
}

fn browse_results(
    rows: Vec<ResultRow>,
    search: &str,
    page_size: i64,
    page: usize,
) -> CliResult<Output> {
    let mut list = PagedSearchList::for_records::<ResultRow>()
        .with_classifier(result_highlighter(RESULT_PLACE_COLUMN, RESULT_MEDAL_COLUMN));
    list.load_records(&rows)?;
    list.set_page_size(page_size);
    list.set_search(search);
    list.go_to_page(page.saturating_sub(1));

    let mut lines = vec![list.columns().join(" | ")];
    let mut json_rows = Vec::new();
    for (cells, highlight) in list.visible() {
        let tags = highlight.map(|h| h.style_tags()).unwrap_or_default();
        let marker = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(" "))
        };
        lines.push(format!("{}{marker}", cells.join(" | ")));
        json_rows.push(serde_json::json!({ "cells": cells, "highlight": highlight }));
    }
    let info = list.page_info();
    lines.push(info.to_string());

    Ok(Output {
        text: lines.join("\n"),
        json: serde_json::json!({ "page": info, "rows": json_rows }),
    })
}

fn absolute_dir(dir: &Path) -> CliResult<PathBuf> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    Ok(std::env::current_dir()?.join(dir))
}

fn not_found(entity: &str, id: i64) -> Box<dyn Error> {
    format!("{entity} {id} not found").into()
}
