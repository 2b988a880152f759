use clubstats_core::report::render::{render_leaderboard, render_medal_summary};
use clubstats_core::report::types::{LeaderboardRow, MedalCount};
use clubstats_core::{export_report, ExportFormat};

fn medals() -> MedalCount {
    MedalCount {
        gold: 3,
        silver: 1,
        bronze: 2,
    }
}

#[test]
fn csv_export_writes_bom_and_semicolon_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medals.CSV");
    let format = ExportFormat::from_path(&path);
    assert_eq!(format, ExportFormat::Csv);

    export_report(&render_medal_summary(&medals()), &path, format).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let body = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let lines = body.lines().collect::<Vec<_>>();
    assert_eq!(
        lines,
        vec![
            "Medal tally (filtered):",
            "Gold;3",
            "Silver;1",
            "Bronze;2",
            "Total;6"
        ]
    );
}

#[test]
fn csv_export_quotes_values_containing_the_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coaches.csv");
    let rows = vec![LeaderboardRow {
        coach_id: 1,
        coach_name: "Ivanova; Olga".to_string(),
        medals: medals(),
        starts: 9,
        events: 4,
        athletes: 3,
    }];

    export_report(&render_leaderboard(&rows), &path, ExportFormat::Csv).unwrap();

    let body = std::fs::read_to_string(&path).unwrap();
    assert!(body.contains("\"Ivanova; Olga\";"));
}

#[test]
fn txt_export_writes_text_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medals.txt");
    let text = render_medal_summary(&medals());

    export_report(&text, &path, ExportFormat::from_path(&path)).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
}

#[test]
fn export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("report.txt");

    let err = export_report("Gold: 1", &path, ExportFormat::Txt).unwrap_err();
    assert!(err.to_string().starts_with("report export failed"));
}
