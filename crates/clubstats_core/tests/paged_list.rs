use chrono::NaiveDate;
use clubstats_core::list::paged::{PagedSearchList, DEFAULT_PAGE_SIZE, PAGE_SIZE_CHOICES};
use clubstats_core::report::types::{ResultRow, RESULT_MEDAL_COLUMN, RESULT_PLACE_COLUMN};
use clubstats_core::{result_highlighter, Medal, Podium, RowHighlight};

fn rows(count: usize) -> Vec<Vec<String>> {
    (0..count)
        .map(|index| {
            vec![
                index.to_string(),
                "2023-05-01".to_string(),
                "Spring Cup".to_string(),
                format!("Athlete {index}"),
            ]
        })
        .collect()
}

fn list() -> PagedSearchList {
    PagedSearchList::new(["id", "Date", "Event", "Athlete"])
}

#[test]
fn hundred_twenty_rows_split_into_fifty_fifty_twenty() {
    let mut list = list();
    list.load(rows(120)).unwrap();

    assert_eq!(list.page_size(), DEFAULT_PAGE_SIZE);
    assert_eq!(list.max_page(), 2);
    let mut sizes = vec![list.visible_rows().len()];
    list.next_page();
    sizes.push(list.visible_rows().len());
    list.next_page();
    sizes.push(list.visible_rows().len());
    list.next_page();
    sizes.push(list.visible_rows().len());

    assert_eq!(sizes, vec![50, 50, 20, 20]);
    assert_eq!(list.page(), 2);
    assert_eq!(list.page_info().to_string(), "Page 3/3 • total: 120");
}

#[test]
fn search_finds_single_matching_cell_case_insensitively() {
    let mut rows = rows(30);
    rows[7][3] = "Smith Anna".to_string();

    let mut list = list();
    list.load(rows).unwrap();
    list.set_page_size(10);
    list.go_to_page(2);
    list.set_search("  smith ");

    assert_eq!(list.total_filtered(), 1);
    assert_eq!(list.page(), 0);
    assert_eq!(list.visible_rows()[0][0], "7");
    assert_eq!(list.search_text(), "smith");

    list.set_search("");
    assert_eq!(list.total_filtered(), 30);
}

#[test]
fn max_page_matches_ceiling_formula_for_every_size() {
    for count in [0usize, 1, 9, 10, 11, 99, 100, 101, 250] {
        for size in PAGE_SIZE_CHOICES {
            let mut list = list();
            list.load(rows(count)).unwrap();
            list.set_page_size(size as i64);

            let expected = count.div_ceil(size).saturating_sub(1);
            assert_eq!(list.max_page(), expected, "count={count} size={size}");
        }
    }
}

#[test]
fn page_stays_in_range_under_any_navigation() {
    let mut list = list();
    list.load(rows(73)).unwrap();
    list.set_page_size(10);

    let moves = [1, 1, -1, 1, 1, 1, 1, 1, 1, 1, 1, 1, -1, -1, 1, 1, 1];
    for step in moves {
        if step > 0 {
            list.next_page();
        } else {
            list.prev_page();
        }
        assert!(list.page() <= list.max_page());
        let visible = list.visible_rows().len();
        assert!(visible <= list.page_size());
        if list.page() < list.max_page() {
            assert_eq!(visible, list.page_size());
        }
    }
    assert_eq!(list.page(), list.max_page());
    assert_eq!(list.visible_rows().len(), 3);
}

#[test]
fn result_rows_are_highlighted_by_place_and_medal() {
    let rows = vec![
        result_row(1, Some(1), Some(Medal::Gold)),
        result_row(2, Some(7), Some(Medal::Silver)),
        result_row(3, Some(2), None),
        result_row(4, Some(12), None),
    ];
    let mut list = PagedSearchList::for_records::<ResultRow>()
        .with_classifier(result_highlighter(RESULT_PLACE_COLUMN, RESULT_MEDAL_COLUMN));
    list.load_records(&rows).unwrap();

    assert_eq!(
        list.visible_tags(),
        &[
            RowHighlight::classify(Some(1), Some(Medal::Gold)),
            Some(RowHighlight {
                place: None,
                medal: Some(Medal::Silver)
            }),
            Some(RowHighlight {
                place: Some(Podium::Second),
                medal: None
            }),
            None,
        ]
    );
}

fn result_row(result_id: i64, place: Option<u32>, medal: Option<Medal>) -> ResultRow {
    ResultRow {
        result_id,
        date: NaiveDate::from_ymd_opt(2023, 5, 1).unwrap(),
        event_id: 1,
        event_name: "Spring Cup".to_string(),
        level: "Region".to_string(),
        track: "Sport".to_string(),
        sport: "Orienteering".to_string(),
        person_id: result_id,
        athlete: format!("Athlete {result_id}"),
        category: String::new(),
        place,
        medal,
        note: None,
    }
}
