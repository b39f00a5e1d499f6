use super::*;

fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_string())
}

fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

fn header() -> Vec<CellValue> {
    [
        "Created Time",
        "Content",
        "Post Clicks",
        "Total Reactions",
        "Total Like Reactions",
        "Total Love Reactions",
        "Total Reach",
        "Total Impressions",
        "Permanent Link",
    ]
    .iter()
    .map(|h| text(h))
    .collect()
}

fn banner() -> Vec<CellValue> {
    vec![text("Facebook export"), CellValue::Empty]
}

// -----------------------------------------------------------------------
// normalize_header
// -----------------------------------------------------------------------

#[test]
fn normalize_header_snake_cases() {
    assert_eq!(normalize_header("Post Clicks"), "post_clicks");
    assert_eq!(normalize_header("  Created Time "), "created_time");
    assert_eq!(normalize_header("Total Reach (Unique)"), "total_reach_unique");
    assert_eq!(normalize_header("Post_Clicks"), "post_clicks");
    assert_eq!(normalize_header("---"), "");
}

// -----------------------------------------------------------------------
// extract_url
// -----------------------------------------------------------------------

#[test]
fn extract_url_from_formula() {
    assert_eq!(
        extract_url(r#"=HYPERLINK("https://www.facebook.com/123/posts/456", "View Post")"#),
        Some("https://www.facebook.com/123/posts/456".to_string())
    );
}

#[test]
fn extract_url_is_case_insensitive_and_tolerates_spaces() {
    assert_eq!(
        extract_url(r#"=hyperlink( "https://fb.com/p/1" ;"x")"#),
        Some("https://fb.com/p/1".to_string())
    );
}

#[test]
fn extract_url_without_formula_is_none() {
    assert_eq!(extract_url("https://fb.com/p/1"), None);
    assert_eq!(extract_url(r#"=HYPERLINK(A2, "View")"#), None);
    assert_eq!(extract_url(""), None);
}

// -----------------------------------------------------------------------
// parse_timestamp
// -----------------------------------------------------------------------

#[test]
fn parse_timestamp_accepts_common_formats() {
    let expected = dt(2025, 3, 2, 9, 30, 0);
    for raw in [
        "2025-03-02 09:30:00",
        "2025-03-02T09:30:00",
        "2025-03-02 09:30",
        "03/02/2025 09:30:00",
        "3/2/2025 9:30",
        "2025-03-02T09:30:00+0000",
        "2025-03-02T09:30:00+00:00",
    ] {
        assert_eq!(parse_timestamp(&text(raw)), Some(expected), "format: {raw}");
    }
}

#[test]
fn parse_timestamp_keeps_offset_wall_clock() {
    assert_eq!(
        parse_timestamp(&text("2025-03-02T23:30:00-0800")),
        Some(dt(2025, 3, 2, 23, 30, 0))
    );
}

#[test]
fn parse_timestamp_date_only_is_midnight() {
    assert_eq!(
        parse_timestamp(&text("2025-03-02")),
        Some(dt(2025, 3, 2, 0, 0, 0))
    );
}

#[test]
fn parse_timestamp_serial_number() {
    // 45718.5 is 2025-03-02 12:00
    assert_eq!(parse_timestamp(&num(45_718.5)), Some(dt(2025, 3, 2, 12, 0, 0)));
}

#[test]
fn parse_timestamp_rejects_garbage() {
    assert_eq!(parse_timestamp(&text("yesterday")), None);
    assert_eq!(parse_timestamp(&text("2025-13-45")), None);
    assert_eq!(parse_timestamp(&CellValue::Empty), None);
    assert_eq!(parse_timestamp(&num(-3.0)), None);
}

// -----------------------------------------------------------------------
// merge_cells / build_table
// -----------------------------------------------------------------------

#[test]
fn merge_cells_averages_and_rounds_up() {
    assert_eq!(merge_cells(&[num(4.0), num(5.0)]), num(5.0));
    assert_eq!(merge_cells(&[num(4.0), num(4.0)]), num(4.0));
    assert_eq!(merge_cells(&[num(3.0), CellValue::Empty]), num(3.0));
}

#[test]
fn merge_cells_falls_back_to_first_text() {
    assert_eq!(
        merge_cells(&[CellValue::Empty, text("a"), text("b")]),
        text("a")
    );
    assert_eq!(merge_cells(&[CellValue::Empty]), CellValue::Empty);
}

#[test]
fn build_table_merges_duplicate_columns_and_drops_blank_rows() {
    let raw = vec![
        banner(),
        vec![text("Created Time"), text("Post Clicks"), text("Post_Clicks")],
        vec![text("2025-03-02 09:30:00"), text("4"), num(5.0)],
        vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
        vec![text("2025-03-03 09:30:00"), text("1,000"), CellValue::Empty],
    ];
    let (table, blank_rows) = build_table(raw, 2).unwrap();
    assert_eq!(table.columns, vec!["created_time", "post_clicks"]);
    assert_eq!(blank_rows, 1);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0][1], num(5.0));
    assert_eq!(table.rows[1][1], num(1000.0));
}

#[test]
fn build_table_fails_when_header_row_missing() {
    let raw = vec![banner()];
    let err = build_table(raw, 2).unwrap_err();
    assert!(matches!(
        err,
        IngestError::MissingHeader {
            header_row: 2,
            rows: 1
        }
    ));
}

// -----------------------------------------------------------------------
// ingest_rows
// -----------------------------------------------------------------------

#[test]
fn ingest_rows_builds_typed_posts() {
    let raw = vec![
        banner(),
        header(),
        vec![
            text("2025-03-02 09:30:00"),
            text("Brunch is back"),
            text("12"),
            num(40.0),
            num(30.0),
            num(8.0),
            text("1,200"),
            num(1500.0),
            text(r#"=HYPERLINK("https://fb.com/p/1", "View")"#),
        ],
    ];
    let outcome = ingest_rows(raw, 2).unwrap();
    assert_eq!(outcome.posts.len(), 1);
    let post = &outcome.posts[0];
    assert_eq!(post.created_time, dt(2025, 3, 2, 9, 30, 0));
    assert_eq!(post.content, "Brunch is back");
    assert_eq!(post.clicks, 12);
    assert_eq!(post.reactions, 40);
    assert_eq!(post.likes, 30);
    assert_eq!(post.loves, 8);
    assert_eq!(post.reach, 1200);
    assert_eq!(post.impressions, 1500);
    assert_eq!(post.link.as_deref(), Some("https://fb.com/p/1"));
}

#[test]
fn ingest_rows_drops_unparseable_timestamps() {
    let raw = vec![
        banner(),
        header(),
        vec![text("2025-03-02 09:30:00"), text("ok"), num(1.0)],
        vec![text("not a date"), text("bad"), num(100.0)],
        vec![CellValue::Empty, text("no time"), num(100.0)],
    ];
    let outcome = ingest_rows(raw, 2).unwrap();
    assert_eq!(outcome.posts.len(), 1);
    assert_eq!(outcome.dropped_rows, 2);
    assert_eq!(outcome.posts[0].clicks, 1);
}

#[test]
fn ingest_rows_reads_direct_link_and_ignores_non_urls() {
    let raw = vec![
        banner(),
        vec![text("Created Time"), text("Permanent Link")],
        vec![text("2025-03-02"), text(" https://fb.com/p/2 ")],
        vec![text("2025-03-03"), text("n/a")],
    ];
    let outcome = ingest_rows(raw, 2).unwrap();
    assert_eq!(outcome.posts[0].link.as_deref(), Some("https://fb.com/p/2"));
    assert_eq!(outcome.posts[1].link, None);
}

#[test]
fn ingest_rows_falls_through_to_formula_link_column() {
    let raw = vec![
        banner(),
        vec![text("Created Time"), text("Permanent Link"), text("Link")],
        vec![
            text("2025-03-02"),
            CellValue::Empty,
            text(r#"=HYPERLINK("https://fb.com/p/3","Open")"#),
        ],
    ];
    let outcome = ingest_rows(raw, 2).unwrap();
    assert_eq!(outcome.posts[0].link.as_deref(), Some("https://fb.com/p/3"));
}

#[test]
fn ingest_rows_missing_counters_are_zero() {
    let raw = vec![
        banner(),
        vec![text("Created Time"), text("Content")],
        vec![text("2025-03-02"), num(2025.0)],
    ];
    let outcome = ingest_rows(raw, 2).unwrap();
    let post = &outcome.posts[0];
    assert_eq!(post.content, "2025");
    assert_eq!(post.engagement_score(), 0);
}

#[test]
fn ingest_rows_requires_created_time_column() {
    let raw = vec![banner(), vec![text("Content")], vec![text("hello")]];
    let err = ingest_rows(raw, 2).unwrap_err();
    assert!(matches!(err, IngestError::MissingColumn(ref c) if c == "created_time"));
}

#[test]
fn ingest_rows_header_on_first_row() {
    let raw = vec![
        vec![text("Created Time"), text("Post Clicks")],
        vec![text("2025-03-02"), num(7.0)],
    ];
    let outcome = ingest_rows(raw, 1).unwrap();
    assert_eq!(outcome.posts[0].clicks, 7);
}
