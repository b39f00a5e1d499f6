//! Integration tests for `SheetsClient` using wiremock HTTP mocks.

use insights_core::CellValue;
use insights_sheets::{SheetsAuth, SheetsClient, SheetsError};
use wiremock::matchers::{body_partial_json, header, method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SheetsClient {
    SheetsClient::with_base_url(SheetsAuth::Static("test-token".into()), 30, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn read_tab_returns_padded_rows_with_formulas() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "range": "'Facebook: Post Insights'!A1:D4",
        "majorDimension": "ROWS",
        "values": [
            ["Post Insights export"],
            ["Created Time", "Content", "Post Clicks", "Permanent Link"],
            ["2025-03-02 09:30:00", "Brunch is back", 12, "=HYPERLINK(\"https://fb.com/p/1\", \"View\")"],
            ["2025-03-03 18:00:00", "Happy hour"]
        ]
    });

    Mock::given(method("GET"))
        .and(path_regex(r"^/v4/spreadsheets/sheet123/values/.+Post.+Insights.+$"))
        .and(query_param("valueRenderOption", "FORMULA"))
        .and(query_param("dateTimeRenderOption", "FORMATTED_STRING"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let rows = client
        .read_tab("sheet123", "Facebook: Post Insights")
        .await
        .expect("should read tab");

    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.len() == 4), "rows are padded to the widest row");
    assert_eq!(rows[2][2], CellValue::Number(12.0));
    assert_eq!(
        rows[2][3],
        CellValue::Text("=HYPERLINK(\"https://fb.com/p/1\", \"View\")".to_string())
    );
    assert_eq!(rows[3][2], CellValue::Empty);
}

#[tokio::test]
async fn read_cell_of_blank_range_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/v4/spreadsheets/throttle1/values/.+Sheet1.+A1$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!A1",
            "majorDimension": "ROWS"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let cell = client
        .read_cell("throttle1", "Sheet1", "A1")
        .await
        .expect("should read cell");
    assert!(cell.is_empty());
}

#[tokio::test]
async fn read_cell_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/v4/spreadsheets/throttle1/values/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "range": "Sheet1!A1",
            "values": [["2025-03-01T08:00:00+00:00"]]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let cell = client.read_cell("throttle1", "Sheet1", "A1").await.unwrap();
    assert_eq!(cell.as_text(), Some("2025-03-01T08:00:00+00:00"));
}

#[tokio::test]
async fn write_cell_puts_raw_value() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/v4/spreadsheets/throttle1/values/.+$"))
        .and(query_param("valueInputOption", "RAW"))
        .and(body_partial_json(serde_json::json!({
            "range": "'Sheet1'!A1",
            "majorDimension": "ROWS",
            "values": [["2025-03-06T08:00:00+00:00"]]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "spreadsheetId": "throttle1",
            "updatedRange": "Sheet1!A1",
            "updatedRows": 1,
            "updatedColumns": 1,
            "updatedCells": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client
        .write_cell("throttle1", "Sheet1", "A1", "2025-03-06T08:00:00+00:00")
        .await
        .expect("should write cell");
    assert_eq!(response.updated_cells, 1);
}

#[tokio::test]
async fn missing_spreadsheet_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": { "code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.read_tab("missing", "Sheet1").await.unwrap_err();
    assert!(matches!(err, SheetsError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn unknown_tab_maps_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 400, "message": "Unable to parse range: 'Nope'", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.read_tab("sheet123", "Nope").await.unwrap_err();
    match err {
        SheetsError::UnexpectedStatus { status, body, .. } => {
            assert_eq!(status, 400);
            assert!(body.contains("Unable to parse range"));
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.read_tab("sheet123", "Sheet1").await.unwrap_err();
    assert!(matches!(err, SheetsError::Deserialize { .. }), "got: {err:?}");
}
