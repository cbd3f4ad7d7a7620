//! Integration tests for the Leave Converter.
//!
//! This suite drives the HTTP API end to end and covers:
//! - JSON breakdowns against the stored roster
//! - Workbook upload and breakdown download
//! - Roster management
//! - Login
//! - Import and export through files on disk

use std::io::Cursor;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use calamine::{Data, Range, Reader, Xlsx};
use rust_decimal::Decimal;
use rust_xlsxwriter::Workbook;
use serde_json::{Value, json};
use tower::ServiceExt;

use leave_converter::api::{AppState, create_router};
use leave_converter::auth::CredentialStore;
use leave_converter::breakdown::expand_leave_with_summary;
use leave_converter::config::{AuthConfig, ConfigLoader, ImportConfig};
use leave_converter::export::{BREAKDOWN_HEADERS, write_breakdown_workbook};
use leave_converter::import::read_leave_workbook;
use leave_converter::models::{Employee, WeekdayHours};
use leave_converter::roster::Roster;
use leave_converter::store::{JsonFileRepository, MemoryRepository};

// =============================================================================
// Test Helpers
// =============================================================================

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn ada() -> Employee {
    Employee {
        id: "1001".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        hours: WeekdayHours::new([
            decimal("8.5"),
            decimal("8.5"),
            decimal("8.5"),
            decimal("8.5"),
            decimal("6"),
        ]),
    }
}

fn create_test_state() -> AppState {
    let roster = Roster::new(Arc::new(MemoryRepository::with_records(vec![ada()])));
    let credentials = CredentialStore::new(
        Arc::new(MemoryRepository::new()),
        AuthConfig {
            pbkdf2_iterations: 1_000,
            ..AuthConfig::default()
        },
    );
    credentials.ensure_bootstrap_admin().unwrap();
    AppState::new(roster, credentials, ImportConfig::default())
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

fn transaction(employee_id: &str, start: &str, end: &str, days: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "employee_name": "Lovelace, Ada",
        "initials": "A",
        "leave_description": "Leave",
        "leave_type_description": "Annual Leave",
        "start_date": start,
        "end_date": end,
        "number_of_days": days
    })
}

/// A payroll export with title rows above the header on the eighth row.
fn payroll_workbook() -> Workbook {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Leave Transactions Report").unwrap();
    sheet.write_string(2, 0, "Printed 02/06/2025").unwrap();

    let headers = [
        "Emp Number",
        "Employee Name",
        "Initials",
        "Leave Description",
        "Leave Type",
        "Start Date",
        "End Date",
        "No Days",
    ];
    for (col, label) in headers.iter().enumerate() {
        sheet.write_string(7, col as u16, *label).unwrap();
    }

    sheet.write_string(8, 0, "Group : All Groups").unwrap();

    // Partial day with Excel serial dates: Monday 2 June 2025
    sheet.write_number(9, 0, 1001.0).unwrap();
    sheet.write_string(9, 1, "Lovelace, Ada").unwrap();
    sheet.write_string(9, 2, "A").unwrap();
    sheet.write_string(9, 3, "Dentist").unwrap();
    sheet.write_string(9, 4, "Sick Leave").unwrap();
    sheet.write_number(9, 5, 45810.0).unwrap();
    sheet.write_number(9, 6, 45810.0).unwrap();
    sheet.write_number(9, 7, 0.5).unwrap();

    // Row 10 left blank

    // Friday to Monday with text dates
    sheet.write_number(11, 0, 1001.0).unwrap();
    sheet.write_string(11, 1, "Lovelace, Ada").unwrap();
    sheet.write_string(11, 2, "A").unwrap();
    sheet.write_string(11, 3, "Long weekend").unwrap();
    sheet.write_string(11, 4, "Annual Leave").unwrap();
    sheet.write_string(11, 5, "06/06/2025").unwrap();
    sheet.write_string(11, 6, "09/06/2025").unwrap();
    sheet.write_number(11, 7, 2.0).unwrap();

    // Not on the roster
    sheet.write_string(12, 0, "9999").unwrap();
    sheet.write_string(12, 1, "Hopper, Grace").unwrap();
    sheet.write_string(12, 2, "G").unwrap();
    sheet.write_string(12, 3, "Holiday").unwrap();
    sheet.write_string(12, 4, "Annual Leave").unwrap();
    sheet.write_string(12, 5, "2025-06-02").unwrap();
    sheet.write_string(12, 6, "2025-06-03").unwrap();
    sheet.write_number(12, 7, 2.0).unwrap();

    // Reversal with negative days
    sheet.write_number(13, 0, 1001.0).unwrap();
    sheet.write_string(13, 1, "Lovelace, Ada").unwrap();
    sheet.write_string(13, 2, "A").unwrap();
    sheet.write_string(13, 3, "Cancelled").unwrap();
    sheet.write_string(13, 4, "Annual Leave").unwrap();
    sheet.write_string(13, 5, "2025-06-04").unwrap();
    sheet.write_string(13, 6, "2025-06-04").unwrap();
    sheet.write_number(13, 7, -1.0).unwrap();

    workbook
}

fn read_first_sheet(bytes: Vec<u8>) -> Range<Data> {
    let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
    workbook.worksheet_range_at(0).unwrap().unwrap()
}

fn text(value: &str) -> Data {
    Data::String(value.to_string())
}

// =============================================================================
// JSON breakdown
// =============================================================================

#[tokio::test]
async fn test_full_week_uses_each_weekday_allotment() {
    let body = json!({ "transactions": [transaction("1001", "2025-12-22", "2025-12-26", "5")] });
    let (status, result) = send(create_router_for_test(), "POST", "/breakdown", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    let records = result["records"].as_array().unwrap();
    assert_eq!(records.len(), 5);

    let days: Vec<&str> = records.iter().map(|r| r["day_of_week"].as_str().unwrap()).collect();
    assert_eq!(days, vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]);
    assert_eq!(decimal(records[0]["daily_hours"].as_str().unwrap()), decimal("8.5"));
    assert_eq!(decimal(records[4]["daily_hours"].as_str().unwrap()), decimal("6"));
    assert_eq!(decimal(result["summary"]["total_hours"].as_str().unwrap()), decimal("40"));
}

#[tokio::test]
async fn test_weekend_only_range_yields_no_records() {
    let body = json!({ "transactions": [transaction("1001", "2025-06-07", "2025-06-08", "2")] });
    let (status, result) = send(create_router_for_test(), "POST", "/breakdown", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(result["records"].as_array().unwrap().is_empty());
    assert_eq!(result["summary"]["transactions_processed"], 1);
}

#[tokio::test]
async fn test_unmatched_employee_does_not_affect_others() {
    let body = json!({
        "transactions": [
            transaction("9999", "2025-06-02", "2025-06-06", "5"),
            transaction("1001", "2025-06-02", "2025-06-02", "0.5"),
        ]
    });
    let (status, result) = send(create_router_for_test(), "POST", "/breakdown", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    let records = result["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["employee_id"], "1001");
    assert_eq!(decimal(records[0]["daily_hours"].as_str().unwrap()), decimal("4.25"));
    assert_eq!(result["summary"]["transactions_skipped"], 1);
    assert_eq!(result["summary"]["unmatched_employee_ids"], json!(["9999"]));
}

#[tokio::test]
async fn test_negative_day_count_is_rejected_without_records() {
    let body = json!({
        "transactions": [
            transaction("1001", "2025-06-03", "2025-06-03", "1"),
            transaction("1001", "2025-06-02", "2025-06-02", "-1")
        ]
    });
    let (status, error) = send(create_router_for_test(), "POST", "/breakdown", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().starts_with("transactions[1]"));
    assert!(error.get("records").is_none());
}

#[tokio::test]
async fn test_empty_transaction_list_is_ok() {
    let (status, result) = send(
        create_router_for_test(),
        "POST",
        "/breakdown",
        Some(json!({ "transactions": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(result["records"].as_array().unwrap().is_empty());
}

// =============================================================================
// Workbook upload
// =============================================================================

#[tokio::test]
async fn test_workbook_upload_returns_breakdown_workbook() {
    let upload = payroll_workbook().save_to_buffer().unwrap();
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/breakdown/xlsx")
                .body(Body::from(upload))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    let disposition = headers.get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"Leave_Breakdown_"));
    assert!(disposition.ends_with(".xlsx\""));
    assert_eq!(headers.get("x-unmatched-employees").unwrap(), "1");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let range = read_first_sheet(bytes.to_vec());

    for (col, label) in BREAKDOWN_HEADERS.iter().enumerate() {
        assert_eq!(range.get_value((0, col as u32)), Some(&text(label)));
    }
    assert_eq!(range.height(), 4);

    assert_eq!(range.get_value((1, 0)), Some(&text("1001")));
    assert_eq!(range.get_value((1, 5)), Some(&text("2025-06-02")));
    assert_eq!(range.get_value((1, 7)), Some(&Data::Float(4.25)));
    assert_eq!(range.get_value((2, 6)), Some(&text("Friday")));
    assert_eq!(range.get_value((2, 7)), Some(&Data::Float(6.0)));
    assert_eq!(range.get_value((3, 5)), Some(&text("2025-06-09")));
    assert_eq!(range.get_value((3, 7)), Some(&Data::Float(8.5)));
}

#[tokio::test]
async fn test_workbook_without_required_columns_returns_422() {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(7, 0, "Emp. Number").unwrap();
    sheet.write_string(7, 1, "Start Date").unwrap();
    sheet.write_string(8, 0, "1001").unwrap();
    let upload = workbook.save_to_buffer().unwrap();

    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/breakdown/xlsx")
                .body(Body::from(upload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error["code"], "MISSING_COLUMNS");
    assert!(error["details"].as_str().unwrap().contains("No Days"));
    assert!(error["message"].as_str().unwrap().contains("Emp. Number"));
}

// =============================================================================
// Roster management
// =============================================================================

#[tokio::test]
async fn test_employee_crud_flow() {
    let router = create_router_for_test();
    let grace = json!({
        "id": "2002",
        "first_name": "Grace",
        "last_name": "Hopper",
        "hours": { "monday": "7.6", "tuesday": "7.6", "wednesday": "7.6", "thursday": "7.6", "friday": "7.6" }
    });

    let (status, created) = send(router.clone(), "POST", "/employees", Some(grace.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], "2002");

    let (status, error) = send(router.clone(), "POST", "/employees", Some(grace)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DUPLICATE_EMPLOYEE");

    let (status, found) = send(router.clone(), "GET", "/employees?q=hop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);

    let (status, all) = send(router.clone(), "GET", "/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 2);

    let update = json!({
        "first_name": "Grace",
        "last_name": "Murray Hopper",
        "hours": { "monday": "8" }
    });
    let (status, updated) = send(router.clone(), "PUT", "/employees/2002", Some(update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["last_name"], "Murray Hopper");
    assert!(updated["hours"]["tuesday"].is_null());

    let (status, _) = send(router.clone(), "DELETE", "/employees/2002", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, error) = send(router, "GET", "/employees/2002", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "EMPLOYEE_NOT_FOUND");
}

#[tokio::test]
async fn test_employee_with_impossible_hours_is_rejected() {
    let body = json!({
        "id": "3003",
        "first_name": "Alan",
        "last_name": "Turing",
        "hours": { "friday": "25" }
    });
    let (status, error) = send(create_router_for_test(), "POST", "/employees", Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_EMPLOYEE");
}

#[tokio::test]
async fn test_new_employee_is_used_by_next_breakdown() {
    let router = create_router_for_test();
    let body = json!({
        "id": "2002",
        "first_name": "Grace",
        "last_name": "Hopper",
        "hours": { "wednesday": "7.6" }
    });
    send(router.clone(), "POST", "/employees", Some(body)).await;

    let body = json!({ "transactions": [transaction("2002", "2025-06-02", "2025-06-04", "3")] });
    let (_, result) = send(router, "POST", "/breakdown", Some(body)).await;

    let hours: Vec<Decimal> = result["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| decimal(r["daily_hours"].as_str().unwrap()))
        .collect();
    assert_eq!(hours, vec![decimal("0"), decimal("0"), decimal("7.6")]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_of_one_id_on_disk_admit_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("employee_data.json");
    let roster = Roster::new(Arc::new(JsonFileRepository::new(&path)));
    let credentials = CredentialStore::new(Arc::new(MemoryRepository::new()), AuthConfig::default());
    let router = create_router(AppState::new(roster, credentials, ImportConfig::default()));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let router = router.clone();
            let body = json!({
                "id": "4004",
                "first_name": format!("Writer{}", i),
                "last_name": "Race"
            });
            tokio::spawn(async move { send(router, "POST", "/employees", Some(body)).await })
        })
        .collect();

    let mut statuses = Vec::new();
    for task in tasks {
        statuses.push(task.await.unwrap().0);
    }
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CREATED).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(), 7);

    let stored: Vec<Employee> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_returns_profile_without_hash() {
    let body = json!({ "username": "admin", "password": "admin123" });
    let (status, profile) = send(create_router_for_test(), "POST", "/login", Some(body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "admin");
    assert_eq!(profile["full_name"], "System Administrator");
    assert_eq!(profile["is_admin"], true);
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let router = create_router_for_test();
    let (wrong_status, wrong) = send(
        router.clone(),
        "POST",
        "/login",
        Some(json!({ "username": "admin", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        router,
        "POST",
        "/login",
        Some(json!({ "username": "ghost", "password": "nope" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
}

// =============================================================================
// Files on disk
// =============================================================================

#[test]
fn test_file_round_trip_with_json_roster() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("leave-converter.yaml");
    std::fs::write(
        &config_path,
        format!(
            "storage:\n  employees_path: {}\n",
            dir.path().join("employees.json").display()
        ),
    )
    .unwrap();
    let config = ConfigLoader::load(&config_path).unwrap().into_config();
    assert_eq!(config.import.header_row, 7);

    let roster = Roster::new(Arc::new(JsonFileRepository::new(&config.storage.employees_path)));
    roster.create(ada()).unwrap();

    let input = dir.path().join("leave.xlsx");
    payroll_workbook().save(&input).unwrap();
    let imported = read_leave_workbook(&input, &config.import).unwrap();
    assert_eq!(imported.transactions.len(), 3);
    assert_eq!(imported.sentinel_rows, 1);
    assert_eq!(imported.blank_rows, 1);
    assert_eq!(imported.invalid_day_rows, 1);

    // Reopen the roster from disk before expanding
    let reopened = Roster::new(Arc::new(JsonFileRepository::new(&config.storage.employees_path)));
    let result = expand_leave_with_summary(&imported.transactions, &reopened.index().unwrap());
    assert_eq!(result.summary.records_emitted, 3);
    assert_eq!(result.summary.total_hours, decimal("18.75"));

    let output = dir.path().join("breakdown.xlsx");
    write_breakdown_workbook(&result.records, &output).unwrap();
    let range = read_first_sheet(std::fs::read(&output).unwrap());
    assert_eq!(range.get_value((1, 3)), Some(&text("Dentist")));
    assert_eq!(range.get_value((3, 6)), Some(&text("Monday")));
}
