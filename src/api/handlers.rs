//! HTTP request handlers for the Leave Converter API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State, rejection::JsonRejection},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::breakdown::expand_leave_with_summary;
use crate::error::{ConverterError, ConverterResult};
use crate::export::{XLSX_CONTENT_TYPE, breakdown_workbook_bytes, export_file_name};
use crate::import::read_leave_workbook_bytes;
use crate::models::UserProfile;

use super::request::{
    BreakdownRequest, EmployeeQuery, EmployeeRequest, EmployeeUpdateRequest, LoginRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Response header carrying the number of transactions skipped because their
/// employee was not on the roster.
pub const UNMATCHED_HEADER: HeaderName = HeaderName::from_static("x-unmatched-employees");

/// Largest accepted workbook upload.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/breakdown", post(breakdown_handler))
        .route("/breakdown/xlsx", post(breakdown_xlsx_handler))
        .route(
            "/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/employees/:id",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employee_handler),
        )
        .route("/login", post(login_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Handler for POST /breakdown.
///
/// Expands JSON leave transactions against the stored roster. Transactions
/// with a negative day count are rejected with 400.
async fn breakdown_handler(
    State(state): State<AppState>,
    payload: Result<Json<BreakdownRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing breakdown request");

    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(error) = request.validate() {
        warn!(correlation_id = %correlation_id, error = %error.message, "Breakdown request rejected");
        return ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response();
    }

    let start_time = Instant::now();
    let transaction_count = request.transactions.len();
    let transactions = request.transactions;
    let result = match run_blocking(correlation_id, move || {
        let roster = state.roster().index()?;
        Ok(expand_leave_with_summary(&transactions, &roster))
    })
    .await
    {
        Ok(result) => result,
        Err(response) => return response,
    };

    info!(
        correlation_id = %correlation_id,
        transactions = transaction_count,
        records = result.summary.records_emitted,
        skipped = result.summary.transactions_skipped,
        duration_us = start_time.elapsed().as_micros(),
        "Breakdown completed successfully"
    );

    (StatusCode::OK, Json(result)).into_response()
}

/// Handler for POST /breakdown/xlsx.
///
/// Accepts a payroll leave workbook and returns the breakdown workbook as a
/// download.
async fn breakdown_xlsx_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(
        correlation_id = %correlation_id,
        upload_bytes = body.len(),
        "Processing workbook upload"
    );

    let start_time = Instant::now();
    let (imported, result, workbook) = match run_blocking(correlation_id, move || {
        let imported = read_leave_workbook_bytes(&body, state.import_config())?;
        let roster = state.roster().index()?;
        let result = expand_leave_with_summary(&imported.transactions, &roster);
        let workbook = breakdown_workbook_bytes(&result.records)?;
        Ok((imported, result, workbook))
    })
    .await
    {
        Ok(outcome) => outcome,
        Err(response) => return response,
    };

    let file_name = export_file_name(Local::now().naive_local());
    info!(
        correlation_id = %correlation_id,
        transactions = imported.transactions.len(),
        sentinel_rows = imported.sentinel_rows,
        invalid_day_rows = imported.invalid_day_rows,
        records = result.summary.records_emitted,
        skipped = result.summary.transactions_skipped,
        file_name = %file_name,
        duration_us = start_time.elapsed().as_micros(),
        "Workbook breakdown completed successfully"
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
            (
                UNMATCHED_HEADER,
                result.summary.transactions_skipped.to_string(),
            ),
        ],
        workbook,
    )
        .into_response()
}

/// Handler for GET /employees.
async fn list_employees_handler(
    State(state): State<AppState>,
    Query(query): Query<EmployeeQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = run_blocking(correlation_id, move || match query.q.as_deref() {
        Some(q) => state.roster().search(q),
        None => state.roster().list(),
    })
    .await;

    match result {
        Ok(employees) => (StatusCode::OK, Json(employees)).into_response(),
        Err(response) => response,
    }
}

/// Handler for POST /employees.
async fn create_employee_handler(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match run_blocking(correlation_id, move || state.roster().create(request.into())).await {
        Ok(employee) => {
            info!(correlation_id = %correlation_id, employee_id = %employee.id, "Employee created");
            (StatusCode::CREATED, Json(employee)).into_response()
        }
        Err(response) => response,
    }
}

/// Handler for GET /employees/:id.
async fn get_employee_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    match run_blocking(correlation_id, move || state.roster().get(&id)).await {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(response) => response,
    }
}

/// Handler for PUT /employees/:id.
async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeUpdateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match run_blocking(correlation_id, move || state.roster().update(&id, request.into())).await {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(response) => response,
    }
}

/// Handler for DELETE /employees/:id.
async fn delete_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    match run_blocking(correlation_id, move || state.roster().delete(&id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(response) => response,
    }
}

/// Handler for POST /login.
///
/// Returns the user's profile on success. Unknown users, inactive users and
/// wrong passwords all get the same 401.
async fn login_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let username = request.username.clone();
    let outcome = run_blocking(correlation_id, move || {
        state
            .credentials()
            .authenticate(&request.username, &request.password)
    })
    .await;

    match outcome {
        Ok(Some(account)) => {
            info!(correlation_id = %correlation_id, username = %account.username, "Login succeeded");
            (StatusCode::OK, Json(UserProfile::from(&account))).into_response()
        }
        Ok(None) => {
            warn!(correlation_id = %correlation_id, username = %username, "Login failed");
            ApiErrorResponse::new(StatusCode::UNAUTHORIZED, ApiError::invalid_login())
                .into_response()
        }
        Err(response) => response,
    }
}

/// Runs storage, hashing and workbook work on the blocking thread pool.
async fn run_blocking<T, F>(correlation_id: Uuid, task: F) -> Result<T, Response>
where
    T: Send + 'static,
    F: FnOnce() -> ConverterResult<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(correlation_id, err)),
        Err(join_error) => {
            error!(
                correlation_id = %correlation_id,
                error = %join_error,
                "Blocking task failed"
            );
            Err(ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal("Request processing failed"),
            )
            .into_response())
        }
    }
}

/// Unwraps a JSON body, turning extractor rejections into 400 responses.
fn parse_json<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err(ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response())
}

fn error_response(correlation_id: Uuid, err: ConverterError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    ApiErrorResponse::from(err).into_response()
}
