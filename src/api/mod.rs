//! HTTP API module for the Leave Converter.
//!
//! This module provides the REST endpoints for leave breakdowns, roster
//! management and login.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{MAX_UPLOAD_BYTES, UNMATCHED_HEADER, create_router};
pub use request::{
    BreakdownRequest, EmployeeQuery, EmployeeRequest, EmployeeUpdateRequest, LoginRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
