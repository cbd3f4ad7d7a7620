//! Leave Breakdown Converter
//!
//! This crate converts payroll leave transactions into per-weekday leave hour
//! records. Each approved leave range is expanded into one record per working
//! day, using the employee's scheduled hours for that weekday, and written to
//! a workbook for import into time tracking.
//!
//! The breakdown core lives in [`breakdown`]. Workbook import and export,
//! roster and credential storage, the HTTP API and configuration surround it.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod breakdown;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod logging;
pub mod models;
pub mod roster;
pub mod store;
