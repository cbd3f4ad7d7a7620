//! Core data models for the Leave Converter.
//!
//! This module contains the domain models shared by the breakdown core and
//! its collaborators.

mod daily_leave_record;
mod employee;
mod leave_transaction;
mod user;

pub use daily_leave_record::{DailyLeaveRecord, weekday_name};
pub use employee::{Employee, WeekdayHours};
pub use leave_transaction::LeaveTransaction;
pub use user::{UserAccount, UserProfile};
