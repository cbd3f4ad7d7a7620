//! Leave breakdown logic for the Leave Converter.
//!
//! This module contains the roster index, which maps employee numbers to
//! weekday hour allotments, and the expander, which turns leave transactions
//! into per-weekday leave records.

mod expander;
mod roster_index;

pub use expander::{
    BreakdownResult, BreakdownSummary, expand_leave, expand_leave_with_summary, is_partial_day,
};
pub use roster_index::{RosterEntry, RosterIndex};
