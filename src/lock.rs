//! Time lock display helpers
//!
//! The unlock date is derived client-side for display only and is never
//! written back to the contract.

use std::fmt;

use alloy::primitives::U256;
use chrono::{Local, TimeZone};

/// Lock period enforced by the vault contract (one week)
pub const LOCK_DURATION_SECS: u64 = 604_800;

pub const NO_DEPOSIT_TEXT: &str = "No deposit found";
pub const NOT_AVAILABLE_TEXT: &str = "N/A";

/// Local date-time layout, e.g. `11/14/2023, 10:13:20 PM`
pub const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

pub fn unlock_timestamp(deposit_timestamp: U256) -> U256 {
    deposit_timestamp.saturating_add(U256::from(LOCK_DURATION_SECS))
}

/// Render epoch seconds in the given time zone
///
/// Falls back to the raw number for instants chrono cannot represent.
pub fn format_timestamp<Tz>(timestamp: U256, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    u64::try_from(timestamp)
        .ok()
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(|secs| tz.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

pub fn format_local(timestamp: U256) -> String {
    format_timestamp(timestamp, &Local)
}
