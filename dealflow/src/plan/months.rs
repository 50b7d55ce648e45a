//! Contract-month token generation.

use crate::config::Epoch;
use chrono::{Datelike, NaiveDate, Utc};

/// Formats a (year, month) pair as a contract-month token (`YYYYMM`).
#[must_use]
pub fn month_token(year: i32, month: u32) -> String {
    format!("{year}{month:02}")
}

/// Enumerates month tokens from the epoch through `today`'s month inclusive.
///
/// The sequence is strictly ascending with no gaps; the same calendar day
/// always yields the same sequence. Returns an empty sequence when `today`
/// precedes the epoch.
#[must_use]
pub fn month_range(epoch: Epoch, today: NaiveDate) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut year = epoch.year;
    let mut month = epoch.month;
    while (year, month) <= (today.year(), today.month()) {
        tokens.push(month_token(year, month));
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    tokens
}

/// Month tokens from the epoch through the current calendar month.
#[must_use]
pub fn month_range_now(epoch: Epoch) -> Vec<String> {
    month_range(epoch, Utc::now().date_naive())
}
