//! Named temporal policies.
//!
//! A projection decides whether one record belongs in a view, given a
//! reference instant. Records with no parsed instant never reach these
//! functions — the normalizer already dropped them — so "a record with a
//! missing date is in none of the three projections" holds by construction.

use chrono::{NaiveDate, NaiveDateTime};

use crate::types::RecordStatus;

/// In the "upcoming" view: from the start of the current day onward,
/// excluding completed/cancelled records.
pub fn upcoming_from_now(instant: NaiveDateTime, status: RecordStatus, now: NaiveDateTime) -> bool {
    if status.is_closed() {
        return false;
    }
    instant >= now.date().and_time(chrono::NaiveTime::MIN)
}

/// Due on the same calendar day as `today`, excluding closed records.
pub fn due_today(instant: NaiveDateTime, status: RecordStatus, today: NaiveDate) -> bool {
    !status.is_closed() && instant.date() == today
}

/// Strictly before the start of `today`, excluding closed records.
pub fn overdue(instant: NaiveDateTime, status: RecordStatus, today: NaiveDate) -> bool {
    !status.is_closed() && instant.date() < today
}

/// Whole days a record is past due. Zero for anything due today or later.
pub fn days_overdue(instant: NaiveDateTime, today: NaiveDate) -> i64 {
    (today - instant.date()).num_days().max(0)
}
