//! Per-kind record normalizers.
//!
//! Each normalizer maps one raw record into `DisplayEvent`, resolving the
//! subtitle through the caller's property lookup. All of them fail soft: a
//! missing or unparsable date yields `None`, and the aggregator treats
//! "no event produced" as a valid, silent outcome.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::types::{Appointment, DisplayEvent, EventKind, OpenHouse, Showing, Task};
use crate::util::{parse_instant, parse_time_of_day};

/// Combine a date field with an optional time-of-day field.
///
/// Returns the instant plus the all-day flag: a record with no usable
/// time-of-day occurs at the start of its date and renders without a clock
/// time. A datetime packed into the date field carries its own time.
fn combine(date_raw: &str, time_raw: Option<&str>) -> Option<(NaiveDateTime, bool)> {
    let base = parse_instant(date_raw)?;
    if let Some(time) = time_raw.and_then(parse_time_of_day) {
        return Some((base.date().and_time(time), false));
    }
    let date_carries_time = date_raw.contains('T') || date_raw.contains(':');
    Some((base, !date_carries_time))
}

fn property_subtitle(
    property_id: Option<&str>,
    properties: &HashMap<String, String>,
) -> Option<String> {
    property_id.and_then(|id| properties.get(id).cloned())
}

pub fn normalize_task(task: &Task, properties: &HashMap<String, String>) -> Option<DisplayEvent> {
    let (timestamp, is_all_day) = combine(task.due_date.as_deref()?, task.due_time.as_deref())?;
    let subtitle = property_subtitle(task.property_id.as_deref(), properties)
        .unwrap_or_else(|| task.priority.label().to_string());
    Some(DisplayEvent {
        id: task.id.clone(),
        kind: EventKind::Task,
        timestamp,
        title: task.title.clone(),
        subtitle,
        is_all_day,
    })
}

pub fn normalize_appointment(
    appt: &Appointment,
    properties: &HashMap<String, String>,
) -> Option<DisplayEvent> {
    let (timestamp, is_all_day) = combine(appt.date.as_deref()?, appt.time.as_deref())?;
    let title = if appt.title.is_empty() {
        match appt.client_name.as_deref() {
            Some(client) => format!("Appointment with {}", client),
            None => "Appointment".to_string(),
        }
    } else {
        appt.title.clone()
    };
    let subtitle = property_subtitle(appt.property_id.as_deref(), properties)
        .or_else(|| appt.client_name.clone())
        .unwrap_or_else(|| "Appointment".to_string());
    Some(DisplayEvent {
        id: appt.id.clone(),
        kind: EventKind::Appointment,
        timestamp,
        title,
        subtitle,
        is_all_day,
    })
}

pub fn normalize_showing(
    showing: &Showing,
    properties: &HashMap<String, String>,
) -> Option<DisplayEvent> {
    let (timestamp, is_all_day) = combine(showing.date.as_deref()?, showing.time.as_deref())?;
    let title = match showing.client_name.as_deref() {
        Some(client) => format!("Showing with {}", client),
        None => "Property showing".to_string(),
    };
    let subtitle = property_subtitle(showing.property_id.as_deref(), properties)
        .unwrap_or_else(|| "Property showing".to_string());
    Some(DisplayEvent {
        id: showing.id.clone(),
        kind: EventKind::Showing,
        timestamp,
        title,
        subtitle,
        is_all_day,
    })
}

pub fn normalize_open_house(
    open_house: &OpenHouse,
    properties: &HashMap<String, String>,
) -> Option<DisplayEvent> {
    let (timestamp, is_all_day) = combine(
        open_house.date.as_deref()?,
        open_house.start_time.as_deref(),
    )?;
    let subtitle = property_subtitle(open_house.property_id.as_deref(), properties)
        .unwrap_or_else(|| "Open house".to_string());
    Some(DisplayEvent {
        id: open_house.id.clone(),
        kind: EventKind::OpenHouse,
        timestamp,
        title: "Open house".to_string(),
        subtitle,
        is_all_day,
    })
}
