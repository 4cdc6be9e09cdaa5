//! Upcoming-events widget.
//!
//! Merges tasks, appointments, showings, and open houses into one ranked
//! "coming up" list. Each kind degrades independently: a failed fetch for
//! one kind logs and contributes nothing.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::api::EntityQuery;
use crate::events::normalize::{
    normalize_appointment, normalize_open_house, normalize_showing, normalize_task,
};
use crate::events::projections::upcoming_from_now;
use crate::events::rank::rank_upcoming;
use crate::state::DashboardState;
use crate::types::{Appointment, DisplayEvent, OpenHouse, Showing, Task};

pub const WIDGET: &str = "agenda";
pub const DEFAULT_LIMIT: usize = 5;
const DEFAULT_TTL: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaPayload {
    pub events: Vec<DisplayEvent>,
    pub is_empty: bool,
}

/// Build the upcoming list as of `now` (wall clock, configured timezone).
pub async fn load(state: &DashboardState, now: NaiveDateTime, limit: usize) -> AgendaPayload {
    let ttl = state.config.ttl_for(WIDGET, Some(DEFAULT_TTL));
    let properties = super::property_address_map(state).await;
    let query = EntityQuery::new();

    let tasks: Vec<Task> = fetch_kind(state, &query, ttl).await;
    let appointments: Vec<Appointment> = fetch_kind(state, &query, ttl).await;
    let showings: Vec<Showing> = fetch_kind(state, &query, ttl).await;
    let open_houses: Vec<OpenHouse> = fetch_kind(state, &query, ttl).await;

    let groups = vec![
        collect(&tasks, &properties, |t, p| {
            normalize_task(t, p).filter(|ev| upcoming_from_now(ev.timestamp, t.status, now))
        }),
        collect(&appointments, &properties, |a, p| {
            normalize_appointment(a, p).filter(|ev| upcoming_from_now(ev.timestamp, a.status, now))
        }),
        collect(&showings, &properties, |s, p| {
            normalize_showing(s, p).filter(|ev| upcoming_from_now(ev.timestamp, s.status, now))
        }),
        collect(&open_houses, &properties, |o, p| {
            normalize_open_house(o, p).filter(|ev| upcoming_from_now(ev.timestamp, o.status, now))
        }),
    ];

    let events = rank_upcoming(groups, limit);
    AgendaPayload {
        is_empty: events.is_empty(),
        events,
    }
}

async fn fetch_kind<T: crate::api::entities::Entity>(
    state: &DashboardState,
    query: &EntityQuery,
    ttl: Option<Duration>,
) -> Vec<T> {
    match state.fetch_cached::<T>(query, ttl).await {
        Ok(records) => records,
        Err(e) => {
            log::warn!("agenda: {} unavailable: {}", T::KIND, e);
            Vec::new()
        }
    }
}

fn collect<T>(
    records: &[T],
    properties: &HashMap<String, String>,
    normalize: impl Fn(&T, &HashMap<String, String>) -> Option<DisplayEvent>,
) -> Vec<DisplayEvent> {
    records
        .iter()
        .filter_map(|r| normalize(r, properties))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Config, DashboardState};
    use crate::testutil::FakeStore;
    use std::sync::Arc;

    fn state(store: Arc<FakeStore>) -> DashboardState {
        let config: Config = serde_json::from_str(
            r#"{"apiBaseUrl": "https://store.example.com/", "viewerId": "agent-1"}"#,
        )
        .unwrap();
        DashboardState::with_store(config, store, None)
    }

    fn now() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_merges_kinds_in_global_order() {
        let store = Arc::new(FakeStore::default());
        store.put(
            "Task",
            vec![serde_json::json!({
                "id": "t-1", "title": "Send contract",
                "due_date": "2026-03-16", "status": "pending"
            })],
        );
        store.put(
            "Showing",
            vec![serde_json::json!({
                "id": "s-1", "date": "2026-03-14", "time": "11:00",
                "status": "confirmed", "client_name": "Ana Reyes"
            })],
        );
        store.put(
            "OpenHouse",
            vec![serde_json::json!({
                "id": "oh-1", "date": "2026-03-15", "start_time": "13:00",
                "status": "scheduled"
            })],
        );

        let payload = load(&state(store), now(), 5).await;
        let ids: Vec<&str> = payload.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["s-1", "oh-1", "t-1"]);
        assert!(!payload.is_empty);
    }

    #[tokio::test]
    async fn test_cancelled_and_past_excluded() {
        let store = Arc::new(FakeStore::default());
        store.put(
            "Appointment",
            vec![
                serde_json::json!({
                    "id": "a-cancelled", "title": "Tour", "date": "2026-03-20",
                    "time": "10:00", "status": "cancelled"
                }),
                serde_json::json!({
                    "id": "a-past", "title": "Old tour", "date": "2026-03-01",
                    "time": "10:00", "status": "scheduled"
                }),
                serde_json::json!({
                    "id": "a-ok", "title": "Tour", "date": "2026-03-20",
                    "time": "10:00", "status": "scheduled"
                }),
            ],
        );
        let payload = load(&state(store), now(), 5).await;
        let ids: Vec<&str> = payload.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a-ok"]);
    }

    #[tokio::test]
    async fn test_unparsable_dates_dropped_silently() {
        let store = Arc::new(FakeStore::default());
        store.put(
            "Task",
            vec![
                serde_json::json!({"id": "t-bad", "title": "??", "due_date": "soonish", "status": "pending"}),
                serde_json::json!({"id": "t-none", "title": "??", "status": "pending"}),
            ],
        );
        let payload = load(&state(store), now(), 5).await;
        assert!(payload.is_empty);
    }

    #[tokio::test]
    async fn test_empty_sources_yield_empty_state() {
        let store = Arc::new(FakeStore::default());
        let payload = load(&state(store), now(), 5).await;
        assert!(payload.is_empty);
        assert!(payload.events.is_empty());
    }

    #[tokio::test]
    async fn test_failing_kind_degrades_not_blanks() {
        let store = Arc::new(FakeStore::default());
        store.fail_kind("Task");
        store.put(
            "Showing",
            vec![serde_json::json!({
                "id": "s-1", "date": "2026-03-15", "time": "10:00", "status": "confirmed"
            })],
        );
        let payload = load(&state(store), now(), 5).await;
        assert_eq!(payload.events.len(), 1);
    }

    #[tokio::test]
    async fn test_same_snapshot_same_output() {
        let store = Arc::new(FakeStore::default());
        store.put(
            "Task",
            vec![
                serde_json::json!({"id": "t-2", "title": "B", "due_date": "2026-03-15", "status": "pending"}),
                serde_json::json!({"id": "t-1", "title": "A", "due_date": "2026-03-15", "status": "pending"}),
            ],
        );
        let state = state(store);
        let first = load(&state, now(), 5).await;
        let second = load(&state, now(), 5).await;
        assert_eq!(first.events, second.events);
        // Equal timestamps break deterministically on id.
        assert_eq!(first.events[0].id, "t-1");
    }

    #[tokio::test]
    async fn test_respects_limit() {
        let store = Arc::new(FakeStore::default());
        let tasks: Vec<serde_json::Value> = (0..10)
            .map(|i| {
                serde_json::json!({
                    "id": format!("t-{}", i), "title": "Task",
                    "due_date": "2026-03-20", "status": "pending"
                })
            })
            .collect();
        store.put("Task", tasks);
        let payload = load(&state(store), now(), 3).await;
        assert_eq!(payload.events.len(), 3);
    }
}
