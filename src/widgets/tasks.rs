//! Urgent-tasks widget: overdue first, then due today.

use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::EntityQuery;
use crate::events::normalize::normalize_task;
use crate::events::projections::{days_overdue, due_today, overdue};
use crate::events::rank::rank_urgent;
use crate::state::DashboardState;
use crate::types::{Task, UrgentTask};

pub const WIDGET: &str = "tasks";
pub const DEFAULT_LIMIT: usize = 5;
const DEFAULT_TTL: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentTasksPayload {
    pub tasks: Vec<UrgentTask>,
    pub overdue_count: usize,
    pub is_empty: bool,
}

pub async fn load(state: &DashboardState, today: NaiveDate, limit: usize) -> UrgentTasksPayload {
    let ttl = state.config.ttl_for(WIDGET, Some(DEFAULT_TTL));
    let tasks: Vec<Task> = match state.fetch_cached(&EntityQuery::new(), ttl).await {
        Ok(tasks) => tasks,
        Err(e) => {
            log::warn!("urgent tasks unavailable: {}", e);
            Vec::new()
        }
    };
    let properties = super::property_address_map(state).await;

    let mut rows: Vec<UrgentTask> = Vec::new();
    let mut overdue_count = 0usize;
    for task in &tasks {
        let Some(ev) = normalize_task(task, &properties) else {
            continue;
        };
        let is_overdue = overdue(ev.timestamp, task.status, today);
        if !is_overdue && !due_today(ev.timestamp, task.status, today) {
            continue;
        }
        if is_overdue {
            overdue_count += 1;
        }
        rows.push(UrgentTask {
            id: ev.id,
            title: ev.title,
            subtitle: ev.subtitle,
            due: ev.timestamp,
            is_overdue,
            days_overdue: days_overdue(ev.timestamp, today),
        });
    }

    let tasks = rank_urgent(rows, limit);
    UrgentTasksPayload {
        is_empty: tasks.is_empty(),
        overdue_count,
        tasks,
    }
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

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[tokio::test]
    async fn test_overdue_scenario_only_past_task() {
        let store = Arc::new(FakeStore::default());
        store.put(
            "Task",
            vec![
                serde_json::json!({"id": "1", "title": "Old", "due_date": "2024-01-01", "status": "pending"}),
                serde_json::json!({"id": "2", "title": "Far", "due_date": "2099-01-01", "status": "pending"}),
            ],
        );
        let payload = load(&state(store), today(), 5).await;
        assert_eq!(payload.tasks.len(), 1);
        assert_eq!(payload.tasks[0].id, "1");
        assert!(payload.tasks[0].is_overdue);
        assert_eq!(payload.overdue_count, 1);
    }

    #[tokio::test]
    async fn test_most_overdue_ranks_first() {
        let store = Arc::new(FakeStore::default());
        store.put(
            "Task",
            vec![
                serde_json::json!({"id": "due-today", "title": "a", "due_date": "2024-06-01", "status": "pending"}),
                serde_json::json!({"id": "over-10", "title": "b", "due_date": "2024-05-22", "status": "pending"}),
                serde_json::json!({"id": "over-40", "title": "c", "due_date": "2024-04-22", "status": "pending"}),
            ],
        );
        let payload = load(&state(store), today(), 5).await;
        let ids: Vec<&str> = payload.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["over-40", "over-10", "due-today"]);
        assert_eq!(payload.tasks[0].days_overdue, 40);
        assert_eq!(payload.tasks[2].days_overdue, 0);
    }

    #[tokio::test]
    async fn test_completed_and_cancelled_never_urgent() {
        let store = Arc::new(FakeStore::default());
        store.put(
            "Task",
            vec![
                serde_json::json!({"id": "1", "title": "Done", "due_date": "2024-01-01", "status": "completed"}),
                serde_json::json!({"id": "2", "title": "Dropped", "due_date": "2024-06-01", "status": "cancelled"}),
            ],
        );
        let payload = load(&state(store), today(), 5).await;
        assert!(payload.is_empty);
        assert_eq!(payload.overdue_count, 0);
    }

    #[tokio::test]
    async fn test_store_failure_means_empty_state() {
        let store = Arc::new(FakeStore::default());
        store.fail_kind("Task");
        let payload = load(&state(store), today(), 5).await;
        assert!(payload.is_empty);
    }

    #[tokio::test]
    async fn test_cap_applies_after_global_sort() {
        let store = Arc::new(FakeStore::default());
        let mut tasks: Vec<serde_json::Value> = (0..8)
            .map(|i| {
                serde_json::json!({
                    "id": format!("today-{}", i), "title": "x",
                    "due_date": "2024-06-01", "status": "pending"
                })
            })
            .collect();
        tasks.push(
            serde_json::json!({"id": "oldest", "title": "x", "due_date": "2024-01-01", "status": "in_progress"}),
        );
        store.put("Task", tasks);

        let payload = load(&state(store), today(), 3).await;
        assert_eq!(payload.tasks.len(), 3);
        // The single overdue task must survive the cap.
        assert_eq!(payload.tasks[0].id, "oldest");
    }
}
