//! Merge, order, cap.
//!
//! Ordering is deterministic regardless of input order: ties on the
//! instant break on record id. Truncation happens after the global sort,
//! never per kind — a capped list must reflect true global order.

use crate::types::{DisplayEvent, UrgentTask};

/// Merge per-kind event lists into one ascending ranked list, soonest
/// first, capped at `limit`. Empty input yields an empty list.
pub fn rank_upcoming(groups: Vec<Vec<DisplayEvent>>, limit: usize) -> Vec<DisplayEvent> {
    let mut merged: Vec<DisplayEvent> = groups.into_iter().flatten().collect();
    merged.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    });
    merged.truncate(limit);
    merged
}

/// Order urgency rows: every overdue row before every due-today row; the
/// most overdue first. Overdue instants are strictly before today's, so a
/// single ascending sort on the due instant realizes both rules.
pub fn rank_urgent(mut rows: Vec<UrgentTask>, limit: usize) -> Vec<UrgentTask> {
    rows.sort_by(|a, b| a.due.cmp(&b.due).then_with(|| a.id.cmp(&b.id)));
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventKind;
    use chrono::NaiveDate;

    fn ev(id: &str, day: u32, hour: u32) -> DisplayEvent {
        DisplayEvent {
            id: id.to_string(),
            kind: EventKind::Task,
            timestamp: NaiveDate::from_ymd_opt(2026, 3, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            title: id.to_string(),
            subtitle: String::new(),
            is_all_day: false,
        }
    }

    fn urgent(id: &str, day: u32, days_overdue: i64) -> UrgentTask {
        UrgentTask {
            id: id.to_string(),
            title: id.to_string(),
            subtitle: String::new(),
            due: NaiveDate::from_ymd_opt(2026, 3, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            is_overdue: days_overdue > 0,
            days_overdue,
        }
    }

    #[test]
    fn test_truncates_after_global_sort() {
        // Kind A holds the three latest events, kind B the two soonest. A
        // per-kind cap would surface A's rows; the global cap must not.
        let kind_a = vec![ev("a1", 20, 9), ev("a2", 21, 9), ev("a3", 22, 9)];
        let kind_b = vec![ev("b1", 14, 9), ev("b2", 15, 9)];
        let ranked = rank_upcoming(vec![kind_a, kind_b], 2);
        let ids: Vec<&str> = ranked.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2"]);
    }

    #[test]
    fn test_output_never_exceeds_limit() {
        let events: Vec<DisplayEvent> = (0..20).map(|i| ev(&format!("e{}", i), 14, 9)).collect();
        for limit in [0, 1, 3, 5, 50] {
            assert!(rank_upcoming(vec![events.clone()], limit).len() <= limit);
        }
    }

    #[test]
    fn test_equal_timestamps_break_on_id() {
        let forward = rank_upcoming(vec![vec![ev("x", 14, 9), ev("a", 14, 9)]], 5);
        let reversed = rank_upcoming(vec![vec![ev("a", 14, 9), ev("x", 14, 9)]], 5);
        let forward_ids: Vec<&str> = forward.iter().map(|e| e.id.as_str()).collect();
        let reversed_ids: Vec<&str> = reversed.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(forward_ids, vec!["a", "x"]);
        assert_eq!(forward_ids, reversed_ids);
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert!(rank_upcoming(vec![], 5).is_empty());
        assert!(rank_upcoming(vec![vec![], vec![]], 5).is_empty());
        assert!(rank_urgent(vec![], 5).is_empty());
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let groups = vec![
            vec![ev("t1", 16, 9), ev("t2", 14, 12)],
            vec![ev("s1", 14, 12), ev("s2", 15, 8)],
        ];
        let first = rank_upcoming(groups.clone(), 3);
        let second = rank_upcoming(groups, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_urgent_orders_most_overdue_first() {
        let rows = vec![
            urgent("today-1", 14, 0),
            urgent("over-2", 12, 2),
            urgent("over-5", 9, 5),
        ];
        let ranked = rank_urgent(rows, 5);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["over-5", "over-2", "today-1"]);
    }
}
