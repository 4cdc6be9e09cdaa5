//! Lightweight in-memory latency rollups for widget-load diagnostics.
//!
//! Keeps a bounded sample window per widget so p95 numbers can be surfaced
//! without persistent storage or production UI coupling.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Utc};

const MAX_SAMPLES_PER_WIDGET: usize = 256;

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyWidgetRollup {
    pub widget: String,
    pub sample_count: usize,
    pub p50_ms: u128,
    pub p95_ms: u128,
    pub max_ms: u128,
    pub budget_ms: u128,
    pub budget_violations: u64,
    pub last_recorded_at: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyRollupsPayload {
    pub generated_at: String,
    pub widgets: Vec<LatencyWidgetRollup>,
}

#[derive(Debug, Clone, Default)]
struct WidgetLatencyWindow {
    samples_ms: VecDeque<u128>,
    budget_ms: u128,
    budget_violations: u64,
    last_recorded_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct LatencyRecorder {
    windows: Mutex<HashMap<String, WidgetLatencyWindow>>,
}

impl LatencyRecorder {
    fn global() -> &'static Self {
        static RECORDER: OnceLock<LatencyRecorder> = OnceLock::new();
        RECORDER.get_or_init(Self::default)
    }

    fn record_sample(&self, widget: &str, elapsed_ms: u128, budget_ms: u128) {
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(_) => return,
        };

        let window = windows.entry(widget.to_string()).or_default();
        window.budget_ms = budget_ms;
        if elapsed_ms > budget_ms {
            window.budget_violations += 1;
        }
        if window.samples_ms.len() >= MAX_SAMPLES_PER_WIDGET {
            window.samples_ms.pop_front();
        }
        window.samples_ms.push_back(elapsed_ms);
        window.last_recorded_at = Some(Utc::now());
    }

    fn rollups(&self) -> Vec<LatencyWidgetRollup> {
        let windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(_) => return Vec::new(),
        };

        let mut rollups: Vec<LatencyWidgetRollup> = windows
            .iter()
            .map(|(widget, window)| {
                let mut sorted: Vec<u128> = window.samples_ms.iter().copied().collect();
                sorted.sort_unstable();
                LatencyWidgetRollup {
                    widget: widget.clone(),
                    sample_count: sorted.len(),
                    p50_ms: percentile(&sorted, 50),
                    p95_ms: percentile(&sorted, 95),
                    max_ms: sorted.last().copied().unwrap_or(0),
                    budget_ms: window.budget_ms,
                    budget_violations: window.budget_violations,
                    last_recorded_at: window.last_recorded_at.map(|t| t.to_rfc3339()),
                }
            })
            .collect();
        rollups.sort_by(|a, b| a.widget.cmp(&b.widget));
        rollups
    }
}

fn percentile(sorted: &[u128], pct: usize) -> u128 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (sorted.len() * pct).div_ceil(100);
    sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
}

/// Record one widget load against its budget.
pub fn record_latency(widget: &str, elapsed_ms: u128, budget_ms: u128) {
    LatencyRecorder::global().record_sample(widget, elapsed_ms, budget_ms);
}

/// Snapshot all rollups for a diagnostics surface.
pub fn latency_rollups() -> LatencyRollupsPayload {
    LatencyRollupsPayload {
        generated_at: Utc::now().to_rfc3339(),
        widgets: LatencyRecorder::global().rollups(),
    }
}
