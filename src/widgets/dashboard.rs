//! Composite dashboard snapshot.
//!
//! Loads every card concurrently and assembles one payload for the shell.
//! Sections degrade independently; the tagged result only goes to `Error`
//! when the entity store is unreachable outright, and to `Empty` when the
//! store answers but holds no records yet (fresh workspace).

use std::time::Duration;

use chrono::Timelike;
use serde::Serialize;

use crate::api::EntityQuery;
use crate::events::projections::due_today;
use crate::prefs::{parse_blob_or_default, HolidayPrefs, KvStore, QuickLink, QuickLinks};
use crate::state::DashboardState;
use crate::types::{AdviceCard, DayStats, HolidayCard, Lead, Property, Task, UserProfile, WeatherSnapshot};
use crate::util::{greeting, parse_instant};

use super::{advice, agenda, holiday, leads, listings, messages, news, tasks, weather};
use super::agenda::AgendaPayload;
use super::leads::HotLeadsPayload;
use super::listings::ListingsPayload;
use super::messages::MessagesPayload;
use super::news::NewsPayload;
use super::tasks::UrgentTasksPayload;

/// p95 budget for a full dashboard load.
const DASHBOARD_LATENCY_BUDGET_MS: u128 = 300;

const PROFILE_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Serialize)]
#[allow(clippy::large_enum_variant)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DashboardResult {
    Success { data: DashboardData },
    Empty { message: String },
    Error { message: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub greeting: String,
    pub date_line: String,
    pub stats: DayStats,
    pub agenda: AgendaPayload,
    pub urgent_tasks: UrgentTasksPayload,
    pub hot_leads: HotLeadsPayload,
    pub messages: MessagesPayload,
    pub listings: ListingsPayload,
    pub news: NewsPayload,
    pub advice: Option<AdviceCard>,
    pub weather: Option<WeatherSnapshot>,
    pub holiday: Option<HolidayCard>,
    pub quick_links: Vec<QuickLink>,
}

/// Build the full dashboard as of the configured timezone's "now".
pub async fn load(state: &DashboardState, kv: &dyn KvStore) -> DashboardResult {
    let started = std::time::Instant::now();
    let now = state.now();
    let today = now.date();

    let (agenda, urgent_tasks, hot_leads, messages, listings, news, advice, weather) = tokio::join!(
        agenda::load(state, now, agenda::DEFAULT_LIMIT),
        tasks::load(state, today, tasks::DEFAULT_LIMIT),
        leads::load(state, leads::DEFAULT_LIMIT),
        messages::load(state, messages::DEFAULT_LIMIT),
        listings::load(state, listings::DEFAULT_LIMIT),
        news::load(state, news::DEFAULT_LIMIT),
        advice::load(state),
        weather::load(state),
    );

    // Stat counts reuse the widgets' cached queries; only a store that is
    // down across the board turns into the error arm.
    let leads_result = state
        .fetch_cached::<Lead>(
            &EntityQuery::new().sort("-created_date"),
            state.config.ttl_for(leads::WIDGET, Some(Duration::from_secs(300))),
        )
        .await;
    let tasks_result = state
        .fetch_cached::<Task>(
            &EntityQuery::new(),
            state.config.ttl_for(tasks::WIDGET, Some(Duration::from_secs(120))),
        )
        .await;
    let properties_result = state
        .fetch_cached::<Property>(
            &EntityQuery::new(),
            state.config.ttl_for("properties", Some(Duration::from_secs(300))),
        )
        .await;

    if leads_result.is_err() && tasks_result.is_err() && properties_result.is_err() {
        record(started);
        return DashboardResult::Error {
            message: "The entity store is unreachable. Check your connection and refresh."
                .to_string(),
        };
    }

    let stats = DayStats {
        active_leads: leads_result
            .as_deref()
            .map(|leads| leads.iter().filter(|l| !l.status.is_retired()).count())
            .unwrap_or(0),
        tasks_due_today: tasks_result
            .as_deref()
            .map(|tasks| {
                tasks
                    .iter()
                    .filter(|t| {
                        t.due_date
                            .as_deref()
                            .and_then(parse_instant)
                            .map(|due| due_today(due, t.status, today))
                            .unwrap_or(false)
                    })
                    .count()
            })
            .unwrap_or(0),
        unread_messages: messages.total_unread,
        active_listings: properties_result
            .as_deref()
            .map(|props| props.iter().filter(|p| listings::is_active(p)).count())
            .unwrap_or(0),
    };

    let profile = viewer_profile(state).await;
    let holiday_prefs: HolidayPrefs =
        parse_blob_or_default(profile.as_ref().and_then(|p| p.holiday_preferences.as_deref()));
    let quick_links: QuickLinks =
        parse_blob_or_default(profile.as_ref().and_then(|p| p.quick_links.as_deref()));
    let holiday = holiday::load(&holiday_prefs, kv, today);

    let store_sections_empty = agenda.is_empty
        && urgent_tasks.is_empty
        && hot_leads.is_empty
        && messages.is_empty
        && listings.is_empty
        && news.is_empty;

    record(started);

    if store_sections_empty {
        return DashboardResult::Empty {
            message: "Your dashboard will fill in as leads, tasks, and listings are added."
                .to_string(),
        };
    }

    DashboardResult::Success {
        data: DashboardData {
            greeting: greeting(now.hour()).to_string(),
            date_line: now.format("%A, %B %e").to_string(),
            stats,
            agenda,
            urgent_tasks,
            hot_leads,
            messages,
            listings,
            news,
            advice,
            weather,
            holiday,
            quick_links: quick_links.links,
        },
    }
}

async fn viewer_profile(state: &DashboardState) -> Option<UserProfile> {
    let viewer = state.config.viewer_id.clone();
    let query = EntityQuery::new().filter("id", &viewer);
    match state
        .fetch_cached::<UserProfile>(&query, Some(PROFILE_TTL))
        .await
    {
        Ok(profiles) => profiles.into_iter().find(|p| p.id == viewer),
        Err(e) => {
            log::warn!("viewer profile unavailable: {}", e);
            None
        }
    }
}

fn record(started: std::time::Instant) {
    let elapsed_ms = started.elapsed().as_millis();
    crate::latency::record_latency("dashboard", elapsed_ms, DASHBOARD_LATENCY_BUDGET_MS);
    if elapsed_ms > DASHBOARD_LATENCY_BUDGET_MS {
        log::warn!(
            "dashboard load exceeded latency budget: {}ms > {}ms",
            elapsed_ms,
            DASHBOARD_LATENCY_BUDGET_MS
        );
    } else {
        log::debug!("dashboard load completed in {}ms", elapsed_ms);
    }
}
