//! Widget payload builders.
//!
//! One module per dashboard card. Every builder is a pure async function of
//! (shared state, clock) → serializable payload, and every failure path
//! degrades to the widget's empty state: a dead store, a half-migrated
//! record, or a malformed blob dims one card, never the dashboard.
//!
//! Staleness is declarative per widget — each module owns a default TTL and
//! `Config::staleness_secs` overrides it by widget name.

pub mod advice;
pub mod agenda;
pub mod dashboard;
pub mod holiday;
pub mod leads;
pub mod listings;
pub mod messages;
pub mod news;
pub mod performance;
pub mod tasks;
pub mod weather;

use std::collections::HashMap;
use std::time::Duration;

use crate::api::EntityQuery;
use crate::state::DashboardState;
use crate::types::Property;

const PROPERTY_MAP_TTL: Duration = Duration::from_secs(300);

/// Property id → address, shared by every widget that resolves subtitles.
/// A failed fetch yields an empty map; normalizers fall back to their
/// status/priority strings.
pub(crate) async fn property_address_map(state: &DashboardState) -> HashMap<String, String> {
    let ttl = state.config.ttl_for("properties", Some(PROPERTY_MAP_TTL));
    match state.fetch_cached::<Property>(&EntityQuery::new(), ttl).await {
        Ok(properties) => properties
            .into_iter()
            .map(|p| (p.id, p.address))
            .collect(),
        Err(e) => {
            log::warn!("property lookup unavailable: {}", e);
            HashMap::new()
        }
    }
}
