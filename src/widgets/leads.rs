//! Hot-leads widget: the most recent high-score, still-open leads.

use std::time::Duration;

use serde::Serialize;

use crate::api::EntityQuery;
use crate::state::DashboardState;
use crate::types::{HotLead, Lead};
use crate::util::parse_instant;

pub const WIDGET: &str = "leads";
pub const DEFAULT_LIMIT: usize = 5;
const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Leads at or above this score count as hot.
pub const HOT_SCORE_FLOOR: f64 = 70.0;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotLeadsPayload {
    pub leads: Vec<HotLead>,
    pub is_empty: bool,
}

pub async fn load(state: &DashboardState, limit: usize) -> HotLeadsPayload {
    let ttl = state.config.ttl_for(WIDGET, Some(DEFAULT_TTL));
    let query = EntityQuery::new().sort("-created_date");
    let leads: Vec<Lead> = match state.fetch_cached(&query, ttl).await {
        Ok(leads) => leads,
        Err(e) => {
            log::warn!("hot leads unavailable: {}", e);
            Vec::new()
        }
    };

    let mut hot: Vec<HotLead> = leads
        .iter()
        .filter(|l| l.score >= HOT_SCORE_FLOOR && !l.status.is_retired())
        .filter_map(|l| {
            let created_at = l.created_date.as_deref().and_then(parse_instant)?;
            Some(HotLead {
                id: l.id.clone(),
                name: l.name.clone(),
                score: l.score,
                lead_type: l.lead_type,
                source: l.source.clone(),
                created_at,
            })
        })
        .collect();

    // Newest first, regardless of store ordering.
    hot.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    hot.truncate(limit);

    HotLeadsPayload {
        is_empty: hot.is_empty(),
        leads: hot,
    }
}
