//! Chart rollups for the analytics widgets.
//!
//! Plain O(n) aggregation over in-memory lists: lead volume grouped by
//! (month, lead type), conversion and campaign rates as guarded
//! percentages, and the average active listing price. The charting library
//! renders; this module only counts.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::api::EntityQuery;
use crate::state::DashboardState;
use crate::types::{Campaign, Lead, LeadStatus, LeadType, Property};
use crate::util::parse_instant;

pub const WIDGET: &str = "performance";
const DEFAULT_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformancePayload {
    pub lead_volume: Vec<LeadVolumePoint>,
    pub conversion_rate_pct: f64,
    pub campaigns: Vec<CampaignRates>,
    pub avg_active_listing_price: f64,
    pub is_empty: bool,
}

/// One bar in the lead-volume chart, keyed by (month, lead type).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadVolumePoint {
    pub month: String,
    pub lead_type: LeadType,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRates {
    pub id: String,
    pub name: String,
    pub open_rate_pct: f64,
    pub click_rate_pct: f64,
}

/// Percentage with a zero-denominator guard, rounded to one decimal.
fn pct(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64 * 1000.0).round() / 10.0
}

fn lead_type_order(lead_type: LeadType) -> u8 {
    match lead_type {
        LeadType::Buyer => 0,
        LeadType::Seller => 1,
        LeadType::Unknown => 2,
    }
}

fn lead_volume(leads: &[Lead]) -> Vec<LeadVolumePoint> {
    let mut by_key: HashMap<(String, LeadType), usize> = HashMap::new();
    for lead in leads {
        let Some(created) = lead.created_date.as_deref().and_then(parse_instant) else {
            continue;
        };
        let month = created.format("%Y-%m").to_string();
        *by_key.entry((month, lead.lead_type)).or_default() += 1;
    }
    let mut points: Vec<LeadVolumePoint> = by_key
        .into_iter()
        .map(|((month, lead_type), count)| LeadVolumePoint {
            month,
            lead_type,
            count,
        })
        .collect();
    points.sort_by(|a, b| {
        a.month
            .cmp(&b.month)
            .then_with(|| lead_type_order(a.lead_type).cmp(&lead_type_order(b.lead_type)))
    });
    points
}

pub async fn load(state: &DashboardState) -> PerformancePayload {
    let ttl = state.config.ttl_for(WIDGET, Some(DEFAULT_TTL));
    let query = EntityQuery::new();

    let leads: Vec<Lead> = state.fetch_cached(&query, ttl).await.unwrap_or_else(|e| {
        log::warn!("performance: leads unavailable: {}", e);
        Vec::new()
    });
    let campaigns: Vec<Campaign> = state.fetch_cached(&query, ttl).await.unwrap_or_else(|e| {
        log::warn!("performance: campaigns unavailable: {}", e);
        Vec::new()
    });
    let properties: Vec<Property> = state.fetch_cached(&query, ttl).await.unwrap_or_else(|e| {
        log::warn!("performance: properties unavailable: {}", e);
        Vec::new()
    });

    let converted = leads
        .iter()
        .filter(|l| l.status == LeadStatus::Converted)
        .count() as u64;
    let conversion_rate_pct = pct(converted, leads.len() as u64);

    let campaign_rates: Vec<CampaignRates> = campaigns
        .iter()
        .map(|c| CampaignRates {
            id: c.id.clone(),
            name: c.name.clone(),
            open_rate_pct: pct(c.open_count, c.sent_count),
            click_rate_pct: pct(c.click_count, c.sent_count),
        })
        .collect();

    let active_prices: Vec<f64> = properties
        .iter()
        .filter(|p| super::listings::is_active(p))
        .filter_map(|p| p.price)
        .collect();
    let avg_active_listing_price = if active_prices.is_empty() {
        0.0
    } else {
        active_prices.iter().sum::<f64>() / active_prices.len() as f64
    };

    let volume = lead_volume(&leads);
    PerformancePayload {
        is_empty: leads.is_empty() && campaigns.is_empty() && active_prices.is_empty(),
        lead_volume: volume,
        conversion_rate_pct,
        campaigns: campaign_rates,
        avg_active_listing_price,
    }
}
