//! Recent-listings widget: active properties, newest first.

use std::time::Duration;

use serde::Serialize;

use crate::api::EntityQuery;
use crate::state::DashboardState;
use crate::types::{ListingCard, Property};
use crate::util::{format_price, parse_instant};

pub const WIDGET: &str = "listings";
pub const DEFAULT_LIMIT: usize = 4;
const DEFAULT_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsPayload {
    pub listings: Vec<ListingCard>,
    pub is_empty: bool,
}

pub(crate) fn is_active(property: &Property) -> bool {
    property
        .status
        .as_deref()
        .map(|s| s.eq_ignore_ascii_case("active"))
        .unwrap_or(false)
}

pub async fn load(state: &DashboardState, limit: usize) -> ListingsPayload {
    let ttl = state.config.ttl_for(WIDGET, Some(DEFAULT_TTL));
    let properties: Vec<Property> = match state.fetch_cached(&EntityQuery::new(), ttl).await {
        Ok(properties) => properties,
        Err(e) => {
            log::warn!("listings unavailable: {}", e);
            Vec::new()
        }
    };

    let mut cards: Vec<ListingCard> = properties
        .iter()
        .filter(|p| is_active(p))
        .map(|p| ListingCard {
            id: p.id.clone(),
            address: p.address.clone(),
            price_label: p
                .price
                .map(format_price)
                .unwrap_or_else(|| "Price on request".to_string()),
            photo_url: p.photo_url.clone(),
            beds: p.beds,
            baths: p.baths,
            listed_at: p.listing_date.as_deref().and_then(parse_instant),
        })
        .collect();

    // Newest first; undated listings sort last rather than being dropped —
    // a listing without a date is still a listing.
    cards.sort_by(|a, b| match (&b.listed_at, &a.listed_at) {
        (Some(bt), Some(at)) => bt.cmp(at).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => a.id.cmp(&b.id),
    });
    cards.truncate(limit);

    ListingsPayload {
        is_empty: cards.is_empty(),
        listings: cards,
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

    fn listing(id: &str, status: &str, listed: Option<&str>, price: f64) -> serde_json::Value {
        let mut v = serde_json::json!({
            "id": id, "address": format!("{} Main St", id),
            "price": price, "status": status
        });
        if let Some(listed) = listed {
            v["listing_date"] = serde_json::json!(listed);
        }
        v
    }

    #[tokio::test]
    async fn test_active_only_newest_first() {
        let store = Arc::new(FakeStore::default());
        store.put(
            "Property",
            vec![
                listing("old", "active", Some("2026-01-10"), 500_000.0),
                listing("sold", "sold", Some("2026-03-01"), 700_000.0),
                listing("new", "Active", Some("2026-03-10"), 650_000.0),
            ],
        );
        let payload = load(&state(store), 4).await;
        let ids: Vec<&str> = payload.listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_price_formatting_and_fallback() {
        let store = Arc::new(FakeStore::default());
        let mut no_price = listing("mystery", "active", Some("2026-03-01"), 0.0);
        no_price.as_object_mut().unwrap().remove("price");
        store.put(
            "Property",
            vec![listing("l-1", "active", Some("2026-03-02"), 685_000.0), no_price],
        );
        let payload = load(&state(store), 4).await;
        assert_eq!(payload.listings[0].price_label, "$685,000");
        assert_eq!(payload.listings[1].price_label, "Price on request");
    }

    #[tokio::test]
    async fn test_undated_listings_sort_last() {
        let store = Arc::new(FakeStore::default());
        store.put(
            "Property",
            vec![
                listing("undated", "active", None, 400_000.0),
                listing("dated", "active", Some("2026-03-01"), 500_000.0),
            ],
        );
        let payload = load(&state(store), 4).await;
        let ids: Vec<&str> = payload.listings.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["dated", "undated"]);
    }

    #[tokio::test]
    async fn test_empty_and_failure_states() {
        let empty = Arc::new(FakeStore::default());
        assert!(load(&state(empty), 4).await.is_empty);

        let failing = Arc::new(FakeStore::default());
        failing.fail_kind("Property");
        assert!(load(&state(failing), 4).await.is_empty);
    }
}
