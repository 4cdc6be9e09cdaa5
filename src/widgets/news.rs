//! Market-news widget.
//!
//! An empty article list renders the explicit empty state. There is no
//! demo-headline fallback: substituting canned rows would hide a broken
//! feed from the agent.

use std::time::Duration;

use serde::Serialize;

use crate::api::EntityQuery;
use crate::state::DashboardState;
use crate::types::{NewsArticle, NewsItem};
use crate::util::parse_instant;

pub const WIDGET: &str = "news";
pub const DEFAULT_LIMIT: usize = 3;

/// News never auto-refetches; the manual refresh broadcast is the only way
/// to reload it.
const DEFAULT_TTL: Option<Duration> = None;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPayload {
    pub items: Vec<NewsItem>,
    pub is_empty: bool,
}

pub async fn load(state: &DashboardState, limit: usize) -> NewsPayload {
    let ttl = state.config.ttl_for(WIDGET, DEFAULT_TTL);
    let articles: Vec<NewsArticle> = match state.fetch_cached(&EntityQuery::new(), ttl).await {
        Ok(articles) => articles,
        Err(e) => {
            log::warn!("news unavailable: {}", e);
            Vec::new()
        }
    };

    let mut items: Vec<NewsItem> = articles
        .iter()
        .map(|a| NewsItem {
            id: a.id.clone(),
            headline: a.headline.clone(),
            source: a.source.clone(),
            url: a.url.clone(),
            published_at: a.published_date.as_deref().and_then(parse_instant),
        })
        .collect();

    items.sort_by(|a, b| match (&b.published_at, &a.published_at) {
        (Some(bt), Some(at)) => bt.cmp(at).then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Greater,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (None, None) => a.id.cmp(&b.id),
    });
    items.truncate(limit);

    NewsPayload {
        is_empty: items.is_empty(),
        items,
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

    #[tokio::test]
    async fn test_newest_first_capped() {
        let store = Arc::new(FakeStore::default());
        let articles: Vec<serde_json::Value> = (1..=5)
            .map(|day| {
                serde_json::json!({
                    "id": format!("n-{}", day),
                    "headline": format!("Headline {}", day),
                    "published_date": format!("2026-03-{:02}", day)
                })
            })
            .collect();
        store.put("NewsArticle", articles);

        let payload = load(&state(store), 3).await;
        let ids: Vec<&str> = payload.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["n-5", "n-4", "n-3"]);
    }

    #[tokio::test]
    async fn test_empty_feed_is_explicit_empty_state() {
        let store = Arc::new(FakeStore::default());
        let payload = load(&state(store), 3).await;
        assert!(payload.is_empty);
        assert!(payload.items.is_empty());
    }

    #[tokio::test]
    async fn test_feed_failure_is_empty_state() {
        let store = Arc::new(FakeStore::default());
        store.fail_kind("NewsArticle");
        let payload = load(&state(store), 3).await;
        assert!(payload.is_empty);
    }
}
