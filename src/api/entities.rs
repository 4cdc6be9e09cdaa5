//! Generic entity-store client.
//!
//! Every widget reads through this layer: one `fetch` per (kind, query),
//! returning plain JSON records. Typed decoding is lenient — a record that
//! fails to decode is skipped with a debug log, never an error for the
//! whole list.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

use super::{send_with_retry, status_error, RetryPolicy};
use crate::error::FetchError;

/// Request timeout for store reads. Widgets would rather show an empty
/// state than hold the dashboard open on a stuck connection.
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// A record kind the store knows how to list.
pub trait Entity: DeserializeOwned {
    /// Kind segment in the store URL, e.g. `/entities/Lead`.
    const KIND: &'static str;
}

impl Entity for crate::types::Task {
    const KIND: &'static str = "Task";
}
impl Entity for crate::types::Appointment {
    const KIND: &'static str = "Appointment";
}
impl Entity for crate::types::Showing {
    const KIND: &'static str = "Showing";
}
impl Entity for crate::types::OpenHouse {
    const KIND: &'static str = "OpenHouse";
}
impl Entity for crate::types::Lead {
    const KIND: &'static str = "Lead";
}
impl Entity for crate::types::Property {
    const KIND: &'static str = "Property";
}
impl Entity for crate::types::Message {
    const KIND: &'static str = "Message";
}
impl Entity for crate::types::NewsArticle {
    const KIND: &'static str = "NewsArticle";
}
impl Entity for crate::types::Campaign {
    const KIND: &'static str = "Campaign";
}
impl Entity for crate::types::UserProfile {
    const KIND: &'static str = "User";
}

/// Field-equality filters plus sort/limit, encoded the way the hosted store
/// expects (`sort=-created_date` for descending).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityQuery {
    pub filters: Vec<(String, String)>,
    pub sort: Option<String>,
    pub limit: Option<u32>,
}

impl EntityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, value: &str) -> Self {
        self.filters.push((field.to_string(), value.to_string()));
        self
    }

    pub fn sort(mut self, key: &str) -> Self {
        self.sort = Some(key.to_string());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Logical query identity for the cache. Filters are sorted so two
    /// widgets building the same query in a different order share one key.
    pub fn cache_key(&self, kind: &str) -> String {
        let mut filters = self.filters.clone();
        filters.sort();
        let mut key = String::from(kind);
        for (field, value) in &filters {
            key.push_str(&format!("|{}={}", field, value));
        }
        if let Some(ref sort) = self.sort {
            key.push_str(&format!("|sort={}", sort));
        }
        if let Some(limit) = self.limit {
            key.push_str(&format!("|limit={}", limit));
        }
        key
    }
}

/// Read access to the hosted entity store.
///
/// Dyn-compatible so widgets can run against an in-memory fake in tests.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn fetch(
        &self,
        kind: &str,
        query: &EntityQuery,
    ) -> Result<Vec<serde_json::Value>, FetchError>;
}

/// Decode raw records, skipping any that fail. The store occasionally holds
/// half-migrated rows; one of them must not blank a widget.
pub fn decode_records<T: Entity>(values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::debug!("skipping undecodable {} record: {}", T::KIND, e);
                None
            }
        })
        .collect()
}

/// Fetch and decode one kind in a single call.
pub async fn fetch_all<T: Entity>(
    store: &dyn EntityStore,
    query: &EntityQuery,
) -> Result<Vec<T>, FetchError> {
    let values = store.fetch(T::KIND, query).await?;
    Ok(decode_records::<T>(values))
}

/// Production store client over HTTP.
#[derive(Debug)]
pub struct HttpEntityStore {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl HttpEntityStore {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::Configuration(format!("bad base URL {}: {}", base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(FetchError::Http)?;
        Ok(Self {
            client,
            base_url,
            api_key,
            retry: RetryPolicy::none(),
        })
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn entity_url(&self, kind: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(&format!("entities/{}", kind))
            .map_err(|e| FetchError::Configuration(format!("bad entity kind {}: {}", kind, e)))
    }
}

#[async_trait]
impl EntityStore for HttpEntityStore {
    async fn fetch(
        &self,
        kind: &str,
        query: &EntityQuery,
    ) -> Result<Vec<serde_json::Value>, FetchError> {
        let url = self.entity_url(kind)?;
        let mut request = self.client.get(url);
        for (field, value) in &query.filters {
            request = request.query(&[(field.as_str(), value.as_str())]);
        }
        if let Some(ref sort) = query.sort {
            request = request.query(&[("sort", sort.as_str())]);
        }
        if let Some(limit) = query.limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = send_with_retry(request, &self.retry).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body: serde_json::Value = response.json().await.map_err(FetchError::Http)?;
        // The store wraps list responses in {"data": [...]} on newer
        // deployments and returns a bare array on older ones.
        match body {
            serde_json::Value::Array(items) => Ok(items),
            serde_json::Value::Object(mut obj) => match obj.remove("data") {
                Some(serde_json::Value::Array(items)) => Ok(items),
                _ => Err(FetchError::Configuration(format!(
                    "unexpected list shape for {}",
                    kind
                ))),
            },
            _ => Err(FetchError::Configuration(format!(
                "unexpected list shape for {}",
                kind
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Lead, LeadStatus};

    #[test]
    fn test_cache_key_is_order_insensitive() {
        let a = EntityQuery::new()
            .filter("status", "active")
            .filter("lead_type", "buyer")
            .sort("-created_date");
        let b = EntityQuery::new()
            .filter("lead_type", "buyer")
            .filter("status", "active")
            .sort("-created_date");
        assert_eq!(a.cache_key("Lead"), b.cache_key("Lead"));
    }

    #[test]
    fn test_cache_key_distinguishes_queries() {
        let all = EntityQuery::new();
        let capped = EntityQuery::new().limit(5);
        assert_ne!(all.cache_key("Task"), capped.cache_key("Task"));
        assert_ne!(all.cache_key("Task"), all.cache_key("Lead"));
    }

    #[test]
    fn test_decode_records_skips_malformed() {
        let values = vec![
            serde_json::json!({"id": "l-1", "name": "Ana Reyes", "score": 82, "status": "qualified"}),
            serde_json::json!({"name": "missing id"}),
            serde_json::json!("not even an object"),
        ];
        let leads: Vec<Lead> = decode_records(values);
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].id, "l-1");
        assert_eq!(leads[0].status, LeadStatus::Qualified);
    }

    #[test]
    fn test_bad_base_url_is_configuration_error() {
        let err = HttpEntityStore::new("not a url", None).unwrap_err();
        assert!(matches!(err, FetchError::Configuration(_)));
    }
}
