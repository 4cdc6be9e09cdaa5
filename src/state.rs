//! Shared dashboard state: configuration, the entity store handle, the
//! query cache, and the refresh bus.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::api::entities::{decode_records, Entity};
use crate::api::functions::{FunctionGateway, HttpFunctionGateway};
use crate::api::{EntityQuery, EntityStore, HttpEntityStore};
use crate::cache::QueryCache;
use crate::error::FetchError;
use crate::refresh::RefreshBus;

/// Configuration stored in `~/.nestboard/config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(alias = "base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// The signed-in agent's user id; message threads group around it.
    pub viewer_id: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// City for the weather widget; omitted means no weather card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Per-widget staleness overrides, seconds. Widgets keep their own
    /// defaults; an entry of 0 disables caching for that widget.
    #[serde(default)]
    pub staleness_secs: HashMap<String, u64>,
}

fn default_timezone() -> String {
    "America/New_York".to_string()
}

impl Config {
    /// Parse the configured timezone, falling back to Eastern.
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone
            .parse()
            .unwrap_or(chrono_tz::America::New_York)
    }

    /// Effective TTL for a widget: the configured override, else `default`.
    pub fn ttl_for(&self, widget: &str, default: Option<Duration>) -> Option<Duration> {
        match self.staleness_secs.get(widget) {
            Some(secs) => Some(Duration::from_secs(*secs)),
            None => default,
        }
    }
}

/// Load configuration from `~/.nestboard/config.json`.
pub fn load_config() -> Result<Config, String> {
    let path = dirs::home_dir()
        .ok_or("No home directory")?
        .join(".nestboard")
        .join("config.json");
    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Everything the widgets share. One instance per dashboard session.
pub struct DashboardState {
    pub config: Config,
    store: Arc<dyn EntityStore>,
    functions: Option<Arc<dyn FunctionGateway>>,
    pub cache: QueryCache,
    pub refresh: RefreshBus,
}

impl DashboardState {
    /// Wire up production HTTP clients from config.
    pub fn new(config: Config) -> Result<Self, FetchError> {
        let store = HttpEntityStore::new(&config.api_base_url, config.api_key.clone())?;
        let functions =
            HttpFunctionGateway::new(&config.api_base_url, config.api_key.clone())?;
        Ok(Self {
            config,
            store: Arc::new(store),
            functions: Some(Arc::new(functions)),
            cache: QueryCache::new(),
            refresh: RefreshBus::new(),
        })
    }

    /// Inject a store (and optionally a function gateway) directly. Used by
    /// tests and by hosts that bring their own transport.
    pub fn with_store(
        config: Config,
        store: Arc<dyn EntityStore>,
        functions: Option<Arc<dyn FunctionGateway>>,
    ) -> Self {
        Self {
            config,
            store,
            functions,
            cache: QueryCache::new(),
            refresh: RefreshBus::new(),
        }
    }

    pub fn functions(&self) -> Option<&dyn FunctionGateway> {
        self.functions.as_deref()
    }

    /// Wall-clock "now" in the configured timezone. All projection math
    /// runs on this.
    pub fn now(&self) -> NaiveDateTime {
        chrono::Utc::now().with_timezone(&self.config.tz()).naive_local()
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date()
    }

    /// Fetch one kind through the query cache, decoding leniently.
    pub async fn fetch_cached<T: Entity>(
        &self,
        query: &EntityQuery,
        ttl: Option<Duration>,
    ) -> Result<Vec<T>, FetchError> {
        let key = query.cache_key(T::KIND);
        let values = self
            .cache
            .get_or_fetch(&key, ttl, || self.store.fetch(T::KIND, query))
            .await?;
        Ok(decode_records::<T>(values))
    }

    /// Manual refresh: drop every cached query and tick the bus so mounted
    /// widgets refetch.
    pub fn request_refresh(&self) {
        self.cache.invalidate_all();
        let listeners = self.refresh.publish();
        log::debug!("dashboard refresh requested ({} listeners)", listeners);
    }
}
