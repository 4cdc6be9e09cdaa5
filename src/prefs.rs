//! User preference parsing and the dismissal store.
//!
//! Preference blobs ride on the user profile as JSON-encoded strings owned
//! by the frontend. They are parsed defensively: invalid JSON yields the
//! documented default object, never an error — a corrupt blob must not take
//! a widget down.
//!
//! "Dismissed until" state lives in a small local key-value store instead
//! of ambient browser storage; widgets receive it as configuration and
//! their only obligation is read-current-value / write-on-dismiss.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Parse a JSON-encoded preference blob, falling back to the default on
/// any failure (missing blob, invalid JSON, wrong shape).
pub fn parse_blob_or_default<T: DeserializeOwned + Default>(raw: Option<&str>) -> T {
    let Some(raw) = raw else {
        return T::default();
    };
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("preference blob unparsable, using default: {}", e);
            T::default()
        }
    }
}

/// Holiday widget preferences. Default: enabled, US calendar, countdown on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayPrefs {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_true")]
    pub show_countdown: bool,
}

fn default_true() -> bool {
    true
}

fn default_country() -> String {
    "US".to_string()
}

impl Default for HolidayPrefs {
    fn default() -> Self {
        Self {
            enabled: true,
            country: default_country(),
            show_countdown: true,
        }
    }
}

/// User-defined quick links shown on the dashboard. Default: none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickLinks {
    #[serde(default)]
    pub links: Vec<QuickLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickLink {
    pub id: String,
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl QuickLink {
    /// Mint a new link with a locally-generated id.
    pub fn new(label: &str, url: &str, icon: Option<&str>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            label: label.to_string(),
            url: url.to_string(),
            icon: icon.map(String::from),
        }
    }
}

// =============================================================================
// Dismissal store
// =============================================================================

/// Small string key-value store for per-widget dismissal state.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// File-backed store under `~/.nestboard/prefs.json`. A corrupt or missing
/// file opens as an empty store; the next write recreates it.
pub struct FileKvStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileKvStore {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_default()
            .join(".nestboard")
            .join("prefs.json")
    }

    pub fn open(path: PathBuf) -> Self {
        let values = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self {
            path,
            values: RwLock::new(values),
        }
    }

    fn persist(&self) {
        let snapshot = self.values.read().clone();
        let content = match serde_json::to_string_pretty(&snapshot) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("failed to serialize prefs store: {}", e);
                return;
            }
        };
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&self.path, content) {
            log::warn!("failed to write prefs store: {}", e);
        }
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
        self.persist();
    }
}

/// In-memory store for tests and embedding hosts that manage their own
/// persistence.
#[derive(Default)]
pub struct MemoryKvStore {
    values: RwLock<HashMap<String, String>>,
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), value.to_string());
    }
}

/// True while a widget's "dismissed until" date is today or later.
pub fn is_dismissed(store: &dyn KvStore, widget: &str, today: NaiveDate) -> bool {
    store
        .get(&format!("dismissedUntil:{}", widget))
        .as_deref()
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .map(|until| until >= today)
        .unwrap_or(false)
}

/// Record a dismissal through the given date.
pub fn dismiss_until(store: &dyn KvStore, widget: &str, until: NaiveDate) {
    store.set(
        &format!("dismissedUntil:{}", widget),
        &until.format("%Y-%m-%d").to_string(),
    );
}
