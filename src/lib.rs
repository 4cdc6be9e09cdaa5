//! Nestboard — the data layer of a real-estate CRM dashboard.
//!
//! Widgets (leads, tasks, agenda, messages, listings, news, analytics,
//! advice, weather, holidays) read entity records from a hosted store
//! through one cached client, derive their display aggregates, and hand
//! serializable payloads to whatever shell renders them. No widget failure
//! is fatal: every error path degrades to an empty or default state.

pub mod api;
pub mod cache;
pub mod error;
pub mod events;
pub mod latency;
pub mod navigate;
pub mod prefs;
pub mod refresh;
pub mod state;
pub mod threads;
pub mod types;
pub mod util;
pub mod widgets;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::FetchError;
pub use state::{load_config, Config, DashboardState};

/// Initialize env_logger for hosts that don't bring their own logger.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
