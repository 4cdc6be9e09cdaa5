//! In-memory entity store for widget and state tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::api::{EntityQuery, EntityStore};
use crate::error::FetchError;

/// Serves canned JSON per kind. Ignores query parameters — widgets must
/// not depend on store-side ordering or filtering for correctness.
#[derive(Default)]
pub struct FakeStore {
    data: RwLock<HashMap<String, Vec<serde_json::Value>>>,
    fail: RwLock<HashMap<String, bool>>,
    call_count: AtomicUsize,
}

impl FakeStore {
    pub fn put(&self, kind: &str, values: Vec<serde_json::Value>) {
        self.data.write().insert(kind.to_string(), values);
    }

    /// Make fetches for one kind fail, to exercise degradation paths.
    pub fn fail_kind(&self, kind: &str) {
        self.fail.write().insert(kind.to_string(), true);
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

/// Fixed-response function gateway.
pub struct FakeGateway {
    response: Option<serde_json::Value>,
}

impl FakeGateway {
    pub fn with_response(response: serde_json::Value) -> Self {
        Self {
            response: Some(response),
        }
    }

    pub fn failing() -> Self {
        Self { response: None }
    }
}

#[async_trait]
impl crate::api::functions::FunctionGateway for FakeGateway {
    async fn invoke(
        &self,
        _name: &str,
        _payload: serde_json::Value,
    ) -> Result<serde_json::Value, FetchError> {
        match &self.response {
            Some(v) => Ok(v.clone()),
            None => Err(FetchError::Timeout(20)),
        }
    }
}

#[async_trait]
impl EntityStore for FakeStore {
    async fn fetch(
        &self,
        kind: &str,
        _query: &EntityQuery,
    ) -> Result<Vec<serde_json::Value>, FetchError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail.read().get(kind).copied().unwrap_or(false) {
            return Err(FetchError::Timeout(15));
        }
        Ok(self.data.read().get(kind).cloned().unwrap_or_default())
    }
}
