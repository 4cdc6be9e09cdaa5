//! Serverless function invocation.
//!
//! A handful of widgets read from narrow RPC-style endpoints instead of
//! entity lists (AI advice, weather). The only contract this layer keeps
//! with them: any transport failure or malformed payload means "do not
//! display" — the caller gets `None`, never an error.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{send_with_retry, status_error, RetryPolicy};
use crate::error::FetchError;
use crate::types::{AdviceMetric, WeatherSnapshot};

/// Invokes named functions on the hosted backend.
#[async_trait]
pub trait FunctionGateway: Send + Sync {
    async fn invoke(
        &self,
        name: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, FetchError>;
}

pub struct HttpFunctionGateway {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl HttpFunctionGateway {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| FetchError::Configuration(format!("bad base URL {}: {}", base_url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .map_err(FetchError::Http)?;
        Ok(Self {
            client,
            base_url,
            api_key,
            retry: RetryPolicy::none(),
        })
    }
}

#[async_trait]
impl FunctionGateway for HttpFunctionGateway {
    async fn invoke(
        &self,
        name: &str,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, FetchError> {
        let url = self
            .base_url
            .join(&format!("functions/{}", name))
            .map_err(|e| FetchError::Configuration(format!("bad function name {}: {}", name, e)))?;
        let mut request = self.client.post(url).json(&payload);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }
        let response = send_with_retry(request, &self.retry).await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        response.json().await.map_err(FetchError::Http)
    }
}

/// Raw `generateDailyAdvice` payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AdvicePayload {
    #[serde(default)]
    pub should_display: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub metrics: Vec<AdviceMetric>,
}

/// Fetch today's AI-generated advice. `None` means "show nothing" — the
/// backend said so, the call failed, or the payload didn't parse.
pub async fn daily_advice(gateway: &dyn FunctionGateway) -> Option<AdvicePayload> {
    let value = match gateway
        .invoke("generateDailyAdvice", serde_json::json!({}))
        .await
    {
        Ok(v) => v,
        Err(e) => {
            log::debug!("daily advice unavailable: {}", e);
            return None;
        }
    };
    let payload: AdvicePayload = match serde_json::from_value(value) {
        Ok(p) => p,
        Err(e) => {
            log::debug!("daily advice payload malformed: {}", e);
            return None;
        }
    };
    if !payload.should_display || payload.message.trim().is_empty() {
        return None;
    }
    Some(payload)
}

/// Fetch current weather for the configured city. Same contract as advice:
/// `None` hides the widget.
pub async fn weather(gateway: &dyn FunctionGateway, city: &str) -> Option<WeatherSnapshot> {
    let value = match gateway
        .invoke("getWeather", serde_json::json!({ "city": city }))
        .await
    {
        Ok(v) => v,
        Err(e) => {
            log::debug!("weather unavailable: {}", e);
            return None;
        }
    };
    match serde_json::from_value(value) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::debug!("weather payload malformed: {}", e);
            None
        }
    }
}
