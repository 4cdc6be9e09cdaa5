//! Unread-messages widget: one row per conversation.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::api::EntityQuery;
use crate::state::DashboardState;
use crate::threads::{group_unread, ThreadLookups};
use crate::types::{Message, ThreadSummary, UserProfile};

pub const WIDGET: &str = "messages";
pub const DEFAULT_LIMIT: usize = 4;
const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesPayload {
    pub threads: Vec<ThreadSummary>,
    pub total_unread: usize,
    pub is_empty: bool,
}

pub async fn load(state: &DashboardState, limit: usize) -> MessagesPayload {
    let ttl = state.config.ttl_for(WIDGET, Some(DEFAULT_TTL));
    let viewer = state.config.viewer_id.clone();

    let query = EntityQuery::new()
        .filter("recipient_id", &viewer)
        .filter("is_read", "false");
    let messages: Vec<Message> = match state.fetch_cached(&query, ttl).await {
        Ok(messages) => messages,
        Err(e) => {
            log::warn!("messages unavailable: {}", e);
            Vec::new()
        }
    };

    // The store filter is advisory; count and group only what actually is
    // unread and addressed to the viewer.
    let unread: Vec<Message> = messages
        .into_iter()
        .filter(|m| !m.is_read && m.recipient_id == viewer)
        .collect();
    let total_unread = unread.len();

    let user_names = user_name_map(state).await;
    let property_addresses = super::property_address_map(state).await;
    let lookups = ThreadLookups {
        user_names: &user_names,
        property_addresses: &property_addresses,
    };

    let threads = group_unread(&unread, &viewer, &lookups, limit);
    MessagesPayload {
        is_empty: threads.is_empty(),
        total_unread,
        threads,
    }
}

async fn user_name_map(state: &DashboardState) -> HashMap<String, String> {
    let ttl = state.config.ttl_for("users", Some(Duration::from_secs(600)));
    match state.fetch_cached::<UserProfile>(&EntityQuery::new(), ttl).await {
        Ok(users) => users
            .into_iter()
            .filter_map(|u| u.full_name.map(|name| (u.id, name)))
            .collect(),
        Err(e) => {
            log::warn!("user lookup unavailable: {}", e);
            HashMap::new()
        }
    }
}
