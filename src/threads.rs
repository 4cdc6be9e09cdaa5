//! Unread-message thread grouping.
//!
//! Threads are derived, never stored: a flat list of unread messages
//! collapses into one row per conversation, keyed by (property, counterpart).
//! The counterpart is whichever participant is not the current viewer.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::types::{Message, ThreadSummary};
use crate::util::{parse_instant, snippet};

const SNIPPET_CHARS: usize = 80;

/// Id-to-display-name and id-to-address lookups, supplied by the caller.
/// Missing entries render placeholders, never an error.
pub struct ThreadLookups<'a> {
    pub user_names: &'a HashMap<String, String>,
    pub property_addresses: &'a HashMap<String, String>,
}

/// Collapse unread messages into ranked conversation rows.
///
/// Each group's representative is its latest message; the row's count is
/// the whole group, not 1. A message whose `created_date` fails to parse is
/// dropped — an undated message must not rank a conversation.
pub fn group_unread(
    messages: &[Message],
    viewer_id: &str,
    lookups: &ThreadLookups<'_>,
    limit: usize,
) -> Vec<ThreadSummary> {
    let mut groups: HashMap<(Option<String>, String), Vec<(&Message, NaiveDateTime)>> =
        HashMap::new();

    for message in messages {
        if message.is_read {
            continue;
        }
        let Some(at) = message.created_date.as_deref().and_then(parse_instant) else {
            continue;
        };
        let counterpart = if message.sender_id == viewer_id {
            message.recipient_id.clone()
        } else {
            message.sender_id.clone()
        };
        groups
            .entry((message.property_id.clone(), counterpart))
            .or_default()
            .push((message, at));
    }

    let mut rows: Vec<ThreadSummary> = groups
        .into_iter()
        .map(|((property_id, counterpart_id), members)| {
            let unread_count = members.len();
            let (representative, latest_at) = members
                .into_iter()
                .max_by(|(a, at_a), (b, at_b)| at_a.cmp(at_b).then_with(|| a.id.cmp(&b.id)))
                .expect("group is never empty");

            let sender_name = lookups
                .user_names
                .get(&representative.sender_id)
                .cloned()
                .unwrap_or_else(|| "Unknown Sender".to_string());
            let property_label = property_id
                .as_deref()
                .and_then(|id| lookups.property_addresses.get(id).cloned())
                .unwrap_or_else(|| "General Message".to_string());

            ThreadSummary {
                property_id,
                counterpart_id,
                sender_name,
                property_label,
                unread_count,
                latest_at,
                snippet: snippet(&representative.content, SNIPPET_CHARS),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.latest_at
            .cmp(&a.latest_at)
            .then_with(|| a.counterpart_id.cmp(&b.counterpart_id))
            .then_with(|| a.property_id.cmp(&b.property_id))
    });
    rows.truncate(limit);
    rows
}
