//! Daily-advice widget.
//!
//! The backend decides whether there is anything worth saying; this side
//! only splits the `**bold**` markup convention into render-ready segments.
//! Any failure along the way hides the card.

use std::sync::OnceLock;

use regex::Regex;

use crate::api::functions::daily_advice;
use crate::state::DashboardState;
use crate::types::{AdviceCard, MarkupSegment};

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"))
}

/// Split `**bold**` spans out of an advice message. Unbalanced markers are
/// left as literal text.
pub fn parse_markup(message: &str) -> Vec<MarkupSegment> {
    let mut segments = Vec::new();
    let mut last_end = 0;
    for caps in bold_re().captures_iter(message) {
        let whole = caps.get(0).expect("match");
        if whole.start() > last_end {
            segments.push(MarkupSegment {
                text: message[last_end..whole.start()].to_string(),
                bold: false,
            });
        }
        segments.push(MarkupSegment {
            text: caps.get(1).expect("group").as_str().to_string(),
            bold: true,
        });
        last_end = whole.end();
    }
    if last_end < message.len() {
        segments.push(MarkupSegment {
            text: message[last_end..].to_string(),
            bold: false,
        });
    }
    segments
}

/// `None` means no card today: the backend declined, the call failed, or
/// no function gateway is configured.
pub async fn load(state: &DashboardState) -> Option<AdviceCard> {
    let gateway = state.functions()?;
    let payload = daily_advice(gateway).await?;
    Some(AdviceCard {
        segments: parse_markup(&payload.message),
        metrics: payload.metrics,
    })
}
