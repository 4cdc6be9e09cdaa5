use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a store timestamp into a wall-clock instant.
///
/// The store is inconsistent about formats: full RFC 3339, naive ISO
/// datetimes, and plain dates all occur. A plain date parses to the start
/// of that day. Returns `None` for anything else — callers drop the record
/// rather than defaulting to "now" (a bad date must not rank first).
pub fn parse_instant(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a time-of-day field ("14:30", "14:30:00", "2:30 PM").
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .or_else(|_| NaiveTime::parse_from_str(raw, "%I:%M %p"))
        .ok()
}

/// Time-of-day greeting for the dashboard header.
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 17 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

/// Format a listing price for card display: 1250000.0 → "$1,250,000".
pub fn format_price(price: f64) -> String {
    let whole = price.round().max(0.0) as u64;
    let digits = whole.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("${}", out)
}

/// First letters of up to two name words: "Sarah Chen" → "SC".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|w| w.chars().next())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Trim a message body to a display snippet, on a char boundary.
pub fn snippet(content: &str, max_chars: usize) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}
