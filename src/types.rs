use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Raw entity records (deserialized from the hosted entity store)
// =============================================================================
//
// The store emits snake_case fields and ISO-8601 date strings. Every field
// beyond `id` is defaulted so one sparse record never poisons a whole list.

/// Lifecycle status shared by the event-like kinds (tasks, appointments,
/// showings, open houses).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    InProgress,
    Scheduled,
    Confirmed,
    Active,
    Completed,
    Cancelled,
    #[serde(other)]
    #[default]
    Unknown,
}

impl RecordStatus {
    /// True for records that must never appear in upcoming/urgent projections.
    pub fn is_closed(self) -> bool {
        matches!(self, RecordStatus::Completed | RecordStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Negotiating,
    UnderContract,
    Converted,
    Closed,
    Lost,
    #[serde(other)]
    #[default]
    Unknown,
}

impl LeadStatus {
    /// Retired leads are excluded from the hot-leads projection.
    pub fn is_retired(self) -> bool {
        matches!(
            self,
            LeadStatus::Converted | LeadStatus::Closed | LeadStatus::Lost
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadType {
    Buyer,
    Seller,
    #[serde(other)]
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
    #[serde(other)]
    Unset,
}

impl TaskPriority {
    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low priority",
            TaskPriority::Medium => "Medium priority",
            TaskPriority::High => "High priority",
            TaskPriority::Urgent => "Urgent",
            TaskPriority::Unset => "No priority",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Plain date ("2026-03-14") or full ISO datetime.
    #[serde(default)]
    pub due_date: Option<String>,
    /// Optional time of day ("14:30"); absent means whole-day.
    #[serde(default)]
    pub due_time: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Showing {
    pub id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenHouse {
    pub id: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
    #[serde(default)]
    pub property_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// 0–100; the hot-leads floor is 70.
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub lead_type: LeadType,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub listing_date: Option<String>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub beds: Option<u32>,
    #[serde(default)]
    pub baths: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub recipient_id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sent_count: u64,
    #[serde(default)]
    pub open_count: u64,
    #[serde(default)]
    pub click_count: u64,
    #[serde(default)]
    pub created_date: Option<String>,
}

/// The signed-in agent's profile record. Preference blobs are JSON-encoded
/// strings owned by the frontend; `crate::prefs` parses them defensively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub holiday_preferences: Option<String>,
    #[serde(default)]
    pub quick_links: Option<String>,
}

// =============================================================================
// Derived display types (serialized to the renderer, camelCase)
// =============================================================================

/// Which event-like kind a display event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Task,
    Appointment,
    Showing,
    OpenHouse,
}

impl EventKind {
    pub fn label(self) -> &'static str {
        match self {
            EventKind::Task => "Task",
            EventKind::Appointment => "Appointment",
            EventKind::Showing => "Showing",
            EventKind::OpenHouse => "Open House",
        }
    }
}

/// The common event shape every widget ranks over. Ephemeral: rebuilt on
/// every snapshot, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEvent {
    pub id: String,
    pub kind: EventKind,
    pub timestamp: NaiveDateTime,
    pub title: String,
    pub subtitle: String,
    pub is_all_day: bool,
}

/// An urgency-ranked task row (overdue or due today).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgentTask {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub due: NaiveDateTime,
    pub is_overdue: bool,
    /// Whole days past due; 0 for due-today rows.
    pub days_overdue: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotLead {
    pub id: String,
    pub name: String,
    pub score: f64,
    pub lead_type: LeadType,
    pub source: Option<String>,
    pub created_at: NaiveDateTime,
}

/// One row per conversation in the unread-messages widget.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub property_id: Option<String>,
    pub counterpart_id: String,
    pub sender_name: String,
    pub property_label: String,
    pub unread_count: usize,
    pub latest_at: NaiveDateTime,
    pub snippet: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingCard {
    pub id: String,
    pub address: String,
    pub price_label: String,
    pub photo_url: Option<String>,
    pub beds: Option<u32>,
    pub baths: Option<f64>,
    pub listed_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: String,
    pub headline: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<NaiveDateTime>,
}

/// One span of advice text; bold spans come from the `**text**` convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupSegment {
    pub text: String,
    pub bold: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceCard {
    pub segments: Vec<MarkupSegment>,
    pub metrics: Vec<AdviceMetric>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceMetric {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temp_f: f64,
    pub condition: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayCard {
    pub name: String,
    pub date: chrono::NaiveDate,
    pub days_until: i64,
    pub show_countdown: bool,
}

/// Headline counts for the stat row at the top of the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub active_leads: usize,
    pub tasks_due_today: usize,
    pub unread_messages: usize,
    pub active_listings: usize,
}
