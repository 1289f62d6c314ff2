use serde::Serialize;
use sqlx::FromRow;

/// One row per user in the `subscribers` table.
///
/// `keywords` is stored as a JSON array of strings; `last_sent` and
/// `cadence_secs` are unix seconds so due-ness checks stay integer
/// comparisons in SQL.
#[derive(FromRow, Debug, Clone, Serialize)]
pub struct SubscriberModel {
    pub user_id: String,
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub lookback_days: i64,
    pub destination_ref: Option<String>,
    /// Counts against the global capacity when true.
    pub subscribed: bool,
    /// Gates whether the scheduler will ever poll this subscriber.
    pub updates_enabled: bool,
    pub cadence_secs: i64,
    /// Watermark of the last successful delivery cycle, unix seconds.
    pub last_sent: Option<i64>,
}

impl Default for SubscriberModel {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            keywords: None,
            location: None,
            country: None,
            lookback_days: 4,
            destination_ref: None,
            subscribed: false,
            updates_enabled: false,
            cadence_secs: 4 * 24 * 60 * 60,
            last_sent: None,
        }
    }
}

impl SubscriberModel {
    /// Decoded keyword list. Absent or undecodable keywords read as empty.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    pub fn encode_keywords(keywords: &[String]) -> String {
        serde_json::to_string(keywords).unwrap_or_else(|_| "[]".to_string())
    }

    /// Country code used for queries, defaulting to `us` when unset.
    pub fn country_or_default(&self) -> &str {
        self.country.as_deref().unwrap_or("us")
    }
}

/// Row defaults applied when a setter creates a subscriber on first use.
#[derive(Debug, Clone, Copy)]
pub struct SubscriberDefaults {
    pub lookback_days: i64,
    pub cadence_secs: i64,
}
