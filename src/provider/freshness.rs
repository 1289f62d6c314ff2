//! Filters raw postings down to the recent ones worth delivering.

use chrono::DateTime;
use chrono::Duration;
use chrono::NaiveDateTime;
use chrono::Utc;
use log::warn;

use super::model::Posting;
use super::model::RawPosting;

/// Timestamp pattern the provider uses, e.g. `2026-08-12T09:30:00.000000Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Keeps postings strictly newer than `now - lookback_days`, at most `cap` of
/// them, preserving provider order. Postings with a missing or unparsable
/// timestamp are dropped individually.
pub fn filter_recent(
    raw: Vec<RawPosting>,
    lookback_days: i64,
    cap: usize,
    now: DateTime<Utc>,
) -> Vec<Posting> {
    let cutoff = now - Duration::days(lookback_days);
    let mut recent = Vec::new();

    for posting in raw {
        if recent.len() >= cap {
            break;
        }
        let Some(raw_ts) = posting.posted_at.as_deref() else {
            continue;
        };
        let posted_at = match NaiveDateTime::parse_from_str(raw_ts, TIMESTAMP_FORMAT) {
            Ok(naive) => naive.and_utc(),
            Err(e) => {
                warn!("Invalid posting timestamp `{raw_ts}`: {e}");
                continue;
            }
        };
        if posted_at > cutoff {
            recent.push(Posting {
                title: posting.title,
                employer: posting.employer,
                apply_link: posting.apply_link,
                posted_at,
            });
        }
    }

    recent
}
