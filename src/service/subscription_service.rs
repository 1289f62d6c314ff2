//! Command handlers for the per-user subscription settings.
//!
//! The external command front-end calls these synchronously per request; each
//! handler validates its input, consults the capacity gate when the mutation
//! would newly activate a subscriber, and returns a short human-readable
//! confirmation for the requester.

use std::sync::Arc;

use chrono::Utc;
use log::info;

use crate::config::Config;
use crate::countries;
use crate::database::Database;
use crate::database::model::SubscriberModel;
use crate::database::table::AdmitOutcome;
use crate::delivery::Messenger;
use crate::service::error::ServiceError;
use crate::service::job_update_service::JobUpdateService;

pub struct SubscriptionService {
    db: Arc<Database>,
    messenger: Arc<dyn Messenger>,
    job_update: Arc<JobUpdateService>,
    config: Arc<Config>,
}

impl SubscriptionService {
    pub fn new(
        db: Arc<Database>,
        messenger: Arc<dyn Messenger>,
        job_update: Arc<JobUpdateService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            db,
            messenger,
            job_update,
            config,
        }
    }

    /// Saves the comma-separated keyword list. This is the mutation that
    /// creates a subscriber, so it is the one gated on capacity.
    pub async fn set_keywords(&self, user_id: &str, text: &str) -> Result<String, ServiceError> {
        let keywords: Vec<String> = text
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();
        if keywords.is_empty() {
            return Err(ServiceError::validation(
                "No keywords provided. Enter keywords separated by commas, e.g. ai, ml, internship.",
            ));
        }

        let admitted = self
            .db
            .subscribers_table
            .try_admit(user_id, self.config.max_subscribers)
            .await?;
        if admitted == AdmitOutcome::CapacityExceeded {
            info!("Rejected user {user_id}: subscriber capacity reached");
            return Err(ServiceError::CapacityExceeded);
        }

        let encoded = SubscriberModel::encode_keywords(&keywords);
        self.db
            .subscribers_table
            .set_keywords(user_id, Some(&encoded))
            .await?;

        let mut msg = "Keywords saved:\n".to_string();
        for keyword in &keywords {
            msg.push_str(&format!("• {keyword}\n"));
        }
        Ok(msg)
    }

    pub async fn show_keywords(&self, user_id: &str) -> Result<String, ServiceError> {
        let keywords = self
            .db
            .subscribers_table
            .select_optional(user_id)
            .await?
            .map(|row| row.keyword_list())
            .unwrap_or_default();
        if keywords.is_empty() {
            return Ok("You haven't set any keywords yet.".to_string());
        }
        Ok(format!("Your saved keywords:\n• {}", keywords.join("\n• ")))
    }

    pub async fn clear_keywords(&self, user_id: &str) -> Result<String, ServiceError> {
        self.db.subscribers_table.set_keywords(user_id, None).await?;
        Ok("Your keywords have been cleared.".to_string())
    }

    /// Only the first token (before any comma or whitespace) is kept.
    pub async fn set_location(&self, user_id: &str, text: &str) -> Result<String, ServiceError> {
        let location = text
            .split(',')
            .next()
            .and_then(|part| part.split_whitespace().next())
            .ok_or_else(|| ServiceError::validation("No location provided."))?
            .to_string();
        self.db
            .subscribers_table
            .set_location(user_id, Some(&location))
            .await?;
        Ok(format!("Location saved: **{location}**"))
    }

    pub async fn clear_location(&self, user_id: &str) -> Result<String, ServiceError> {
        self.db.subscribers_table.set_location(user_id, None).await?;
        Ok("Your location has been cleared.".to_string())
    }

    pub async fn show_location(&self, user_id: &str) -> Result<String, ServiceError> {
        let location = self
            .db
            .subscribers_table
            .select_optional(user_id)
            .await?
            .and_then(|row| row.location);
        match location {
            Some(location) => Ok(format!("Your saved location: **{location}**")),
            None => Ok("You haven't set a location yet.".to_string()),
        }
    }

    pub async fn set_country(&self, user_id: &str, code: &str) -> Result<String, ServiceError> {
        let code = code.trim().to_lowercase();
        let Some(name) = countries::name(&code) else {
            return Err(ServiceError::validation(format!(
                "Invalid country code. Please choose from the following:\n{}",
                countries::supported_list()
            )));
        };
        self.db
            .subscribers_table
            .set_country(user_id, Some(&code))
            .await?;
        Ok(format!("Country set to: **{name}** ({code})"))
    }

    pub async fn show_country(&self, user_id: &str) -> Result<String, ServiceError> {
        let country = self
            .db
            .subscribers_table
            .select_optional(user_id)
            .await?
            .and_then(|row| row.country);
        match country {
            Some(code) => {
                let name = countries::name(&code).unwrap_or(&code);
                Ok(format!("Your job search country: **{name}** ({code})"))
            }
            None => Ok("You haven't set a country yet. Use setcountry to pick one.".to_string()),
        }
    }

    /// The destination must resolve and accept sends at set time; it is
    /// re-checked at every delivery since it can go stale.
    pub async fn set_destination(
        &self,
        user_id: &str,
        destination: &str,
    ) -> Result<String, ServiceError> {
        if !self.messenger.resolve(destination).await
            || !self.messenger.can_send(destination).await
        {
            return Err(ServiceError::validation(
                "I can't send messages to that destination.",
            ));
        }
        self.db
            .subscribers_table
            .set_destination(user_id, Some(destination))
            .await?;
        Ok(format!(
            "Destination set! You'll receive job results at {destination}."
        ))
    }

    pub async fn clear_destination(&self, user_id: &str) -> Result<String, ServiceError> {
        self.db
            .subscribers_table
            .set_destination(user_id, None)
            .await?;
        Ok("Your job results destination has been cleared.".to_string())
    }

    pub async fn show_destination(&self, user_id: &str) -> Result<String, ServiceError> {
        let destination = self
            .db
            .subscribers_table
            .select_optional(user_id)
            .await?
            .and_then(|row| row.destination_ref);
        let Some(destination) = destination else {
            return Ok("You haven't set a destination yet. Use setdestination to pick one.".to_string());
        };
        if !self.messenger.resolve(&destination).await {
            return Ok(
                "The previously set destination no longer exists. Please set a new one with setdestination."
                    .to_string(),
            );
        }
        Ok(format!("Your job results will be sent to: {destination}"))
    }

    pub async fn set_lookback_days(&self, user_id: &str, days: i64) -> Result<String, ServiceError> {
        if days < self.config.min_lookback_days {
            return Err(ServiceError::validation(format!(
                "Lookback must be at least {} day(s).",
                self.config.min_lookback_days
            )));
        }
        self.db
            .subscribers_table
            .set_lookback_days(user_id, days)
            .await?;
        Ok(format!(
            "You'll receive postings from the last {days} day(s)."
        ))
    }

    /// Immediate fetch-and-deliver. On success, activates periodic updates
    /// and seeds the watermark so the scheduler starts a fresh cadence.
    pub async fn search_now(&self, user_id: &str) -> Result<String, ServiceError> {
        let Some(row) = self.db.subscribers_table.select_optional(user_id).await? else {
            return Err(ServiceError::validation(
                "You haven't set any keywords yet. Use setkeywords first.",
            ));
        };
        if row.keyword_list().is_empty() {
            return Err(ServiceError::validation(
                "You haven't set any keywords yet. Use setkeywords first.",
            ));
        }
        if !row.subscribed {
            return Err(ServiceError::validation(
                "You aren't subscribed. Use setkeywords first.",
            ));
        }
        if row.destination_ref.is_none() {
            return Err(ServiceError::validation(
                "You haven't set a destination to receive job results. Use setdestination first.",
            ));
        }
        if row.updates_enabled {
            return Ok(
                "You have already started job updates. You will receive results automatically."
                    .to_string(),
            );
        }

        let now = Utc::now();
        self.job_update.run_cycle(&row, now).await?;

        self.db
            .subscribers_table
            .set_flags(user_id, None, Some(true))
            .await?;
        self.db
            .subscribers_table
            .set_watermark(user_id, now.timestamp())
            .await?;

        info!("Enabled periodic updates for user {user_id}");
        Ok(
            "Done! You will now receive job results at your destination automatically."
                .to_string(),
        )
    }

    /// Clears both flags; the row and its settings are kept so resubscribing
    /// is cheap. Only `subscribed = true` rows count against capacity.
    pub async fn unsubscribe(&self, user_id: &str) -> Result<String, ServiceError> {
        self.db
            .subscribers_table
            .set_flags(user_id, Some(false), Some(false))
            .await?;
        Ok("You have been unsubscribed from job updates.".to_string())
    }

    pub fn ping(&self) -> String {
        "Pong!".to_string()
    }
}
