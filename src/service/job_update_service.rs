//! One fetch → filter → deliver cycle for a single subscriber.

use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use log::debug;

use crate::config::Config;
use crate::database::model::SubscriberModel;
use crate::delivery::Deliverer;
use crate::delivery::DeliveryOutcome;
use crate::provider::JSearchClient;
use crate::provider::SearchCriteria;
use crate::provider::freshness::filter_recent;
use crate::service::error::ServiceError;

/// Runs the provider query and delivery for one subscriber. Shared by the
/// poll scheduler and the on-demand search command.
pub struct JobUpdateService {
    provider: Arc<JSearchClient>,
    deliverer: Deliverer,
    config: Arc<Config>,
}

impl JobUpdateService {
    pub fn new(provider: Arc<JSearchClient>, deliverer: Deliverer, config: Arc<Config>) -> Self {
        Self {
            provider,
            deliverer,
            config,
        }
    }

    /// One full cycle. Does not touch subscriber state; callers advance the
    /// watermark on success.
    pub async fn run_cycle(
        &self,
        subscriber: &SubscriberModel,
        now: DateTime<Utc>,
    ) -> Result<DeliveryOutcome, ServiceError> {
        let criteria = SearchCriteria {
            keywords: subscriber.keyword_list(),
            location: subscriber.location.clone(),
            country: subscriber.country_or_default().to_string(),
        };
        debug!(
            "Running cycle for user {} with query `{}`",
            subscriber.user_id,
            criteria.query_string()
        );

        let raw = self.provider.fetch(&criteria).await?;
        let postings = filter_recent(
            raw,
            subscriber.lookback_days,
            self.config.result_cap,
            now,
        );

        Ok(self.deliverer.deliver(subscriber, &postings).await?)
    }
}
