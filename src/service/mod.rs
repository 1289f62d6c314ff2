use std::sync::Arc;

use crate::config::Config;
use crate::database::Database;
use crate::delivery::Deliverer;
use crate::delivery::Messenger;
use crate::provider::JSearchClient;
use crate::service::job_update_service::JobUpdateService;
use crate::service::subscription_service::SubscriptionService;

pub mod error;
pub mod job_update_service;
pub mod subscription_service;

pub struct Services {
    pub subscription: Arc<SubscriptionService>,
    pub job_update: Arc<JobUpdateService>,
}

impl Services {
    pub fn new(
        db: Arc<Database>,
        provider: Arc<JSearchClient>,
        messenger: Arc<dyn Messenger>,
        config: Arc<Config>,
    ) -> Self {
        let job_update = Arc::new(JobUpdateService::new(
            provider,
            Deliverer::new(messenger.clone()),
            config.clone(),
        ));

        Self {
            subscription: Arc::new(SubscriptionService::new(
                db,
                messenger,
                job_update.clone(),
                config,
            )),
            job_update,
        }
    }
}
