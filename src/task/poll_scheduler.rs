//! Background task that sweeps over due subscribers.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use chrono::Utc;
use log::debug;
use log::error;
use log::info;
use log::warn;

use crate::database::Database;
use crate::delivery::DeliveryOutcome;
use crate::service::error::ServiceError;
use crate::service::job_update_service::JobUpdateService;

/// Aggregated result of one sweep, logged once instead of per call site.
#[derive(Debug, Default)]
pub struct SweepSummary {
    pub due: usize,
    pub delivered: usize,
    pub no_content: usize,
    /// `(user_id, reason)` for every subscriber skipped this sweep.
    pub skipped: Vec<(String, String)>,
}

impl SweepSummary {
    fn log(&self) {
        info!(
            "Sweep complete: {} due, {} delivered, {} without new postings, {} skipped.",
            self.due,
            self.delivered,
            self.no_content,
            self.skipped.len()
        );
        for (user_id, reason) in &self.skipped {
            warn!("Skipped user {user_id} this sweep: {reason}");
        }
    }
}

/// Task that periodically checks subscribers and delivers fresh postings.
///
/// Due subscribers are processed sequentially to bound the request rate
/// against the provider. A subscriber's failure only skips that subscriber;
/// its watermark is left untouched so the next due check retries naturally.
pub struct PollScheduler {
    db: Arc<Database>,
    service: Arc<JobUpdateService>,
    poll_interval: Duration,
    running: AtomicBool,
}

impl PollScheduler {
    pub fn new(
        db: Arc<Database>,
        service: Arc<JobUpdateService>,
        poll_interval: Duration,
    ) -> Arc<Self> {
        info!("Initializing PollScheduler with poll interval {poll_interval:?}");
        Arc::new(Self {
            db,
            service,
            poll_interval,
            running: AtomicBool::new(false),
        })
    }

    /// Starts the polling loop.
    pub fn start(self: Arc<Self>) -> anyhow::Result<()> {
        if !self.running.load(Ordering::SeqCst) {
            self.running.store(true, Ordering::SeqCst);
            info!("Starting PollScheduler check loop.");
            self.spawn_check_loop();
        }
        Ok(())
    }

    /// Stops the polling loop.
    pub fn stop(self: Arc<Self>) -> anyhow::Result<()> {
        info!("Stopping PollScheduler check loop.");
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn spawn_check_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.poll_interval);
        tokio::spawn(async move {
            loop {
                interval.tick().await;
                if !self.running.load(Ordering::SeqCst) {
                    info!("Stopping check loop.");
                    break;
                }
                if let Err(e) = self.run_sweep().await {
                    error!("Error running sweep: {e}");
                }
            }
        });
    }

    /// One pass over all due subscribers.
    pub async fn run_sweep(&self) -> Result<SweepSummary, ServiceError> {
        debug!("Checking for due subscribers.");
        let now = Utc::now();

        let due = self.db.subscribers_table.list_due(now.timestamp()).await?;
        info!("Found {} subscribers due for delivery.", due.len());

        let mut summary = SweepSummary {
            due: due.len(),
            ..Default::default()
        };

        for subscriber in due {
            let user_id = subscriber.user_id.clone();
            match self.service.run_cycle(&subscriber, now).await {
                Ok(outcome) => {
                    // The watermark only advances after a successful cycle;
                    // "nothing new" counts as success.
                    if let Err(e) = self
                        .db
                        .subscribers_table
                        .set_watermark(&user_id, now.timestamp())
                        .await
                    {
                        summary.skipped.push((user_id, e.to_string()));
                        continue;
                    }
                    match outcome {
                        DeliveryOutcome::Delivered { .. } => summary.delivered += 1,
                        DeliveryOutcome::NoContent => summary.no_content += 1,
                    }
                }
                Err(e) => {
                    summary.skipped.push((user_id, e.to_string()));
                }
            }
        }

        summary.log();
        Ok(summary)
    }
}
