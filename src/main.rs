//! Application entry point for jobwatch.
//!
//! Wires the store, provider client, messenger, and scheduler together and
//! runs until Ctrl+C.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::info;

use jobwatch::config::Config;
use jobwatch::database::Database;
use jobwatch::database::model::SubscriberDefaults;
use jobwatch::delivery::Messenger;
use jobwatch::delivery::WebhookMessenger;
use jobwatch::logging::setup_logging;
use jobwatch::provider::JSearchClient;
use jobwatch::service::Services;
use jobwatch::task::PollScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    debug!("Loading configuration...");
    let config = Arc::new(Config::load()?);
    setup_logging(&config)?;
    info!("Starting jobwatch...");

    let db = setup_database(&config, init_start).await?;

    let provider = Arc::new(JSearchClient::new(
        &config.provider_url,
        &config.rapidapi_key,
        config.request_timeout,
    )?);
    let messenger: Arc<dyn Messenger> =
        Arc::new(WebhookMessenger::new(config.request_timeout)?);
    let services = Arc::new(Services::new(
        db.clone(),
        provider,
        messenger,
        config.clone(),
    ));

    let scheduler = PollScheduler::new(db, services.job_update.clone(), config.poll_interval);
    scheduler.clone().start()?;
    info!(
        "Scheduler setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );

    run(init_start).await?;
    scheduler.stop()
}

async fn setup_database(config: &Config, init_start: Instant) -> Result<Arc<Database>> {
    debug!("Setting up Database...");
    let defaults = SubscriberDefaults {
        lookback_days: config.default_lookback_days,
        cadence_secs: config.default_cadence.as_secs() as i64,
    };
    let db = Arc::new(Database::new(&config.db_url, &config.db_path, defaults).await?);

    db.create_all_tables().await?;
    info!(
        "Database setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );

    Ok(db)
}

async fn run(init_start: Instant) -> Result<()> {
    info!(
        "jobwatch is up in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down.");

    Ok(())
}
