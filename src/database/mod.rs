use std::str::FromStr;

use log::debug;
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::database::model::SubscriberDefaults;
use crate::database::table::SubscribersTable;
use crate::database::table::Table;

pub mod error;
pub mod model;
pub mod table;

pub struct Database {
    pub pool: SqlitePool,
    pub subscribers_table: SubscribersTable,
}

impl Database {
    pub async fn new(
        db_url: &str,
        db_path: &str,
        defaults: SubscriberDefaults,
    ) -> anyhow::Result<Self> {
        let path = std::path::Path::new(db_path);
        if !path.exists() {
            debug!("Database path {db_path} does not exist. Creating...");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, "")?;
            info!("Created {db_path}");
        }

        debug!("Connecting to db...");
        let opts = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;
        info!("Connected to db.");

        let subscribers_table = SubscribersTable::new(pool.clone(), defaults);

        Ok(Self {
            pool,
            subscribers_table,
        })
    }

    pub async fn create_all_tables(&self) -> anyhow::Result<()> {
        self.subscribers_table.create_table().await?;
        Ok(())
    }

    pub async fn drop_all_tables(&self) -> anyhow::Result<()> {
        self.subscribers_table.drop_table().await?;
        Ok(())
    }

    pub async fn delete_all_tables(&self) -> anyhow::Result<()> {
        self.subscribers_table.delete_all().await?;
        Ok(())
    }
}
