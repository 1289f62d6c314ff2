use async_trait::async_trait;
use sqlx::SqlitePool;

use super::BaseTable;
use super::Table;
use crate::database::error::DatabaseError;
use crate::database::model::SubscriberDefaults;
use crate::database::model::SubscriberModel;

const ALL_COLUMNS: &str = "user_id, keywords, location, country, lookback_days, \
     destination_ref, subscribed, updates_enabled, cadence_secs, last_sent";

/// Result of an admission attempt against the subscriber capacity.
#[derive(Debug, PartialEq, Eq)]
pub enum AdmitOutcome {
    Admitted,
    CapacityExceeded,
}

/// Store for subscriber settings and delivery state.
///
/// Admission and the capacity count live in the same SQL statement, so the
/// capacity bound holds under concurrent mutation without an outer lock.
pub struct SubscribersTable {
    base: BaseTable,
    defaults: SubscriberDefaults,
}

impl SubscribersTable {
    pub fn new(pool: SqlitePool, defaults: SubscriberDefaults) -> Self {
        Self {
            base: BaseTable::new(pool),
            defaults,
        }
    }

    /// Attempts to mark `user_id` as subscribed, creating the row if needed.
    ///
    /// The count predicate excludes the user itself, so re-admission of an
    /// already-subscribed user always succeeds without consuming headroom.
    /// Zero affected rows means the capacity guard rejected the insert.
    pub async fn try_admit(
        &self,
        user_id: &str,
        max_subscribers: i64,
    ) -> Result<AdmitOutcome, DatabaseError> {
        let res = sqlx::query(
            r#"
            INSERT INTO subscribers (user_id, subscribed, lookback_days, cadence_secs)
            SELECT ?1, 1, ?2, ?3
            WHERE (SELECT COUNT(*) FROM subscribers WHERE subscribed = 1 AND user_id <> ?1) < ?4
            ON CONFLICT(user_id) DO UPDATE SET subscribed = 1
            "#,
        )
        .bind(user_id)
        .bind(self.defaults.lookback_days)
        .bind(self.defaults.cadence_secs)
        .bind(max_subscribers)
        .execute(&self.base.pool)
        .await?;

        if res.rows_affected() == 0 {
            Ok(AdmitOutcome::CapacityExceeded)
        } else {
            Ok(AdmitOutcome::Admitted)
        }
    }

    pub async fn select_optional(
        &self,
        user_id: &str,
    ) -> Result<Option<SubscriberModel>, DatabaseError> {
        let model = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {ALL_COLUMNS} FROM subscribers WHERE user_id = ?"
        ))
        .bind(user_id)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(model)
    }

    pub async fn set_keywords(
        &self,
        user_id: &str,
        keywords: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.upsert_field("keywords", user_id, keywords).await
    }

    pub async fn set_location(
        &self,
        user_id: &str,
        location: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.upsert_field("location", user_id, location).await
    }

    pub async fn set_country(
        &self,
        user_id: &str,
        country: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.upsert_field("country", user_id, country).await
    }

    pub async fn set_destination(
        &self,
        user_id: &str,
        destination_ref: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.upsert_field("destination_ref", user_id, destination_ref)
            .await
    }

    pub async fn set_lookback_days(&self, user_id: &str, days: i64) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (user_id, lookback_days, cadence_secs)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id) DO UPDATE SET lookback_days = excluded.lookback_days
            "#,
        )
        .bind(user_id)
        .bind(days)
        .bind(self.defaults.cadence_secs)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    /// Updates either flag, leaving `None` flags untouched.
    pub async fn set_flags(
        &self,
        user_id: &str,
        subscribed: Option<bool>,
        updates_enabled: Option<bool>,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE subscribers SET
                subscribed = COALESCE(?, subscribed),
                updates_enabled = COALESCE(?, updates_enabled)
            WHERE user_id = ?
            "#,
        )
        .bind(subscribed)
        .bind(updates_enabled)
        .bind(user_id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    /// Advances the delivery watermark. Never regresses an existing value.
    pub async fn set_watermark(&self, user_id: &str, timestamp: i64) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE subscribers SET last_sent = MAX(COALESCE(last_sent, 0), ?) WHERE user_id = ?",
        )
        .bind(timestamp)
        .bind(user_id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    pub async fn count_active(&self) -> Result<i64, DatabaseError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subscribers WHERE subscribed = 1")
            .fetch_one(&self.base.pool)
            .await?;
        Ok(count.0)
    }

    /// Subscribers the scheduler should process now: updates enabled, keywords
    /// set, and either never delivered or past their cadence.
    pub async fn list_due(&self, now: i64) -> Result<Vec<SubscriberModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, SubscriberModel>(&format!(
            r#"
            SELECT {ALL_COLUMNS} FROM subscribers
            WHERE
                updates_enabled = 1 AND
                keywords IS NOT NULL AND
                keywords <> '[]' AND
                (last_sent IS NULL OR ?1 - last_sent >= cadence_secs)
            "#
        ))
        .bind(now)
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn upsert_field(
        &self,
        column: &str,
        user_id: &str,
        value: Option<&str>,
    ) -> Result<(), DatabaseError> {
        // `column` is a compile-time constant supplied by the setters above.
        sqlx::query(&format!(
            r#"
            INSERT INTO subscribers (user_id, {column}, lookback_days, cadence_secs)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id) DO UPDATE SET {column} = excluded.{column}
            "#
        ))
        .bind(user_id)
        .bind(value)
        .bind(self.defaults.lookback_days)
        .bind(self.defaults.cadence_secs)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Table<SubscriberModel, String> for SubscribersTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscribers (
                user_id TEXT PRIMARY KEY,
                keywords TEXT,
                location TEXT,
                country TEXT,
                lookback_days INTEGER NOT NULL,
                destination_ref TEXT,
                subscribed INTEGER NOT NULL DEFAULT 0,
                updates_enabled INTEGER NOT NULL DEFAULT 0,
                cadence_secs INTEGER NOT NULL,
                last_sent INTEGER
            )
            "#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS subscribers")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<SubscriberModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {ALL_COLUMNS} FROM subscribers"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM subscribers")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn insert(&self, model: &SubscriberModel) -> Result<String, DatabaseError> {
        sqlx::query(&format!(
            r#"
            INSERT INTO subscribers ({ALL_COLUMNS})
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        ))
        .bind(&model.user_id)
        .bind(&model.keywords)
        .bind(&model.location)
        .bind(&model.country)
        .bind(model.lookback_days)
        .bind(&model.destination_ref)
        .bind(model.subscribed)
        .bind(model.updates_enabled)
        .bind(model.cadence_secs)
        .bind(model.last_sent)
        .execute(&self.base.pool)
        .await?;
        Ok(model.user_id.clone())
    }

    async fn select(&self, id: &String) -> Result<SubscriberModel, DatabaseError> {
        let model = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {ALL_COLUMNS} FROM subscribers WHERE user_id = ?"
        ))
        .bind(id)
        .fetch_one(&self.base.pool)
        .await?;
        Ok(model)
    }

    async fn update(&self, model: &SubscriberModel) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE subscribers SET
                keywords = ?, location = ?, country = ?, lookback_days = ?,
                destination_ref = ?, subscribed = ?, updates_enabled = ?,
                cadence_secs = ?, last_sent = ?
            WHERE user_id = ?
            "#,
        )
        .bind(&model.keywords)
        .bind(&model.location)
        .bind(&model.country)
        .bind(model.lookback_days)
        .bind(&model.destination_ref)
        .bind(model.subscribed)
        .bind(model.updates_enabled)
        .bind(model.cadence_secs)
        .bind(model.last_sent)
        .bind(&model.user_id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &String) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM subscribers WHERE user_id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}
