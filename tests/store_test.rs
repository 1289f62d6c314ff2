use futures::future::join_all;
use jobwatch::database::model::SubscriberModel;
use jobwatch::database::table::AdmitOutcome;
use jobwatch::database::table::Table;

mod common;

const MAX: i64 = 18;

fn subscriber(user_id: &str) -> SubscriberModel {
    SubscriberModel {
        user_id: user_id.to_string(),
        keywords: Some(SubscriberModel::encode_keywords(&["rust".to_string()])),
        cadence_secs: common::TEST_CADENCE_SECS,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_capacity_bound_and_readmission() {
    let (db, db_path) = common::setup_db().await;
    let table = &db.subscribers_table;

    for i in 0..MAX {
        assert_eq!(
            table.try_admit(&format!("user-{i}"), MAX).await.unwrap(),
            AdmitOutcome::Admitted
        );
    }

    // 19th user is rejected, an existing subscriber is not.
    assert_eq!(
        table.try_admit("user-18", MAX).await.unwrap(),
        AdmitOutcome::CapacityExceeded
    );
    assert_eq!(
        table.try_admit("user-0", MAX).await.unwrap(),
        AdmitOutcome::Admitted
    );
    assert_eq!(table.count_active().await.unwrap(), MAX);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_concurrent_admissions_never_exceed_capacity() {
    let (db, db_path) = common::setup_db().await;

    let attempts = (0..40).map(|i| {
        let db = db.clone();
        async move {
            db.subscribers_table
                .try_admit(&format!("user-{i}"), MAX)
                .await
                .unwrap()
        }
    });
    let outcomes = join_all(attempts).await;

    let admitted = outcomes
        .iter()
        .filter(|o| **o == AdmitOutcome::Admitted)
        .count();
    assert_eq!(admitted as i64, MAX);
    assert_eq!(db.subscribers_table.count_active().await.unwrap(), MAX);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_unsubscribing_frees_capacity() {
    let (db, db_path) = common::setup_db().await;
    let table = &db.subscribers_table;

    for i in 0..MAX {
        table.try_admit(&format!("user-{i}"), MAX).await.unwrap();
    }
    assert_eq!(
        table.try_admit("late-user", MAX).await.unwrap(),
        AdmitOutcome::CapacityExceeded
    );

    table.set_flags("user-3", Some(false), Some(false)).await.unwrap();
    assert_eq!(
        table.try_admit("late-user", MAX).await.unwrap(),
        AdmitOutcome::Admitted
    );

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_list_due_membership() {
    let (db, db_path) = common::setup_db().await;
    let table = &db.subscribers_table;
    let now = 1_000_000_000_i64;

    let mut never_sent = subscriber("never-sent");
    never_sent.updates_enabled = true;
    table.insert(&never_sent).await.unwrap();

    let mut cadence_elapsed = subscriber("cadence-elapsed");
    cadence_elapsed.updates_enabled = true;
    cadence_elapsed.last_sent = Some(now - common::TEST_CADENCE_SECS);
    table.insert(&cadence_elapsed).await.unwrap();

    let mut too_recent = subscriber("too-recent");
    too_recent.updates_enabled = true;
    too_recent.last_sent = Some(now - common::TEST_CADENCE_SECS + 10);
    table.insert(&too_recent).await.unwrap();

    let disabled = subscriber("disabled");
    table.insert(&disabled).await.unwrap();

    let mut no_keywords = subscriber("no-keywords");
    no_keywords.updates_enabled = true;
    no_keywords.keywords = None;
    table.insert(&no_keywords).await.unwrap();

    let mut empty_keywords = subscriber("empty-keywords");
    empty_keywords.updates_enabled = true;
    empty_keywords.keywords = Some("[]".to_string());
    table.insert(&empty_keywords).await.unwrap();

    let due = table.list_due(now).await.unwrap();
    let mut ids: Vec<_> = due.iter().map(|s| s.user_id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["cadence-elapsed", "never-sent"]);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_watermark_never_regresses() {
    let (db, db_path) = common::setup_db().await;
    let table = &db.subscribers_table;

    table.insert(&subscriber("user")).await.unwrap();

    table.set_watermark("user", 100).await.unwrap();
    assert_eq!(
        table.select(&"user".to_string()).await.unwrap().last_sent,
        Some(100)
    );

    // An older timestamp must not win.
    table.set_watermark("user", 50).await.unwrap();
    assert_eq!(
        table.select(&"user".to_string()).await.unwrap().last_sent,
        Some(100)
    );

    table.set_watermark("user", 200).await.unwrap();
    assert_eq!(
        table.select(&"user".to_string()).await.unwrap().last_sent,
        Some(200)
    );

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_setters_create_row_with_defaults() {
    let (db, db_path) = common::setup_db().await;
    let table = &db.subscribers_table;

    table.set_location("fresh-user", Some("Berlin")).await.unwrap();

    let row = table.select_optional("fresh-user").await.unwrap().unwrap();
    assert_eq!(row.location.as_deref(), Some("Berlin"));
    assert_eq!(row.lookback_days, 4);
    assert_eq!(row.cadence_secs, common::TEST_CADENCE_SECS);
    assert!(!row.subscribed);
    assert!(!row.updates_enabled);

    common::teardown_db(db_path).await;
}
