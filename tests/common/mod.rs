use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use jobwatch::config::Config;
use jobwatch::database::Database;
use jobwatch::database::model::SubscriberDefaults;
use jobwatch::delivery::Messenger;
use jobwatch::delivery::SendError;
use uuid::Uuid;

#[allow(dead_code)]
pub const TEST_CADENCE_SECS: i64 = 4 * 24 * 60 * 60;

pub async fn setup_db() -> (Arc<Database>, PathBuf) {
    let uuid = Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("jobwatch-test-{}.db", uuid));
    let db_url = format!("sqlite://{}", db_path.to_str().unwrap());

    let defaults = SubscriberDefaults {
        lookback_days: 4,
        cadence_secs: TEST_CADENCE_SECS,
    };
    let db = Database::new(&db_url, db_path.to_str().unwrap(), defaults)
        .await
        .expect("Failed to create database");

    db.create_all_tables()
        .await
        .expect("Failed to create tables");

    (Arc::new(db), db_path)
}

pub async fn teardown_db(db_path: PathBuf) {
    if db_path.exists() {
        let _ = std::fs::remove_file(db_path);
    }
}

#[allow(dead_code)]
pub fn test_config(provider_url: &str) -> Arc<Config> {
    Arc::new(Config {
        provider_url: provider_url.to_string(),
        rapidapi_key: "test-key".to_string(),
        ..Default::default()
    })
}

// MOCK MESSENGER

/// In-memory messenger recording every send; failure modes are toggled per
/// test through the public flags.
#[allow(dead_code)]
pub struct MockMessenger {
    pub sent: Mutex<Vec<(String, String)>>,
    pub resolvable: bool,
    pub permitted: bool,
    pub forbid_send: bool,
    pub fail_send: bool,
}

#[allow(dead_code)]
impl MockMessenger {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            resolvable: true,
            permitted: true,
            forbid_send: false,
            fail_send: false,
        }
    }

    pub fn unresolvable() -> Self {
        Self {
            resolvable: false,
            ..Self::new()
        }
    }

    pub fn without_permission() -> Self {
        Self {
            permitted: false,
            ..Self::new()
        }
    }

    pub fn failing_transport() -> Self {
        Self {
            fail_send: true,
            ..Self::new()
        }
    }

    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn resolve(&self, _destination: &str) -> bool {
        self.resolvable
    }

    async fn can_send(&self, _destination: &str) -> bool {
        self.permitted
    }

    async fn send(&self, destination: &str, text: &str) -> Result<(), SendError> {
        if self.forbid_send {
            return Err(SendError::Forbidden);
        }
        if self.fail_send {
            return Err(SendError::Transport("connection reset".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), text.to_string()));
        Ok(())
    }
}
