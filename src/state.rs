use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::models::StudyStore;
use crate::rate_limit::RateLimiter;
use crate::services::snapshot::SnapshotStore;
use crate::services::storage::StorageService;

/// Settings the UI can change at runtime; everything else comes from the
/// config files.
#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub api_key: String,
    pub subjects: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// Single mutex over all mutable state; mutating handlers hold it across
    /// mutate-and-persist so snapshots of concurrent requests cannot
    /// interleave.
    pub store: Arc<Mutex<StudyStore>>,
    pub limiter: Arc<Mutex<RateLimiter>>,
    pub settings: Arc<Mutex<RuntimeSettings>>,
    pub snapshot: SnapshotStore,
}

impl AppState {
    pub fn new(config: AppConfig, storage: Arc<StorageService>, store: StudyStore) -> Self {
        let limiter = RateLimiter::new(
            config.chat.rate_limit_max_calls,
            Duration::from_secs(config.chat.rate_limit_window_secs),
        );

        let settings = RuntimeSettings {
            api_key: config.llm.api_key.clone(),
            subjects: config.chat.subjects.clone(),
        };

        Self {
            config: Arc::new(config),
            store: Arc::new(Mutex::new(store)),
            limiter: Arc::new(Mutex::new(limiter)),
            settings: Arc::new(Mutex::new(settings)),
            snapshot: SnapshotStore::new(storage),
        }
    }
}
