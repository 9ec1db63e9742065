use std::sync::Arc;

use crate::{
    auth::repo::{PgUserStore, UserStore},
    config::AppConfig,
    db,
    entries::repo::{EntryStore, PgEntryStore},
    estimator::{self, CalorieEstimator},
    profile::repo::{PgProfileStore, ProfileStore},
    recipes::catalog::RecipeCatalog,
    storage::{S3Storage, StorageClient},
};

/// Everything a handler can reach. Built once at start-up; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub entries: Arc<dyn EntryStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub storage: Arc<dyn StorageClient>,
    pub estimator: Arc<dyn CalorieEstimator>,
    pub recipes: Arc<RecipeCatalog>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;

        // S3 / MinIO
        let storage = Arc::new(S3Storage::connect(&config.storage).await) as Arc<dyn StorageClient>;
        let estimator = estimator::from_config(config.estimator_url.as_deref())?;
        if !estimator.enabled() {
            tracing::warn!("ESTIMATOR_URL not set; entries without calories will be rejected");
        }

        Ok(Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            entries: Arc::new(PgEntryStore::new(pool.clone())),
            profiles: Arc::new(PgProfileStore::new(pool)),
            storage,
            estimator,
            recipes: Arc::new(RecipeCatalog::builtin()?),
            config,
        })
    }

    /// In-memory state for tests: memory stores, a fake bucket and an
    /// estimator that always recognizes the same food.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::test_utils::{
            test_config, FakeEstimator, FakeStorage, MemoryEntryStore, MemoryProfileStore,
            MemoryUserStore,
        };

        Self {
            config: Arc::new(test_config()),
            users: Arc::new(MemoryUserStore::default()),
            entries: Arc::new(MemoryEntryStore::default()),
            profiles: Arc::new(MemoryProfileStore::default()),
            storage: Arc::new(FakeStorage::default()),
            estimator: Arc::new(FakeEstimator),
            recipes: Arc::new(RecipeCatalog::builtin().expect("built-in recipes")),
        }
    }
}
