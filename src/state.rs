use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::{
    cache::CatalogCache,
    config::AppConfig,
    db::{DbPool, OrmConn, create_lazy_pool, orm_from_pool},
    mail::{Mailer, RecordingMailer},
    settings::SiteSettings,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub mailer: Arc<dyn Mailer>,
    pub cache: CatalogCache,
    pub settings: Arc<RwLock<SiteSettings>>,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        let orm = orm_from_pool(&pool);
        let cache = CatalogCache::new(Duration::from_secs(config.cache_ttl_secs));
        Self {
            pool,
            orm,
            config: Arc::new(config),
            mailer,
            cache,
            settings: Arc::new(RwLock::new(SiteSettings::default())),
        }
    }

    /// State over a pool that connects on first use, with mail captured in memory.
    pub fn for_tests(database_url: &str, mailer: Arc<RecordingMailer>) -> anyhow::Result<Self> {
        let pool = create_lazy_pool(database_url)?;
        Ok(Self::new(pool, AppConfig::for_tests(database_url), mailer))
    }

    pub async fn site_settings(&self) -> SiteSettings {
        self.settings.read().await.clone()
    }
}
