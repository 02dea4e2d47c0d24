use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::domain::{Clock, SystemClock};
use crate::services::{
    AuthService, CatalogService, ContainerService, InventoryService, SeaOrmAuthService,
    SeaOrmCatalogService, SeaOrmContainerService, SeaOrmInventoryService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub clock: Arc<dyn Clock>,

    pub inventory: Arc<dyn InventoryService>,

    pub containers: Arc<dyn ContainerService>,

    pub catalog: Arc<dyn CatalogService>,

    pub auth: Arc<dyn AuthService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock)).await
    }

    /// Builds the state with a caller-supplied clock.
    pub async fn with_clock(config: Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::from_store(config, store, clock))
    }

    #[must_use]
    pub fn from_store(config: Config, store: Store, clock: Arc<dyn Clock>) -> Self {
        let inventory_config = config.inventory.clone();

        let inventory: Arc<dyn InventoryService> = Arc::new(SeaOrmInventoryService::new(
            store.clone(),
            clock.clone(),
            inventory_config.clone(),
        ));
        let containers: Arc<dyn ContainerService> = Arc::new(SeaOrmContainerService::new(
            store.clone(),
            clock.clone(),
            inventory_config,
        ));
        let catalog: Arc<dyn CatalogService> =
            Arc::new(SeaOrmCatalogService::new(store.clone(), clock.clone()));
        let auth: Arc<dyn AuthService> =
            Arc::new(SeaOrmAuthService::new(store.clone(), clock.clone()));

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            clock,
            inventory,
            containers,
            catalog,
            auth,
        }
    }
}
