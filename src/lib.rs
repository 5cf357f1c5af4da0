use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;

pub use domain::{entities, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{db, provider, utils};

use errors::AppError;
use provider::cloudinary::CloudinaryProvider;
use repositories::{asset::AssetRepository, media_provider::MediaProvider, sqlx_repo::SqlxAssetRepo};
use settings::AppConfig;
use use_cases::{
    catalog::RenditionCatalog,
    ingestion::IngestionCoordinator,
    lister::AssetLister,
    resolver::TransformResolver,
};

pub type SharedAssetRepo = Arc<dyn AssetRepository>;
pub type SharedMediaProvider = Arc<dyn MediaProvider>;

pub type AppIngestion = IngestionCoordinator<SharedAssetRepo, SharedMediaProvider>;
pub type AppLister = AssetLister<SharedAssetRepo>;

pub struct AppState {
    pub ingestion: AppIngestion,
    pub lister: AppLister,
    pub resolver: TransformResolver,
    pub asset_repo: SharedAssetRepo,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Result<Self, AppError> {
        let asset_repo: SharedAssetRepo = Arc::new(SqlxAssetRepo::new(pool));
        let provider: SharedMediaProvider = Arc::new(CloudinaryProvider::new(config)?);

        Ok(Self::from_parts(config, asset_repo, provider))
    }

    /// Wires the use cases around already-built collaborators.
    pub fn from_parts(
        config: &AppConfig,
        asset_repo: SharedAssetRepo,
        provider: SharedMediaProvider,
    ) -> Self {
        let catalog = Arc::new(RenditionCatalog::standard());

        AppState {
            ingestion: IngestionCoordinator::new(
                asset_repo.clone(),
                provider,
                config.max_upload_len(),
            ),
            lister: AssetLister::new(asset_repo.clone()),
            resolver: TransformResolver::from_config(config, catalog),
            asset_repo,
        }
    }
}
