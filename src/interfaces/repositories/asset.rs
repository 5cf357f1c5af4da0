use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::asset::{Asset, NewAsset},
    errors::AppError,
    repositories::sqlx_repo::SqlxAssetRepo,
};

const ASSET_COLUMNS: &str = "id, title, description, source_reference, media_kind, \
    original_size, processed_size, duration_seconds, created_at";

/// Helper to compute OFFSET safely from 1-based `page` and `per_page`.
pub fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}

/// Append-only registry of asset metadata.
#[async_trait]
pub trait AssetRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn create_asset(&self, asset: &NewAsset) -> Result<Asset, AppError>;
    async fn get_asset(&self, id: &Uuid) -> Result<Option<Asset>, AppError>;
    /// Newest first; an empty registry is `Ok(vec![])`.
    async fn list_assets(&self) -> Result<Vec<Asset>, AppError>;
    async fn list_assets_page(&self, limit: i64, offset: i64) -> Result<Vec<Asset>, AppError>;
}

#[async_trait]
impl<T> AssetRepository for Arc<T>
where
    T: AssetRepository + ?Sized,
{
    async fn check_connection(&self) -> Result<(), AppError> {
        (**self).check_connection().await
    }

    async fn create_asset(&self, asset: &NewAsset) -> Result<Asset, AppError> {
        (**self).create_asset(asset).await
    }

    async fn get_asset(&self, id: &Uuid) -> Result<Option<Asset>, AppError> {
        (**self).get_asset(id).await
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, AppError> {
        (**self).list_assets().await
    }

    async fn list_assets_page(&self, limit: i64, offset: i64) -> Result<Vec<Asset>, AppError> {
        (**self).list_assets_page(limit, offset).await
    }
}

impl SqlxAssetRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxAssetRepo { pool }
    }
}

#[async_trait]
impl AssetRepository for SqlxAssetRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    #[tracing::instrument(skip(self, asset), fields(asset_id = %asset.id, db.table = "assets"))]
    async fn create_asset(&self, asset: &NewAsset) -> Result<Asset, AppError> {
        asset.validate()?;

        // created_at uses clock_timestamp() and seq is a BIGSERIAL, so
        // concurrent inserts never share an ordering position.
        let query = format!(
            r#"
            INSERT INTO assets (
                id, title, description, source_reference, media_kind,
                original_size, processed_size, duration_seconds
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ASSET_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Asset>(&query)
            .bind(asset.id)
            .bind(&asset.title)
            .bind(&asset.description)
            .bind(&asset.source_reference)
            .bind(asset.media_kind.as_str())
            .bind(asset.original_size)
            .bind(asset.processed_size)
            .bind(asset.duration_seconds)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get_asset(&self, id: &Uuid) -> Result<Option<Asset>, AppError> {
        let query = format!("SELECT {ASSET_COLUMNS} FROM assets WHERE id = $1");

        let asset = sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(asset)
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, AppError> {
        let query = format!(
            "SELECT {ASSET_COLUMNS} FROM assets ORDER BY created_at DESC, seq DESC"
        );

        let assets = sqlx::query_as::<_, Asset>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(assets)
    }

    async fn list_assets_page(&self, limit: i64, offset: i64) -> Result<Vec<Asset>, AppError> {
        let query = format!(
            "SELECT {ASSET_COLUMNS} FROM assets ORDER BY created_at DESC, seq DESC LIMIT $1 OFFSET $2"
        );

        let assets = sqlx::query_as::<_, Asset>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(assets)
    }
}
