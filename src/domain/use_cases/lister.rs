use crate::{
    constants::MAX_PAGE_SIZE,
    entities::{asset::Asset, listing::AssetListing},
    errors::AppError,
    repositories::asset::{page_offset, AssetRepository},
    utils::valid_uuid::valid_uuid,
};

pub struct AssetLister<R>
where
    R: AssetRepository,
{
    pub asset_repo: R,
}

impl<R> AssetLister<R>
where
    R: AssetRepository,
{
    pub fn new(asset_repo: R) -> Self {
        AssetLister { asset_repo }
    }

    /// Every asset, newest first. Storage failures are errors, never an empty listing.
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<AssetListing, AppError> {
        let assets = self.asset_repo.list_assets().await?;
        Ok(AssetListing::from_assets(assets))
    }

    /// One page of the newest-first listing; `page` is 1-based and `per_page` is capped.
    ///
    /// A page past the end of a non-empty registry is `Ready` with no rows.
    /// `Empty` is reserved for a registry that holds nothing at all.
    #[tracing::instrument(skip(self))]
    pub async fn list_page(&self, page: u32, per_page: u32) -> Result<AssetListing, AppError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);
        let offset = page_offset(page, per_page);

        let assets = self.asset_repo
            .list_assets_page(per_page as i64, offset)
            .await?;

        if assets.is_empty() && offset > 0 {
            let first = self.asset_repo.list_assets_page(1, 0).await?;
            if !first.is_empty() {
                tracing::debug!(page, per_page, "Page is past the end of the registry");
                return Ok(AssetListing::Ready(assets));
            }
        }

        Ok(AssetListing::from_assets(assets))
    }

    /// Retrieves a single asset by its ID
    pub async fn get(&self, id: &str) -> Result<Asset, AppError> {
        let valid_id = valid_uuid(id)?;

        self.asset_repo
            .get_asset(&valid_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset {} not found", valid_id)))
    }
}
