
use chrono::Utc;
use clipforge_backend::{
    entities::{
        asset::{Asset, MediaKind, NewAsset},
        listing::AssetListing,
    },
    errors::AppError,
    repositories::asset::AssetRepository,
    use_cases::lister::AssetLister,
};
use mockall::predicate::eq;
use test_utils::*;
use uuid::Uuid;

fn sample_asset(title: &str) -> Asset {
    Asset {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        source_reference: format!("{}-ref", title),
        media_kind: MediaKind::Video,
        original_size: 1_000,
        processed_size: None,
        duration_seconds: 10,
        created_at: Utc::now(),
    }
}

fn new_video(title: &str) -> NewAsset {
    NewAsset::new(title, None, format!("{}-ref", title), MediaKind::Video, 1_000, Some(800), 10)
}

#[actix_rt::test]
async fn empty_registry_is_an_empty_listing() {
    let mut repo = MockAssetRepo::new();
    repo.expect_list_assets().returning(|| Ok(vec![]));

    let listing = AssetLister::new(repo).list().await.unwrap();

    assert_eq!(listing, AssetListing::Empty);
    assert!(listing.is_empty());
}

#[actix_rt::test]
async fn storage_failure_is_not_an_empty_listing() {
    let mut repo = MockAssetRepo::new();
    repo.expect_list_assets()
        .returning(|| Err(AppError::StorageError("connection refused".into())));

    let result = AssetLister::new(repo).list().await;

    assert!(matches!(result, Err(AppError::StorageError(_))));
}

#[actix_rt::test]
async fn pending_asset_is_listed_without_a_ratio() {
    let mut repo = MockAssetRepo::new();
    repo.expect_list_assets()
        .returning(|| Ok(vec![sample_asset("pending")]));

    let listing = AssetLister::new(repo).list().await.unwrap();

    let asset = &listing.assets()[0];
    assert!(!asset.is_processed());
    assert_eq!(asset.compression_ratio(), None);
    assert_eq!(asset.bytes_saved(), None);
}

#[actix_rt::test]
async fn page_arguments_are_clamped() {
    let mut repo = MockAssetRepo::new();
    repo.expect_list_assets_page()
        .with(eq(100), eq(0))
        .times(1)
        .returning(|_, _| Ok(vec![]));

    let listing = AssetLister::new(repo).list_page(0, 5_000).await.unwrap();

    assert_eq!(listing.status(), "empty");
}

#[actix_rt::test]
async fn later_pages_skip_earlier_rows() {
    let mut repo = MockAssetRepo::new();
    repo.expect_list_assets_page()
        .with(eq(10), eq(20))
        .times(1)
        .returning(|_, _| Ok(vec![sample_asset("page-three")]));

    let listing = AssetLister::new(repo).list_page(3, 10).await.unwrap();

    assert_eq!(listing.assets().len(), 1);
}

#[actix_rt::test]
async fn get_rejects_malformed_ids() {
    let mut repo = MockAssetRepo::new();
    repo.expect_get_asset().never();

    let result = AssetLister::new(repo).get("not-a-uuid").await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
}

#[actix_rt::test]
async fn get_reports_missing_assets() {
    let mut repo = MockAssetRepo::new();
    repo.expect_get_asset().returning(|_| Ok(None));

    let result = AssetLister::new(repo).get(&Uuid::new_v4().to_string()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn listing_serializes_status_and_assets() {
    let json = serde_json::to_value(AssetListing::from_assets(vec![sample_asset("a")])).unwrap();

    assert_eq!(json["status"], "ready");
    assert_eq!(json["assets"][0]["title"], "a");
    assert_eq!(json["assets"][0]["processed_size"], serde_json::Value::Null);

    let loading = serde_json::to_value(AssetListing::default()).unwrap();
    assert_eq!(loading["status"], "loading");
    assert_eq!(loading["assets"], serde_json::json!([]));
}

#[actix_rt::test]
async fn page_past_the_end_of_a_populated_registry_is_ready_without_rows() {
    let mut repo = MockAssetRepo::new();
    repo.expect_list_assets_page()
        .with(eq(20), eq(80))
        .times(1)
        .returning(|_, _| Ok(vec![]));
    repo.expect_list_assets_page()
        .with(eq(1), eq(0))
        .times(1)
        .returning(|_, _| Ok(vec![sample_asset("only")]));

    let listing = AssetLister::new(repo).list_page(5, 20).await.unwrap();

    assert_eq!(listing, AssetListing::Ready(vec![]));
    assert_eq!(listing.status(), "ready");
    assert!(listing.assets().is_empty());
}

#[actix_rt::test]
async fn page_past_the_end_of_an_empty_registry_is_empty() {
    let mut repo = MockAssetRepo::new();
    repo.expect_list_assets_page()
        .with(eq(20), eq(80))
        .times(1)
        .returning(|_, _| Ok(vec![]));
    repo.expect_list_assets_page()
        .with(eq(1), eq(0))
        .times(1)
        .returning(|_, _| Ok(vec![]));

    let listing = AssetLister::new(repo).list_page(5, 20).await.unwrap();

    assert_eq!(listing, AssetListing::Empty);
}

#[actix_rt::test]
async fn out_of_range_page_does_not_report_a_populated_registry_as_empty() {
    let repo = InMemoryAssetRepo::new();
    repo.create_asset(&new_video("only")).await.unwrap();
    let lister = AssetLister::new(repo);

    let first = lister.list_page(1, 20).await.unwrap();
    let beyond = lister.list_page(5, 20).await.unwrap();

    assert_eq!(first.assets().len(), 1);
    assert_eq!(beyond.status(), "ready");
    assert!(beyond.assets().is_empty());
}
