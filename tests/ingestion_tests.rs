
use std::sync::Arc;

use chrono::Utc;
use clipforge_backend::{
    constants::DEFAULT_MAX_UPLOAD_BYTES,
    entities::{
        asset::{Asset, MediaKind, NewAsset},
        upload::{ProviderAck, UploadRequest},
    },
    errors::AppError,
    use_cases::{
        catalog::{RenditionCatalog, THUMBNAIL},
        ingestion::{detect_media_kind, IngestionCoordinator, Received},
        lister::AssetLister,
        resolver::TransformResolver,
    },
};
use test_utils::*;

const MAX: usize = DEFAULT_MAX_UPLOAD_BYTES as usize;

fn stored(asset: &NewAsset) -> Asset {
    Asset {
        id: asset.id,
        title: asset.title.clone(),
        description: asset.description.clone(),
        source_reference: asset.source_reference.clone(),
        media_kind: asset.media_kind,
        original_size: asset.original_size,
        processed_size: asset.processed_size,
        duration_seconds: asset.duration_seconds,
        created_at: Utc::now(),
    }
}

fn clip_upload() -> UploadRequest {
    UploadRequest::new("Clip A", mp4_bytes(4096))
        .with_file_name("clip-a.mp4")
        .with_content_type("video/mp4")
        .with_original_size(1_000_000)
}

#[actix_rt::test]
async fn upload_registers_asset_with_acknowledged_sizes() {
    let repo = Arc::new(InMemoryAssetRepo::new());
    let provider = Arc::new(ScriptedProvider::acking(video_ack("abc123", 250_000, 42.0)));
    let coordinator = IngestionCoordinator::new(repo.clone(), provider.clone(), MAX);

    let asset = coordinator.ingest(clip_upload()).await.unwrap();

    assert_eq!(asset.title, "Clip A");
    assert_eq!(asset.source_reference, "abc123");
    assert_eq!(asset.media_kind, MediaKind::Video);
    assert_eq!(asset.original_size, 1_000_000);
    assert_eq!(asset.processed_size, Some(250_000));
    assert_eq!(asset.duration_seconds, 42);
    assert_eq!(asset.compression_ratio(), Some(0.25));
    assert_eq!(repo.count(), 1);
    assert_eq!(provider.call_count(), 1);

    let listing = AssetLister::new(repo.clone()).list().await.unwrap();
    assert_eq!(listing.status(), "ready");
    assert_eq!(listing.assets().len(), 1);
    let listed = &listing.assets()[0];
    assert_eq!(listed, &asset);
    assert_eq!(listed.source_reference, "abc123");
    assert_eq!(listed.original_size, 1_000_000);
    assert_eq!(listed.processed_size, Some(250_000));
    assert_eq!(listed.duration_seconds, 42);

    let resolver = TransformResolver::new(
        "https://res.cloudinary.com",
        "demo",
        Arc::new(RenditionCatalog::standard()),
    );
    let thumbnail = resolver.resolve_named(&asset.source(), THUMBNAIL).unwrap();
    assert_eq!(
        thumbnail.as_str(),
        "https://res.cloudinary.com/demo/video/upload/w_400,h_225,c_fill,g_auto,so_0/abc123.jpg"
    );
}

#[actix_rt::test]
async fn provider_failure_never_touches_the_registry() {
    let mut repo = MockAssetRepo::new();
    repo.expect_create_asset().never();

    let mut provider = MockProvider::new();
    provider
        .expect_upload()
        .times(1)
        .returning(|_| Err(AppError::UpstreamError("connection reset".into())));

    let coordinator = IngestionCoordinator::new(repo, provider, MAX);

    let result = coordinator.ingest(clip_upload()).await;

    assert!(matches!(result, Err(AppError::UpstreamError(_))));
}

#[actix_rt::test]
async fn negative_processed_size_is_an_upstream_fault() {
    let mut repo = MockAssetRepo::new();
    repo.expect_create_asset().never();

    let mut provider = MockProvider::new();
    provider
        .expect_upload()
        .returning(|_| Ok(video_ack("abc123", -1, 42.0)));

    let coordinator = IngestionCoordinator::new(repo, provider, MAX);

    let result = coordinator.ingest(clip_upload()).await;

    assert!(matches!(result, Err(AppError::UpstreamError(_))));
}

#[actix_rt::test]
async fn missing_processed_size_is_not_coerced_to_zero() {
    let mut repo = MockAssetRepo::new();
    repo.expect_create_asset().never();

    let mut provider = MockProvider::new();
    provider.expect_upload().returning(|_| {
        Ok(ProviderAck {
            processed_size: None,
            ..video_ack("abc123", 0, 42.0)
        })
    });

    let coordinator = IngestionCoordinator::new(repo, provider, MAX);

    let result = coordinator.ingest(clip_upload()).await;

    assert!(matches!(result, Err(AppError::UpstreamError(_))));
}

#[actix_rt::test]
async fn registry_failure_after_acknowledgment_is_a_storage_error() {
    let mut repo = MockAssetRepo::new();
    repo.expect_create_asset()
        .times(1)
        .returning(|_| Err(AppError::StorageError("connection refused".into())));

    let mut provider = MockProvider::new();
    provider
        .expect_upload()
        .times(1)
        .returning(|_| Ok(video_ack("abc123", 250_000, 42.0)));

    let coordinator = IngestionCoordinator::new(repo, provider, MAX);

    let result = coordinator.ingest(clip_upload()).await;

    assert!(matches!(result, Err(AppError::StorageError(_))));
}

#[actix_rt::test]
async fn registry_receives_exactly_the_acknowledged_record() {
    let mut repo = MockAssetRepo::new();
    repo.expect_create_asset()
        .withf(|asset: &NewAsset| {
            asset.source_reference == "abc123"
                && asset.processed_size == Some(250_000)
                && asset.original_size == 1_000_000
                && asset.duration_seconds == 42
                && asset.description.is_none()
        })
        .times(1)
        .returning(|asset| Ok(stored(asset)));

    let mut provider = MockProvider::new();
    provider
        .expect_upload()
        .withf(|upload| upload.media_kind == MediaKind::Video && upload.file_name == "clip-a.mp4")
        .returning(|_| Ok(video_ack("abc123", 250_000, 41.6)));

    let coordinator = IngestionCoordinator::new(repo, provider, MAX);

    let asset = coordinator
        .ingest(clip_upload().with_description("   "))
        .await
        .unwrap();

    assert_eq!(asset.duration_seconds, 42);
}

#[actix_rt::test]
async fn invalid_upload_is_rejected_before_the_provider() {
    let repo = Arc::new(InMemoryAssetRepo::new());
    let provider = Arc::new(ScriptedProvider::acking(video_ack("abc123", 1, 1.0)));
    let coordinator = IngestionCoordinator::new(repo.clone(), provider.clone(), MAX);

    let result = coordinator
        .ingest(UploadRequest::new("   ", mp4_bytes(64)))
        .await;

    match result {
        Err(AppError::ValidationError(errors)) => {
            assert!(errors.iter().any(|e| e.field == "title"));
        }
        other => panic!("expected ValidationError, got {:?}", other),
    }
    assert_eq!(provider.call_count(), 0);
    assert_eq!(repo.count(), 0);
}

#[actix_rt::test]
async fn oversized_upload_is_rejected_before_the_provider() {
    let repo = Arc::new(InMemoryAssetRepo::new());
    let provider = Arc::new(ScriptedProvider::acking(video_ack("abc123", 1, 1.0)));
    let coordinator = IngestionCoordinator::new(repo.clone(), provider.clone(), 1024);

    let result = coordinator
        .ingest(UploadRequest::new("Too big", mp4_bytes(2048)))
        .await;

    assert!(matches!(result, Err(AppError::ValidationError(_))));
    assert_eq!(provider.call_count(), 0);
}

#[test]
fn validation_reports_every_problem_at_once() {
    let request = UploadRequest::new("", Vec::new()).with_original_size(-5);

    match Received::accept(request, MAX) {
        Err(AppError::ValidationError(errors)) => {
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            assert!(fields.contains(&"title"));
            assert!(fields.contains(&"file"));
            assert!(fields.contains(&"original_size"));
        }
        other => panic!("expected ValidationError, got {:?}", other),
    }
}

#[test]
fn non_media_payload_is_rejected() {
    let request = UploadRequest::new("Notes", b"plain text notes".to_vec())
        .with_content_type("text/plain");

    assert!(matches!(
        Received::accept(request, MAX),
        Err(AppError::ValidationError(_))
    ));
}

#[test]
fn sniffed_kind_wins_over_declared_content_type() {
    assert_eq!(detect_media_kind(&png_bytes(32), Some("video/mp4")), Some(MediaKind::Image));
    assert_eq!(detect_media_kind(&mp4_bytes(32), None), Some(MediaKind::Video));
    assert_eq!(detect_media_kind(b"opaque", Some("video/webm")), Some(MediaKind::Video));
    assert_eq!(detect_media_kind(b"opaque", None), None);
}

#[test]
fn image_acknowledgment_has_zero_duration() {
    let forwarded = Received::accept(UploadRequest::new("Cat", png_bytes(128)), MAX)
        .unwrap()
        .forward();

    let acknowledged = forwarded
        .accept_ack(ProviderAck {
            duration_seconds: Some(12.0),
            ..image_ack("cat", 90)
        })
        .unwrap();

    assert_eq!(acknowledged.asset().media_kind, MediaKind::Image);
    assert_eq!(acknowledged.asset().duration_seconds, 0);
    assert_eq!(acknowledged.asset().original_size, 128);
}

#[test]
fn video_acknowledgment_without_duration_is_rejected() {
    let forwarded = Received::accept(UploadRequest::new("Clip", mp4_bytes(128)), MAX)
        .unwrap()
        .forward();

    let result = forwarded.accept_ack(ProviderAck {
        duration_seconds: None,
        ..video_ack("abc123", 90, 0.0)
    });

    assert!(matches!(result, Err(AppError::UpstreamError(_))));
}

#[test]
fn acknowledgment_without_public_id_is_rejected() {
    let forwarded = Received::accept(UploadRequest::new("Clip", mp4_bytes(128)), MAX)
        .unwrap()
        .forward();

    let result = forwarded.accept_ack(video_ack("", 90, 3.0));

    assert!(matches!(result, Err(AppError::UpstreamError(_))));
}

#[actix_rt::test]
async fn lister_returns_assets_newest_first() {
    let repo = Arc::new(InMemoryAssetRepo::new());
    let coordinator = IngestionCoordinator::new(
        repo.clone(),
        ScriptedProvider::acking(video_ack("shared", 100, 5.0)),
        MAX,
    );

    for title in ["first", "second", "third"] {
        coordinator
            .ingest(UploadRequest::new(title, mp4_bytes(256)))
            .await
            .unwrap();
    }

    let listing = AssetLister::new(repo).list().await.unwrap();

    let titles: Vec<&str> = listing.assets().iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    assert_eq!(listing.status(), "ready");
}
