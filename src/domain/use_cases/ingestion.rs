//! Upload state machine: `Received → Forwarded → Acknowledged → Registered`.
//!
//! Each state is its own type and each transition consumes the previous one,
//! so an asset row can only be written from an `Acknowledged` upload.

use bytes::Bytes;
use tracing::{error, info, instrument, warn};

use crate::{
    constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH},
    entities::{
        asset::{normalize_description, Asset, MediaKind, NewAsset},
        upload::{ProviderAck, ProviderUpload, UploadRequest, UploadStage},
    },
    errors::{AppError, FieldError},
    repositories::{asset::AssetRepository, media_provider::MediaProvider},
};

const DEFAULT_FILE_NAME: &str = "upload";

/// Upload that passed caller-side validation; nothing has left the process yet.
#[derive(Debug)]
pub struct Received {
    title: String,
    description: Option<String>,
    original_size: i64,
    upload: ProviderUpload,
}

/// Bytes handed to the provider; awaiting its acknowledgment.
#[derive(Debug)]
pub struct Forwarded {
    title: String,
    description: Option<String>,
    original_size: i64,
    upload: ProviderUpload,
}

/// Provider acknowledged with a coherent record; ready to register.
#[derive(Debug)]
pub struct Acknowledged {
    asset: NewAsset,
}

impl Received {
    pub fn accept(request: UploadRequest, max_upload_bytes: usize) -> Result<Self, AppError> {
        let mut errors = Vec::new();
        let mut reject = |field: &str, message: String| {
            errors.push(FieldError { field: field.to_string(), message });
        };

        let title = request.title.trim().to_string();
        if title.is_empty() {
            reject("title", "Title cannot be empty".into());
        } else if title.chars().count() as u64 > MAX_TITLE_LENGTH {
            reject("title", format!("Title cannot exceed {} characters", MAX_TITLE_LENGTH));
        }

        let description = normalize_description(request.description.as_deref());
        if description.as_ref().is_some_and(|d| d.chars().count() as u64 > MAX_DESCRIPTION_LENGTH) {
            reject(
                "description",
                format!("Description cannot exceed {} characters", MAX_DESCRIPTION_LENGTH),
            );
        }

        if request.bytes.is_empty() {
            reject("file", "File is empty".into());
        } else if request.bytes.len() > max_upload_bytes {
            reject("file", format!("File exceeds the {} byte upload limit", max_upload_bytes));
        }

        let original_size = request.original_size.unwrap_or(request.bytes.len() as i64);
        if original_size < 0 {
            reject("original_size", "Original size cannot be negative".into());
        } else if original_size as u64 > max_upload_bytes as u64 {
            reject(
                "original_size",
                format!("Original size exceeds the {} byte upload limit", max_upload_bytes),
            );
        }

        let media_kind = detect_media_kind(&request.bytes, request.content_type.as_deref());
        if media_kind.is_none() && !request.bytes.is_empty() {
            reject("file", "Only image and video uploads are supported".into());
        }

        match media_kind {
            Some(media_kind) if errors.is_empty() => Ok(Received {
                title,
                description,
                original_size,
                upload: ProviderUpload {
                    media_kind,
                    file_name: request
                        .file_name
                        .filter(|n| !n.trim().is_empty())
                        .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
                    bytes: Bytes::from(request.bytes),
                },
            }),
            _ => Err(AppError::ValidationError(errors)),
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        self.upload.media_kind
    }

    pub fn forward(self) -> Forwarded {
        Forwarded {
            title: self.title,
            description: self.description,
            original_size: self.original_size,
            upload: self.upload,
        }
    }
}

impl Forwarded {
    /// Awaits the provider and checks its acknowledgment.
    pub async fn acknowledge<P>(self, provider: &P) -> Result<Acknowledged, AppError>
    where
        P: MediaProvider + ?Sized,
    {
        let ack = provider.upload(&self.upload).await?;
        self.accept_ack(ack)
    }

    /// A missing or negative processed size is an upstream fault, never coerced to 0.
    pub fn accept_ack(self, ack: ProviderAck) -> Result<Acknowledged, AppError> {
        let source_reference = ack.source_reference.trim().to_string();
        if source_reference.is_empty() {
            return Err(AppError::UpstreamError(
                "Acknowledgment is missing a source reference".into(),
            ));
        }

        let processed_size = match ack.processed_size {
            Some(size) if size >= 0 => size,
            Some(size) => {
                return Err(AppError::UpstreamError(format!(
                    "Acknowledgment reported a negative processed size ({})",
                    size
                )));
            }
            None => {
                return Err(AppError::UpstreamError(
                    "Acknowledgment is missing the processed size".into(),
                ));
            }
        };

        let media_kind = match ack.resource_type.as_deref() {
            Some(resource_type) => resource_type
                .parse::<MediaKind>()
                .map_err(|e| AppError::UpstreamError(e.to_string()))?,
            None => self.upload.media_kind,
        };

        let duration_seconds = match (media_kind, ack.duration_seconds) {
            (MediaKind::Image, _) => 0,
            (MediaKind::Video, Some(d)) if d.is_finite() && d >= 0.0 => d.round() as i64,
            (MediaKind::Video, Some(d)) => {
                return Err(AppError::UpstreamError(format!(
                    "Acknowledgment reported an invalid duration ({})",
                    d
                )));
            }
            (MediaKind::Video, None) => {
                return Err(AppError::UpstreamError(
                    "Acknowledgment for a video is missing its duration".into(),
                ));
            }
        };

        Ok(Acknowledged {
            asset: NewAsset::new(
                &self.title,
                self.description.as_deref(),
                source_reference,
                media_kind,
                self.original_size,
                Some(processed_size),
                duration_seconds,
            ),
        })
    }
}

impl Acknowledged {
    pub fn asset(&self) -> &NewAsset {
        &self.asset
    }

    /// Issues the single registry write for this upload.
    pub async fn register<R>(self, asset_repo: &R) -> Result<Asset, AppError>
    where
        R: AssetRepository + ?Sized,
    {
        asset_repo.create_asset(&self.asset).await.map_err(|e| {
            // The provider already holds the media; a retry re-uploads it.
            error!(
                source_reference = %self.asset.source_reference,
                "Acknowledged upload could not be registered: {}", e
            );
            e
        })
    }
}

/// Sniffed content wins over the caller's declared content type.
pub fn detect_media_kind(bytes: &[u8], declared: Option<&str>) -> Option<MediaKind> {
    infer::get(bytes)
        .and_then(|kind| MediaKind::from_mime(kind.mime_type()))
        .or_else(|| declared.and_then(MediaKind::from_mime))
}

pub struct IngestionCoordinator<R, P>
where
    R: AssetRepository,
    P: MediaProvider,
{
    pub asset_repo: R,
    pub provider: P,
    max_upload_bytes: usize,
}

impl<R, P> IngestionCoordinator<R, P>
where
    R: AssetRepository,
    P: MediaProvider,
{
    pub fn new(asset_repo: R, provider: P, max_upload_bytes: usize) -> Self {
        IngestionCoordinator {
            asset_repo,
            provider,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Runs one upload through the whole state machine. Single attempt, no retries.
    #[instrument(skip(self, request), fields(title = %request.title, size = request.bytes.len()))]
    pub async fn ingest(&self, request: UploadRequest) -> Result<Asset, AppError> {
        let received = Received::accept(request, self.max_upload_bytes).map_err(|e| {
            info!(stage = %UploadStage::Received, "Upload rejected: {}", e);
            e
        })?;
        info!(stage = %UploadStage::Received, media_kind = %received.media_kind(), "Upload accepted");

        let forwarded = received.forward();
        info!(stage = %UploadStage::Forwarded, "Upload handed to media provider");

        let acknowledged = forwarded.acknowledge(&self.provider).await.map_err(|e| {
            warn!(stage = %UploadStage::Failed, from = %UploadStage::Forwarded, "Upload failed: {}", e);
            e
        })?;
        info!(
            stage = %UploadStage::Acknowledged,
            source_reference = %acknowledged.asset().source_reference,
            processed_size = ?acknowledged.asset().processed_size,
            "Provider acknowledged upload"
        );

        let asset = acknowledged.register(&self.asset_repo).await.map_err(|e| {
            warn!(stage = %UploadStage::Failed, from = %UploadStage::Acknowledged, "Upload failed: {}", e);
            e
        })?;
        info!(stage = %UploadStage::Registered, asset_id = %asset.id, "Asset registered");

        Ok(asset)
    }
}
