//! Derives delivery URLs for renditions.
//!
//! Nothing here touches the network: the provider materializes a rendition
//! the first time its URL is fetched. Transformation components are always
//! emitted in the same order so equal inputs give byte-identical URLs:
//!
//! 1. dimensions (`w_`, `h_`)
//! 2. crop and gravity (`c_`, `g_`)
//! 3. aspect ratio (`ar_`)
//! 4. still-frame offset (`so_`, video thumbnails only; images reject a non-zero offset)
//! 5. time window, as its own chained segment (`e_preview:duration_N`)

use std::sync::Arc;

use crate::{
    entities::{
        asset::MediaKind,
        rendition::{
            AspectRatio, CropStrategy, DeliveryHandle, Gravity, RenditionRequest, RenditionShape,
            RenditionSpec, SourceMedia,
        },
    },
    errors::AppError,
    settings::AppConfig,
    use_cases::catalog::RenditionCatalog,
};

#[derive(Debug, Clone)]
pub struct TransformResolver {
    delivery_base: String,
    cloud_name: String,
    catalog: Arc<RenditionCatalog>,
}

impl TransformResolver {
    pub fn new(
        delivery_base: &str,
        cloud_name: impl Into<String>,
        catalog: Arc<RenditionCatalog>,
    ) -> Self {
        TransformResolver {
            delivery_base: delivery_base.trim_end_matches('/').to_string(),
            cloud_name: cloud_name.into(),
            catalog,
        }
    }

    pub fn from_config(config: &AppConfig, catalog: Arc<RenditionCatalog>) -> Self {
        Self::new(&config.delivery_base, config.provider_cloud_name.clone(), catalog)
    }

    pub fn catalog(&self) -> &RenditionCatalog {
        &self.catalog
    }

    /// Delivery URL of `spec` applied to `source`.
    pub fn resolve(
        &self,
        source: &SourceMedia,
        spec: &RenditionSpec,
    ) -> Result<DeliveryHandle, AppError> {
        check_source(source)?;

        let is_video = source.media_kind == MediaKind::Video;

        let (segments, extension) = match &spec.shape {
            RenditionShape::Crop { width, height, aspect_ratio, crop, gravity } => {
                let step = TransformStep::new(*width, *height, *crop, *gravity)
                    .aspect_ratio(*aspect_ratio);
                (vec![step.render()], None)
            }
            RenditionShape::ThumbnailStill { width, height, crop, gravity, offset_seconds } => {
                let mut step = TransformStep::new(*width, *height, *crop, *gravity);
                if is_video {
                    step = step.start_offset(*offset_seconds);
                } else if *offset_seconds > 0 {
                    return Err(AppError::IncompatibleRendition(format!(
                        "'{}' picks a frame at {}s and '{}' is a still image",
                        spec.name, offset_seconds, source.source_reference
                    )));
                }
                (vec![step.render()], is_video.then_some("jpg"))
            }
            RenditionShape::PreviewWindow { width, height, crop, gravity, seconds } => {
                if !is_video || source.duration_seconds == 0 {
                    return Err(AppError::IncompatibleRendition(format!(
                        "'{}' is a video preview and '{}' has no playable duration",
                        spec.name, source.source_reference
                    )));
                }
                if *seconds == 0 {
                    return Err(AppError::IncompatibleRendition(format!(
                        "'{}' has an empty preview window",
                        spec.name
                    )));
                }
                let step = TransformStep::new(*width, *height, *crop, *gravity);
                (
                    vec![step.render(), format!("e_preview:duration_{}", seconds)],
                    Some("mp4"),
                )
            }
        };

        Ok(self.build(source, &segments, extension))
    }

    /// Identity transform: the full, un-cropped asset.
    pub fn resolve_original(&self, source: &SourceMedia) -> DeliveryHandle {
        self.build(source, &[], None)
    }

    pub fn resolve_named(
        &self,
        source: &SourceMedia,
        name: &str,
    ) -> Result<DeliveryHandle, AppError> {
        let spec = self.catalog.lookup(name)?;
        self.resolve(source, spec)
    }

    pub fn resolve_request(
        &self,
        source: &SourceMedia,
        request: &RenditionRequest,
    ) -> Result<DeliveryHandle, AppError> {
        match request {
            RenditionRequest::Original => {
                check_source(source)?;
                Ok(self.resolve_original(source))
            }
            RenditionRequest::Named(name) => self.resolve_named(source, name),
        }
    }

    fn build(
        &self,
        source: &SourceMedia,
        segments: &[String],
        extension: Option<&str>,
    ) -> DeliveryHandle {
        let mut url = format!(
            "{}/{}/{}/upload/",
            self.delivery_base,
            self.cloud_name,
            source.media_kind.as_str()
        );
        for segment in segments {
            url.push_str(segment);
            url.push('/');
        }
        url.push_str(&encode_public_id(&source.source_reference));
        if let Some(ext) = extension {
            url.push('.');
            url.push_str(ext);
        }
        DeliveryHandle::new(url)
    }
}

fn check_source(source: &SourceMedia) -> Result<(), AppError> {
    if source.source_reference.trim().is_empty() {
        return Err(AppError::invalid("source_reference", "Source reference cannot be empty"));
    }
    if source.duration_seconds < 0 {
        return Err(AppError::invalid("duration_seconds", "Duration cannot be negative"));
    }
    Ok(())
}

/// Percent-encodes each folder segment of a public id, keeping the `/` separators.
fn encode_public_id(public_id: &str) -> String {
    public_id
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// One comma-joined transformation component, rendered in fixed order.
struct TransformStep {
    width: u32,
    height: u32,
    crop: CropStrategy,
    gravity: Gravity,
    aspect_ratio: Option<AspectRatio>,
    start_offset: Option<u32>,
}

impl TransformStep {
    fn new(width: u32, height: u32, crop: CropStrategy, gravity: Gravity) -> Self {
        TransformStep {
            width,
            height,
            crop,
            gravity,
            aspect_ratio: None,
            start_offset: None,
        }
    }

    fn aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    fn start_offset(mut self, seconds: u32) -> Self {
        self.start_offset = Some(seconds);
        self
    }

    fn render(&self) -> String {
        let mut parts = vec![
            format!("w_{}", self.width),
            format!("h_{}", self.height),
            format!("c_{}", self.crop.code()),
            format!("g_{}", self.gravity.code()),
        ];
        if let Some(ratio) = self.aspect_ratio {
            parts.push(format!("ar_{}", ratio));
        }
        if let Some(offset) = self.start_offset {
            parts.push(format!("so_{}", offset));
        }
        parts.join(",")
    }
}
