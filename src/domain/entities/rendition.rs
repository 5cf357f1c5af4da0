use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::asset::MediaKind;

/// Rendition selector meaning "the full, un-cropped asset".
pub const ORIGINAL_RENDITION: &str = "original";

// ───── Transform Parameters ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const fn new(width: u32, height: u32) -> Self {
        AspectRatio { width, height }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropStrategy {
    Fill,
    Fit,
    Limit,
    Pad,
    Thumb,
}

impl CropStrategy {
    pub fn code(&self) -> &'static str {
        match self {
            CropStrategy::Fill => "fill",
            CropStrategy::Fit => "fit",
            CropStrategy::Limit => "limit",
            CropStrategy::Pad => "pad",
            CropStrategy::Thumb => "thumb",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    Auto,
    Center,
    Face,
    North,
    South,
    East,
    West,
}

impl Gravity {
    pub fn code(&self) -> &'static str {
        match self {
            Gravity::Auto => "auto",
            Gravity::Center => "center",
            Gravity::Face => "face",
            Gravity::North => "north",
            Gravity::South => "south",
            Gravity::East => "east",
            Gravity::West => "west",
        }
    }
}

// ───── Rendition Specs ───────────────────────────────────────────────

/// Every rendition is one of these shapes; the resolver matches them exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenditionShape {
    /// Fixed-format crop for a target platform.
    Crop {
        width: u32,
        height: u32,
        aspect_ratio: AspectRatio,
        crop: CropStrategy,
        gravity: Gravity,
    },
    /// Single still frame (the image itself for image assets).
    ThumbnailStill {
        width: u32,
        height: u32,
        crop: CropStrategy,
        gravity: Gravity,
        offset_seconds: u32,
    },
    /// Short looping clip of the first `seconds` of a video.
    PreviewWindow {
        width: u32,
        height: u32,
        crop: CropStrategy,
        gravity: Gravity,
        seconds: u32,
    },
}

impl RenditionShape {
    pub fn dimensions(&self) -> (u32, u32) {
        match *self {
            RenditionShape::Crop { width, height, .. }
            | RenditionShape::ThumbnailStill { width, height, .. }
            | RenditionShape::PreviewWindow { width, height, .. } => (width, height),
        }
    }

    pub fn requires_video(&self) -> bool {
        matches!(self, RenditionShape::PreviewWindow { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenditionSpec {
    pub name: String,
    #[serde(flatten)]
    pub shape: RenditionShape,
}

impl RenditionSpec {
    pub fn new(name: impl Into<String>, shape: RenditionShape) -> Self {
        RenditionSpec { name: name.into(), shape }
    }

    pub fn crop(name: &str, width: u32, height: u32, aspect_ratio: AspectRatio) -> Self {
        Self::new(name, RenditionShape::Crop {
            width,
            height,
            aspect_ratio,
            crop: CropStrategy::Fill,
            gravity: Gravity::Auto,
        })
    }
}

// ───── Resolution Inputs & Outputs ───────────────────────────────────

/// The root input of every rendition derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMedia {
    pub source_reference: String,
    pub media_kind: MediaKind,
    #[serde(default)]
    pub duration_seconds: i64,
}

impl SourceMedia {
    pub fn video(source_reference: impl Into<String>, duration_seconds: i64) -> Self {
        SourceMedia {
            source_reference: source_reference.into(),
            media_kind: MediaKind::Video,
            duration_seconds,
        }
    }

    pub fn image(source_reference: impl Into<String>) -> Self {
        SourceMedia {
            source_reference: source_reference.into(),
            media_kind: MediaKind::Image,
            duration_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenditionRequest {
    Original,
    Named(String),
}

impl RenditionRequest {
    pub fn parse(selector: &str) -> Self {
        let selector = selector.trim();
        if selector.eq_ignore_ascii_case(ORIGINAL_RENDITION) {
            RenditionRequest::Original
        } else {
            RenditionRequest::Named(selector.to_string())
        }
    }
}

impl From<&str> for RenditionRequest {
    fn from(selector: &str) -> Self {
        RenditionRequest::parse(selector)
    }
}

/// A fetchable URL served lazily by the media provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DeliveryHandle(String);

impl DeliveryHandle {
    pub(crate) fn new(url: String) -> Self {
        DeliveryHandle(url)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DeliveryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub source_reference: String,
    pub media_kind: MediaKind,
    #[serde(default)]
    pub duration_seconds: i64,
    pub rendition: String,
}

#[derive(Debug, Serialize)]
pub struct RenditionResponse {
    pub rendition: String,
    pub url: DeliveryHandle,
}
