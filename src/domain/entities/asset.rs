use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    constants::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH},
    entities::rendition::SourceMedia,
    errors::ParseMediaKindError,
};

// ───── Media Kind ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Provider resource segment and database value.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Maps a MIME type (`video/mp4`, `image/png; charset=...`) to a kind.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        match essence.split_once('/') {
            Some(("video", sub)) if !sub.is_empty() => Some(MediaKind::Video),
            Some(("image", sub)) if !sub.is_empty() => Some(MediaKind::Image),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = ParseMediaKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            _ => Err(ParseMediaKindError { value: s.to_string() }),
        }
    }
}

impl TryFrom<String> for MediaKind {
    type Error = ParseMediaKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub source_reference: String,
    #[sqlx(try_from = "String")]
    pub media_kind: MediaKind,
    pub original_size: i64,
    /// `None` while the provider has not reported an optimized size.
    pub processed_size: Option<i64>,
    pub duration_seconds: i64,
    pub created_at: DateTime<Utc>,
}

impl Asset {
    pub fn is_processed(&self) -> bool {
        self.processed_size.is_some()
    }

    /// `processed / original`, `None` while pending or for zero-byte originals.
    pub fn compression_ratio(&self) -> Option<f64> {
        match self.processed_size {
            Some(processed) if self.original_size > 0 => {
                Some(processed as f64 / self.original_size as f64)
            }
            _ => None,
        }
    }

    /// Bytes saved by optimization; negative when the provider grew the file.
    pub fn bytes_saved(&self) -> Option<i64> {
        self.processed_size.map(|processed| self.original_size - processed)
    }

    /// Everything the resolver needs to derive renditions of this asset.
    pub fn source(&self) -> SourceMedia {
        SourceMedia {
            source_reference: self.source_reference.clone(),
            media_kind: self.media_kind,
            duration_seconds: self.duration_seconds,
        }
    }
}

#[derive(Debug, Clone, Validate)]
pub struct NewAsset {
    pub id: Uuid,

    #[validate(
        length(max = MAX_TITLE_LENGTH, message = "Title is too long"),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH, message = "Description is too long"))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Source reference cannot be empty"))]
    pub source_reference: String,

    pub media_kind: MediaKind,

    #[validate(range(min = 0, message = "Original size cannot be negative"))]
    pub original_size: i64,

    #[validate(range(min = 0, message = "Processed size cannot be negative"))]
    pub processed_size: Option<i64>,

    #[validate(range(min = 0, message = "Duration cannot be negative"))]
    pub duration_seconds: i64,
}

impl NewAsset {
    /// Builds an insert model with a fresh id; title and description are normalized.
    pub fn new(
        title: &str,
        description: Option<&str>,
        source_reference: impl Into<String>,
        media_kind: MediaKind,
        original_size: i64,
        processed_size: Option<i64>,
        duration_seconds: i64,
    ) -> Self {
        NewAsset {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description: normalize_description(description),
            source_reference: source_reference.into(),
            media_kind,
            original_size,
            processed_size,
            duration_seconds,
        }
    }
}

/// Blank descriptions are stored as `NULL`.
pub fn normalize_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut err = ValidationError::new("empty_title");
        err.message = Some("Title cannot be empty".into());
        return Err(err);
    }
    Ok(())
}
