use std::fmt;

use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::entities::asset::MediaKind;

// ───── Upload Input ──────────────────────────────────────────────────

#[derive(Debug, MultipartForm)]
pub struct AssetUploadForm {
    #[multipart(rename = "file")]
    pub file: TempFile,

    #[multipart(rename = "title")]
    pub title: Text<String>,

    #[multipart(rename = "description")]
    pub description: Option<Text<String>>,

    #[multipart(rename = "originalSize")]
    pub original_size: Option<Text<i64>>,
}

/// Raw upload as accepted at the ingestion boundary.
#[derive(Clone, Default)]
pub struct UploadRequest {
    pub title: String,
    pub description: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    /// Caller-reported size; falls back to the payload length when absent.
    pub original_size: Option<i64>,
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn new(title: impl Into<String>, bytes: Vec<u8>) -> Self {
        UploadRequest {
            title: title.into(),
            bytes,
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_original_size(mut self, original_size: i64) -> Self {
        self.original_size = Some(original_size);
        self
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("title", &self.title)
            .field("description", &self.description)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("original_size", &self.original_size)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

// ───── Provider Contract ─────────────────────────────────────────────

/// What the coordinator hands to the media provider.
///
/// Clones share one reference-counted buffer.
#[derive(Clone)]
pub struct ProviderUpload {
    pub media_kind: MediaKind,
    pub file_name: String,
    pub bytes: Bytes,
}

impl fmt::Debug for ProviderUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderUpload")
            .field("media_kind", &self.media_kind)
            .field("file_name", &self.file_name)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Raw acknowledgment; nothing here is trusted until the coordinator checks it.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProviderAck {
    #[serde(rename = "public_id", default)]
    pub source_reference: String,
    #[serde(rename = "bytes", default)]
    pub processed_size: Option<i64>,
    #[serde(rename = "duration", default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub resource_type: Option<String>,
}

// ───── Ingestion Stages ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    Received,
    Forwarded,
    Acknowledged,
    Registered,
    Failed,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadStage::Received => "received",
            UploadStage::Forwarded => "forwarded",
            UploadStage::Acknowledged => "acknowledged",
            UploadStage::Registered => "registered",
            UploadStage::Failed => "failed",
        };
        write!(f, "{s}")
    }
}
