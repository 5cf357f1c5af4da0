use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::{
    entities::upload::{ProviderAck, ProviderUpload},
    errors::AppError,
    repositories::media_provider::MediaProvider,
    settings::AppConfig,
};

/// Incoming transformation applied at upload time; the acknowledged `bytes`
/// is therefore the optimized size.
const INCOMING_TRANSFORMATION: &str = "q_auto";

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorMessage {
    message: String,
}

#[derive(Clone)]
pub struct CloudinaryProvider {
    client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: Zeroizing<String>,
    folder: Option<String>,
}

impl CloudinaryProvider {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout())
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(CloudinaryProvider {
            client,
            api_base: config.provider_api_base.trim_end_matches('/').to_string(),
            cloud_name: config.provider_cloud_name.clone(),
            api_key: config.provider_api_key.clone(),
            api_secret: config.provider_api_secret.clone(),
            folder: config
                .provider_upload_folder
                .as_deref()
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string),
        })
    }

    fn upload_url(&self, upload: &ProviderUpload) -> String {
        format!(
            "{}/v1_1/{}/{}/upload",
            self.api_base,
            self.cloud_name,
            upload.media_kind.as_str()
        )
    }

    /// Signed parameters, sorted by key.
    fn signed_params(&self, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(3);
        if let Some(folder) = &self.folder {
            params.push(("folder", folder.clone()));
        }
        params.push(("timestamp", timestamp.to_string()));
        params.push(("transformation", INCOMING_TRANSFORMATION.to_string()));
        params.sort_by(|a, b| a.0.cmp(b.0));
        params
    }
}

/// SHA-256 hex over `k1=v1&k2=v2...` followed by the secret.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[async_trait]
impl MediaProvider for CloudinaryProvider {
    #[tracing::instrument(skip(self, upload), fields(media_kind = %upload.media_kind, size = upload.bytes.len()))]
    async fn upload(&self, upload: &ProviderUpload) -> Result<ProviderAck, AppError> {
        let timestamp = Utc::now().timestamp();
        let params = self.signed_params(timestamp);
        let signature = sign_params(&params, &self.api_secret);

        let file_part = Part::stream_with_length(upload.bytes.clone(), upload.bytes.len() as u64)
            .file_name(upload.file_name.clone());

        let mut form = Form::new()
            .part("file", file_part)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in params {
            form = form.text(key, value);
        }

        let response = self.client
            .post(self.upload_url(upload))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| body.chars().take(200).collect());
            warn!(%status, "Media provider rejected upload: {}", message);
            return Err(AppError::UpstreamError(format!("{} ({})", message, status)));
        }

        let ack: ProviderAck = serde_json::from_str(&body).map_err(|e| {
            AppError::UpstreamError(format!("Malformed provider acknowledgment: {}", e))
        })?;

        info!(source_reference = %ack.source_reference, "Media provider acknowledged upload");
        Ok(ack)
    }
}
