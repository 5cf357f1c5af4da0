use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::upload::{ProviderAck, ProviderUpload},
    errors::AppError,
};

/// External media-transformation provider.
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// Stores and optimizes the bytes; returns the provider's raw acknowledgment.
    async fn upload(&self, upload: &ProviderUpload) -> Result<ProviderAck, AppError>;
}

#[async_trait]
impl<T> MediaProvider for Arc<T>
where
    T: MediaProvider + ?Sized,
{
    async fn upload(&self, upload: &ProviderUpload) -> Result<ProviderAck, AppError> {
        (**self).upload(upload).await
    }
}
