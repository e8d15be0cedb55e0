use crate::errors::storage_error;
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use domain::{AttachmentStorage, TodoError};
use shared::Config;
use std::time::Duration;
use tracing::info;

/// Attachment bucket that hands out presigned `PutObject` URLs
#[derive(Clone)]
pub struct S3AttachmentStorage {
    client: Client,
    bucket: String,
    expires_in: Duration,
}

impl S3AttachmentStorage {
    pub fn new(sdk_config: &SdkConfig, config: &Config) -> Self {
        Self::from_client(
            Client::new(sdk_config),
            config.attachments_bucket.clone(),
            config.signed_url_expiration,
        )
    }

    pub fn from_client(client: Client, bucket: String, expires_in: Duration) -> Self {
        Self {
            client,
            bucket,
            expires_in,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl AttachmentStorage for S3AttachmentStorage {
    async fn presigned_upload_url(&self, key: &str) -> Result<String, TodoError> {
        info!(
            bucket = %self.bucket,
            key = key,
            expires_in_secs = self.expires_in.as_secs(),
            "Generating upload URL"
        );

        let presigning = PresigningConfig::expires_in(self.expires_in)
            .map_err(|e| storage_error("PresigningConfig", e))?;

        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| storage_error("PutObject presign", e))?;

        Ok(request.uri().to_string())
    }
}
