use crate::errors::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_SIGNED_URL_EXPIRATION_SECS: u64 = 300;

/// Settings read once per cold start and passed to every client explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub todos_table: String,
    pub user_id_index: String,
    pub attachments_bucket: String,
    pub signed_url_expiration: Duration,
    pub environment: String,
    /// Overrides the DynamoDB endpoint (DynamoDB Local)
    pub dynamodb_endpoint: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Configuration(format!("{key} is not set")))
        };

        let signed_url_expiration = match lookup("SIGNED_URL_EXPIRATION") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                AppError::Configuration(format!("SIGNED_URL_EXPIRATION is invalid: {e}"))
            })?,
            None => DEFAULT_SIGNED_URL_EXPIRATION_SECS,
        };

        Ok(Config {
            todos_table: required("TODOS_TABLE")?,
            user_id_index: required("USER_ID_INDEX")?,
            attachments_bucket: required("ATTACHMENTS_S3_BUCKET")?,
            signed_url_expiration: Duration::from_secs(signed_url_expiration),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()),
            dynamodb_endpoint: lookup("DYNAMODB_ENDPOINT").filter(|v| !v.is_empty()),
        })
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "prod" | "production")
    }
}
