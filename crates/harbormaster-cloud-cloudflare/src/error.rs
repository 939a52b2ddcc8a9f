//! Cloudflare provider error types

use harbormaster_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudflareError {
    /// The API answered with `success: false`
    #[error("Cloudflare API error {code}: {message}")]
    Api { code: i64, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Cloud(#[from] CloudError),
}

impl From<CloudflareError> for CloudError {
    fn from(err: CloudflareError) -> Self {
        match err {
            CloudflareError::Cloud(e) => e,
            CloudflareError::Api { code, message } => {
                CloudError::ApiError(format!("{} (code {})", message, code))
            }
            CloudflareError::InvalidConfig(msg) => CloudError::InvalidConfig(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudflareError>;
