//! DigitalOcean provider error types

use harbormaster_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigitalOceanError {
    #[error("Droplet not found: {0}")]
    NodeNotFound(String),

    #[error("Invalid size: {0}")]
    InvalidSize(String),

    #[error(transparent)]
    Cloud(#[from] CloudError),
}

impl From<DigitalOceanError> for CloudError {
    fn from(err: DigitalOceanError) -> Self {
        match err {
            DigitalOceanError::Cloud(e) => e,
            DigitalOceanError::NodeNotFound(name) => CloudError::ResourceNotFound(name),
            DigitalOceanError::InvalidSize(msg) => CloudError::InvalidConfig(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DigitalOceanError>;
