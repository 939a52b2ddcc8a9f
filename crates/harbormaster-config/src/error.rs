use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error(
        "Config file not found. Looked in:\n\
        - --config <PATH> or the HARBORMASTER_CONFIG_PATH environment variable\n\
        - current directory: harbormaster.json, .harbormaster.json\n\
        - ~/.config/harbormaster/harbormaster.json\n\
        Credentials can also be given through DIGITALOCEAN_API_KEY or CLOUDFLARE_API_KEY, \
        CLOUDFLARE_EMAIL and CLOUDFLARE_ZONE_ID"
    )]
    ConfigFileNotFound,

    #[error("Config file does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No {0} section in the configuration")]
    ProviderNotConfigured(&'static str),

    #[error("Invalid {provider} configuration: {reason}")]
    InvalidCredentials {
        provider: &'static str,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
