pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the config file directly
pub const CONFIG_PATH_ENV: &str = "HARBORMASTER_CONFIG_PATH";

/// File names searched in the current directory, in order
pub const CONFIG_FILE_NAMES: [&str; 2] = ["harbormaster.json", ".harbormaster.json"];

pub const DIGITALOCEAN_API_KEY_ENV: &str = "DIGITALOCEAN_API_KEY";
pub const CLOUDFLARE_API_KEY_ENV: &str = "CLOUDFLARE_API_KEY";
pub const CLOUDFLARE_EMAIL_ENV: &str = "CLOUDFLARE_EMAIL";
pub const CLOUDFLARE_ZONE_ENV: &str = "CLOUDFLARE_ZONE_ID";

/// DigitalOcean personal access tokens are 64 characters
const DIGITALOCEAN_KEY_MIN_LEN: usize = 64;

/// Provider credentials
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_ocean: Option<DigitalOceanConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloudflare: Option<CloudflareConfig>,
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitalOceanConfig {
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for DigitalOceanConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOceanConfig").finish_non_exhaustive()
    }
}

impl DigitalOceanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().len() < DIGITALOCEAN_KEY_MIN_LEN {
            return Err(ConfigError::InvalidCredentials {
                provider: "digital_ocean",
                reason: format!(
                    "api_key must be at least {} characters",
                    DIGITALOCEAN_KEY_MIN_LEN
                ),
            });
        }
        Ok(())
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudflareConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub email: String,
    /// Zone id scoping every DNS record request
    #[serde(default)]
    pub zone: String,
}

impl std::fmt::Debug for CloudflareConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareConfig")
            .field("email", &self.email)
            .field("zone", &self.zone)
            .finish_non_exhaustive()
    }
}

impl CloudflareConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| ConfigError::InvalidCredentials {
            provider: "cloudflare",
            reason: reason.to_string(),
        };

        if self.api_key.trim().is_empty() {
            return Err(invalid("api_key is empty"));
        }
        if self.zone.trim().is_empty() {
            return Err(invalid("zone is empty"));
        }
        match self.email.trim().split_once('@') {
            Some((user, domain)) if !user.is_empty() && !domain.is_empty() => Ok(()),
            _ => Err(invalid("email must look like user@domain")),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read and parse one config file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Discover and load the configuration
    ///
    /// When no file is found, credentials from the environment alone are
    /// accepted as long as they configure at least one provider.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match find_config_file(explicit) {
            Ok(path) => Self::load_from(&path),
            Err(ConfigError::ConfigFileNotFound) => {
                let mut config = Self::default();
                config.apply_env_overrides();
                if config.is_empty() {
                    Err(ConfigError::ConfigFileNotFound)
                } else {
                    Ok(config)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite file values with non-empty credential environment variables
    pub fn apply_env_overrides(&mut self) {
        if let Some(key) = env_value(DIGITALOCEAN_API_KEY_ENV) {
            self.digital_ocean.get_or_insert_default().api_key = key;
        }

        let cloudflare = [
            (CLOUDFLARE_API_KEY_ENV, env_value(CLOUDFLARE_API_KEY_ENV)),
            (CLOUDFLARE_EMAIL_ENV, env_value(CLOUDFLARE_EMAIL_ENV)),
            (CLOUDFLARE_ZONE_ENV, env_value(CLOUDFLARE_ZONE_ENV)),
        ];
        for (name, value) in cloudflare {
            let Some(value) = value else { continue };
            let section = self.cloudflare.get_or_insert_default();
            match name {
                CLOUDFLARE_API_KEY_ENV => section.api_key = value,
                CLOUDFLARE_EMAIL_ENV => section.email = value,
                _ => section.zone = value,
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.digital_ocean.is_none() && self.cloudflare.is_none()
    }

    /// Validated DigitalOcean credentials
    pub fn digital_ocean(&self) -> Result<&DigitalOceanConfig> {
        let section = self
            .digital_ocean
            .as_ref()
            .ok_or(ConfigError::ProviderNotConfigured("digital_ocean"))?;
        section.validate()?;
        Ok(section)
    }

    /// Validated Cloudflare credentials
    pub fn cloudflare(&self) -> Result<&CloudflareConfig> {
        let section = self
            .cloudflare
            .as_ref()
            .ok_or(ConfigError::ProviderNotConfigured("cloudflare"))?;
        section.validate()?;
        Ok(section)
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Harbormaster's global config directory (`~/.config/harbormaster`)
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("harbormaster"))
}

/// Locate the config file
///
/// Search order:
/// 1. `explicit` (the `--config` flag); it must exist
/// 2. environment variable `HARBORMASTER_CONFIG_PATH`; it must exist
/// 3. current directory: `harbormaster.json`, `.harbormaster.json`
/// 4. `~/.config/harbormaster/harbormaster.json`
pub fn find_config_file(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return existing(path.to_path_buf());
    }

    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        if !config_path.trim().is_empty() {
            return existing(PathBuf::from(config_path));
        }
    }

    let current_dir = std::env::current_dir()?;
    for filename in &CONFIG_FILE_NAMES {
        let path = current_dir.join(filename);
        if path.is_file() {
            return Ok(path);
        }
    }

    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join(CONFIG_FILE_NAMES[0]);
        if global_config.is_file() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

fn existing(path: PathBuf) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path)
    } else {
        Err(ConfigError::PathNotFound(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    const DO_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    const CREDENTIAL_VARS: [&str; 5] = [
        CONFIG_PATH_ENV,
        DIGITALOCEAN_API_KEY_ENV,
        CLOUDFLARE_API_KEY_ENV,
        CLOUDFLARE_EMAIL_ENV,
        CLOUDFLARE_ZONE_ENV,
    ];

    fn full_config() -> String {
        serde_json::json!({
            "digital_ocean": {"api_key": DO_KEY},
            "cloudflare": {"api_key": "cf-key", "email": "ops@example.com", "zone": "zone-1"}
        })
        .to_string()
    }

    /// Run `f` inside an empty temporary working directory
    fn in_temp_dir<R>(f: impl FnOnce(&Path) -> R) -> R {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let result = f(temp_dir.path());

        std::env::set_current_dir(original_dir).unwrap();
        result
    }

    #[test]
    fn test_parse_and_validate() {
        let config = Config::from_json(&full_config()).unwrap();

        assert_eq!(config.digital_ocean().unwrap().api_key, DO_KEY);
        let cloudflare = config.cloudflare().unwrap();
        assert_eq!(cloudflare.zone, "zone-1");
    }

    #[test]
    fn test_missing_section() {
        let config = Config::from_json(r#"{"cloudflare": {"api_key": "k", "email": "a@b", "zone": "z"}}"#)
            .unwrap();

        assert!(matches!(
            config.digital_ocean(),
            Err(ConfigError::ProviderNotConfigured("digital_ocean"))
        ));
        assert!(config.cloudflare().is_ok());
    }

    #[test]
    fn test_short_digitalocean_key_rejected() {
        let config = Config::from_json(r#"{"digital_ocean": {"api_key": "too-short"}}"#).unwrap();
        assert!(matches!(
            config.digital_ocean(),
            Err(ConfigError::InvalidCredentials {
                provider: "digital_ocean",
                ..
            })
        ));
    }

    #[test]
    fn test_cloudflare_email_shape() {
        for email in ["ops", "@example.com", "ops@", ""] {
            let section = CloudflareConfig {
                api_key: "cf-key".to_string(),
                email: email.to_string(),
                zone: "zone-1".to_string(),
            };
            assert!(section.validate().is_err(), "accepted {:?}", email);
        }
    }

    #[test]
    fn test_debug_hides_keys() {
        let config = Config::from_json(&full_config()).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(DO_KEY));
        assert!(!rendered.contains("cf-key"));
        assert!(rendered.contains("ops@example.com"));
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        temp_env::with_vars_unset(CREDENTIAL_VARS, || {
            in_temp_dir(|dir| {
                fs::write(dir.join(".harbormaster.json"), full_config()).unwrap();
                fs::write(dir.join("harbormaster.json"), full_config()).unwrap();

                let found = find_config_file(None).unwrap();

                // the visible file wins
                assert!(found.ends_with("harbormaster.json"));
                assert!(!found.ends_with(".harbormaster.json"));
            })
        });
    }

    #[test]
    #[serial]
    fn test_explicit_path_wins_and_must_exist() {
        let temp_dir = tempfile::tempdir().unwrap();
        let custom = temp_dir.path().join("custom.json");
        fs::write(&custom, full_config()).unwrap();

        assert_eq!(find_config_file(Some(&custom)).unwrap(), custom);

        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(
            find_config_file(Some(&missing)),
            Err(ConfigError::PathNotFound(_))
        ));
    }

    #[test]
    #[serial]
    fn test_find_config_file_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("ops.json");
        fs::write(&config_path, full_config()).unwrap();

        temp_env::with_var(CONFIG_PATH_ENV, Some(config_path.as_os_str()), || {
            assert_eq!(find_config_file(None).unwrap(), config_path);
        });
    }

    #[test]
    #[serial]
    fn test_not_found_without_file_or_env() {
        let config_home = tempfile::tempdir().unwrap();
        temp_env::with_vars_unset(CREDENTIAL_VARS, || {
            temp_env::with_var("XDG_CONFIG_HOME", Some(config_home.path()), || {
                in_temp_dir(|_| {
                    assert!(matches!(
                        Config::load(None),
                        Err(ConfigError::ConfigFileNotFound)
                    ));
                })
            })
        });
    }

    #[test]
    #[serial]
    fn test_env_overrides_file_values() {
        temp_env::with_vars_unset(CREDENTIAL_VARS, || {
            temp_env::with_vars(
                [
                    (CLOUDFLARE_ZONE_ENV, Some("zone-from-env")),
                    (DIGITALOCEAN_API_KEY_ENV, Some("")),
                ],
                || {
                    in_temp_dir(|dir| {
                        fs::write(dir.join("harbormaster.json"), full_config()).unwrap();

                        let config = Config::load(None).unwrap();

                        assert_eq!(config.cloudflare().unwrap().zone, "zone-from-env");
                        // empty variables do not clobber file values
                        assert_eq!(config.digital_ocean().unwrap().api_key, DO_KEY);
                    })
                },
            )
        });
    }

    #[test]
    #[serial]
    fn test_env_only_configuration() {
        let config_home = tempfile::tempdir().unwrap();
        temp_env::with_vars_unset(CREDENTIAL_VARS, || {
            temp_env::with_vars(
                [
                    (DIGITALOCEAN_API_KEY_ENV, Some(std::ffi::OsStr::new(DO_KEY))),
                    ("XDG_CONFIG_HOME", Some(config_home.path().as_os_str())),
                ],
                || {
                    in_temp_dir(|_| {
                        let config = Config::load(None).unwrap();
                        assert!(config.digital_ocean().is_ok());
                        assert!(config.cloudflare.is_none());
                    })
                },
            )
        });
    }

    #[test]
    #[serial]
    fn test_parse_error_names_file() {
        temp_env::with_vars_unset(CREDENTIAL_VARS, || {
            in_temp_dir(|dir| {
                fs::write(dir.join("harbormaster.json"), "{ not json").unwrap();

                let err = Config::load(None).unwrap_err();
                assert!(matches!(err, ConfigError::Parse { .. }));
                assert!(err.to_string().contains("harbormaster.json"));
            })
        });
    }
}
