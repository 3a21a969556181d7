//! Application configuration from file and environment variables
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Environment variables (prefixed with VOD_, sections split by `__`)
//! 2. Config file (config.toml)
//! 3. Default values
//!
//! Secrets like database passwords and S3 keys should be kept in environment
//! variables, not in the config file.

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// Global application configuration
pub static APP_CONFIG: Lazy<RwLock<AppConfig>> = Lazy::new(|| {
    RwLock::new(AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config file, using defaults: {}", e);
        AppConfig::default()
    }))
});

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL (should be in env var VOD_DATABASE__URL or DATABASE_URL)
    pub url: String,
    /// Upper bound on pooled connections
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://vod.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend: "local" or "s3"
    pub backend: String,
    /// Local storage path (used when backend = "local")
    pub local_path: String,
    /// URL prefix local files are served under (used when backend = "local")
    pub media_url: String,
    /// S3 endpoint URL (used when backend = "s3")
    pub s3_endpoint: String,
    /// S3 region (used when backend = "s3")
    pub s3_region: String,
    /// S3 bucket name (used when backend = "s3")
    pub s3_bucket: String,
    /// S3 public URL for serving files (used when backend = "s3")
    pub s3_public_url: String,
    /// S3 access key (should be in env var VOD_STORAGE__S3_ACCESS_KEY)
    #[serde(default)]
    pub s3_access_key: String,
    /// S3 secret key (should be in env var VOD_STORAGE__S3_SECRET_KEY)
    #[serde(default)]
    pub s3_secret_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "local".to_string(),
            local_path: "./media".to_string(),
            media_url: "/media/".to_string(),
            s3_endpoint: "http://localhost:9000".to_string(),
            s3_region: "us-east-1".to_string(),
            s3_bucket: "vod".to_string(),
            s3_public_url: "http://localhost:9000/vod".to_string(),
            s3_access_key: String::new(),
            s3_secret_key: String::new(),
        }
    }
}

/// Media file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Image shown for channels without a background image
    pub default_background_image: String,
    /// Upload directory for channel background images
    pub background_image_dir: String,
    /// Upload directory for video files
    pub video_dir: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            default_background_image: "/static/image/default_background_image.jpg".to_string(),
            background_image_dir: "background_image".to_string(),
            video_dir: "video".to_string(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub media: MediaConfig,
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &str) -> Result<Self, ConfigError> {
        use config::FileFormat;

        let config = Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(File::new(path, FileFormat::Toml).required(false))
            // e.g., VOD_STORAGE__BACKEND, VOD_MEDIA__VIDEO_DIR
            .add_source(
                Environment::with_prefix("VOD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

/// Initialize application configuration
///
/// This triggers the lazy loading of the config file and logs the result.
/// Should be called early in application startup.
pub fn init() {
    let config = get_config();
    log::info!(
        "Configuration loaded: storage.backend = {}",
        config.storage.backend
    );
}

/// Get the current application configuration
pub fn get_config() -> AppConfig {
    APP_CONFIG.read().map(|c| c.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage.backend, "local");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(
            config.media.default_background_image,
            "/static/image/default_background_image.jpg"
        );
        assert_eq!(config.media.video_dir, "video");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[storage]
backend = "s3"
s3_bucket = "videos"

[media]
default_background_image = "/static/bg.png"
"#
        )
        .unwrap();

        let config = AppConfig::load_from_path(temp_file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.storage.backend, "s3");
        assert_eq!(config.storage.s3_bucket, "videos");
        assert_eq!(config.media.default_background_image, "/static/bg.png");
        // Defaults should still apply for unspecified values
        assert_eq!(config.media.background_image_dir, "background_image");
        assert_eq!(config.storage.media_url, "/media/");
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = AppConfig::load_from_path("/nonexistent/config.toml").unwrap();
        assert_eq!(config.storage.backend, "local");
        assert_eq!(config.media.video_dir, "video");
    }
}
