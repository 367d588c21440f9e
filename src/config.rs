//! Configuration management for the Wander Lens Tours site
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WanderLensError;
use crate::carousel::Wrap;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the site
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Gallery directory listing settings
    #[serde(default)]
    pub gallery: GalleryConfig,
    /// Outbound messaging (contact deep link) settings
    #[serde(default)]
    pub contact: ContactConfig,
    /// Carousel rotator settings
    #[serde(default)]
    pub carousel: CarouselConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for static assets (images, stylesheet)
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
    /// PEM certificate, enables TLS together with `tls_key`
    #[serde(default)]
    pub tls_cert: Option<String>,
    #[serde(default)]
    pub tls_key: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
    #[serde(default = "default_body_limit")]
    pub body_limit_kb: u32,
}

/// Gallery directory listing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryConfig {
    /// Directory scanned for images
    #[serde(default = "default_gallery_directory")]
    pub directory: String,
    /// Public route prefixed to every listed file name
    #[serde(default = "default_gallery_base_route")]
    pub base_route: String,
    /// Accepted extensions, without the leading dot
    #[serde(default = "default_gallery_extensions")]
    pub extensions: Vec<String>,
}

/// Outbound messaging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    /// Host of the messaging service, e.g. `wa.me`
    #[serde(default = "default_messaging_host")]
    pub messaging_host: String,
    /// Recipient identifier appended to the link path
    #[serde(default = "default_recipient_id")]
    pub recipient_id: String,
    /// Business name used in greetings
    #[serde(default = "default_business_name")]
    pub business_name: String,
}

/// Settings for one carousel rotator
///
/// Zero values are filled from the rotator's defaults by
/// [`SiteConfig::apply_defaults`], so a section may set a single key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RotatorConfig {
    #[serde(default)]
    pub window_size: usize,
    #[serde(default)]
    pub interval_ms: u64,
    /// `bounded` (default) or `circular`
    #[serde(default)]
    pub wrap: Wrap,
    /// A pause requested through the API lifts itself after this long
    #[serde(default)]
    pub pause_limit_ms: u64,
}

impl RotatorConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub fn pause_limit(&self) -> Duration {
        Duration::from_millis(self.pause_limit_ms)
    }

    fn fill_missing(&mut self, defaults: RotatorConfig) {
        if self.window_size == 0 {
            self.window_size = defaults.window_size;
        }
        if self.interval_ms == 0 {
            self.interval_ms = defaults.interval_ms;
        }
        if self.pause_limit_ms == 0 {
            self.pause_limit_ms = defaults.pause_limit_ms;
        }
    }
}

/// Carousel rotator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default = "default_destinations_rotator")]
    pub destinations: RotatorConfig,
    #[serde(default = "default_reviews_rotator")]
    pub reviews: RotatorConfig,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty, compact or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_public_dir() -> String {
    "public".to_string()
}

fn default_request_timeout() -> u32 {
    30
}

fn default_body_limit() -> u32 {
    64
}

fn default_gallery_directory() -> String {
    "public/img/gallery".to_string()
}

fn default_gallery_base_route() -> String {
    "/img/gallery".to_string()
}

fn default_gallery_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "gif", "webp"]
        .iter()
        .map(|ext| (*ext).to_string())
        .collect()
}

fn default_messaging_host() -> String {
    "wa.me".to_string()
}

fn default_recipient_id() -> String {
    "94771234567".to_string()
}

fn default_business_name() -> String {
    "Wander Lens Tours".to_string()
}

const DEFAULT_PAUSE_LIMIT_MS: u64 = 30_000;

fn default_destinations_rotator() -> RotatorConfig {
    RotatorConfig {
        window_size: 4,
        interval_ms: 5000,
        wrap: Wrap::Bounded,
        pause_limit_ms: DEFAULT_PAUSE_LIMIT_MS,
    }
}

fn default_reviews_rotator() -> RotatorConfig {
    RotatorConfig {
        window_size: 3,
        interval_ms: 4000,
        wrap: Wrap::Bounded,
        pause_limit_ms: DEFAULT_PAUSE_LIMIT_MS,
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_dir: default_public_dir(),
            tls_cert: None,
            tls_key: None,
            request_timeout_seconds: default_request_timeout(),
            body_limit_kb: default_body_limit(),
        }
    }
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            directory: default_gallery_directory(),
            base_route: default_gallery_base_route(),
            extensions: default_gallery_extensions(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            messaging_host: default_messaging_host(),
            recipient_id: default_recipient_id(),
            business_name: default_business_name(),
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            destinations: default_destinations_rotator(),
            reviews: default_reviews_rotator(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path
            .or_else(|| std::env::var_os("WANDERLENS_CONFIG").map(PathBuf::from))
            .or_else(|| Self::get_config_path().filter(|path| path.exists()))
            .unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            tracing::debug!("Reading configuration from {}", config_file.display());
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. WANDERLENS_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("WANDERLENS")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("gallery.extensions")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SiteConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wanderlens").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
        if self.server.public_dir.is_empty() {
            self.server.public_dir = default_public_dir();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.server.body_limit_kb == 0 {
            self.server.body_limit_kb = default_body_limit();
        }
        if self.gallery.directory.is_empty() {
            self.gallery.directory = default_gallery_directory();
        }
        if self.gallery.base_route.is_empty() {
            self.gallery.base_route = default_gallery_base_route();
        }
        if self.gallery.extensions.is_empty() {
            self.gallery.extensions = default_gallery_extensions();
        }
        if self.contact.messaging_host.is_empty() {
            self.contact.messaging_host = default_messaging_host();
        }
        if self.contact.business_name.is_empty() {
            self.contact.business_name = default_business_name();
        }
        self.carousel
            .destinations
            .fill_missing(default_destinations_rotator());
        self.carousel.reviews.fill_missing(default_reviews_rotator());
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.request_timeout_seconds > 300 {
            return Err(
                WanderLensError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.server.body_limit_kb > 1024 {
            return Err(WanderLensError::config("Body limit cannot exceed 1024 KB").into());
        }

        for (name, rotator) in [
            ("destinations", &self.carousel.destinations),
            ("reviews", &self.carousel.reviews),
        ] {
            if rotator.window_size == 0 {
                return Err(WanderLensError::config(format!(
                    "Carousel '{name}' window size must be at least 1"
                ))
                .into());
            }
            if rotator.interval_ms < 250 {
                return Err(WanderLensError::config(format!(
                    "Carousel '{name}' interval must be at least 250 ms"
                ))
                .into());
            }
            if rotator.pause_limit_ms < 1000 {
                return Err(WanderLensError::config(format!(
                    "Carousel '{name}' pause limit must be at least 1000 ms"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WanderLensError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WanderLensError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.gallery.base_route.starts_with('/') {
            return Err(WanderLensError::config("Gallery base route must start with '/'").into());
        }

        if self.contact.recipient_id.is_empty()
            || !self.contact.recipient_id.chars().all(|c| c.is_ascii_digit())
        {
            return Err(WanderLensError::config(
                "Contact recipient id must be a non-empty string of digits",
            )
            .into());
        }

        if self.server.tls_cert.is_some() != self.server.tls_key.is_some() {
            return Err(WanderLensError::config(
                "TLS needs both tls_cert and tls_key, or neither",
            )
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.gallery.base_route, "/img/gallery");
        assert_eq!(config.gallery.extensions.len(), 5);
        assert_eq!(config.contact.messaging_host, "wa.me");
        assert_eq!(config.carousel.destinations.window_size, 4);
        assert_eq!(config.carousel.reviews.window_size, 3);
        assert_eq!(config.carousel.reviews.interval(), Duration::from_secs(4));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = SiteConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = SiteConfig::default();
        config.server.request_timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_zero_window() {
        let mut config = SiteConfig::default();
        config.carousel.reviews.window_size = 0;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("window size"));
    }

    #[test]
    fn test_config_validation_recipient_digits() {
        let mut config = SiteConfig::default();
        config.contact.recipient_id = "+94 77".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_half_tls() {
        let mut config = SiteConfig::default();
        config.server.tls_cert = Some("cert.pem".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_empty_values() {
        let mut config = SiteConfig::default();
        config.gallery.base_route.clear();
        config.gallery.extensions.clear();
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.gallery.base_route, "/img/gallery");
        assert_eq!(config.gallery.extensions.len(), 5);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088

[gallery]
directory = "/srv/gallery"

[carousel.reviews]
window_size = 2
interval_ms = 1000
wrap = "circular"
"#
        )
        .unwrap();

        let config = SiteConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.gallery.directory, "/srv/gallery");
        assert_eq!(config.gallery.base_route, "/img/gallery");
        assert_eq!(config.carousel.reviews.window_size, 2);
        assert_eq!(config.carousel.reviews.wrap, Wrap::Circular);
        assert_eq!(config.carousel.destinations.window_size, 4);
        assert_eq!(config.carousel.destinations.wrap, Wrap::Bounded);
    }

    #[test]
    fn test_wrap_only_section_keeps_rotator_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[carousel.reviews]
wrap = "circular"
"#
        )
        .unwrap();

        let config = SiteConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        let reviews = config.carousel.reviews;
        assert_eq!(reviews.wrap, Wrap::Circular);
        assert_eq!(reviews.window_size, 3);
        assert_eq!(reviews.interval_ms, 4000);
        assert_eq!(reviews.pause_limit(), Duration::from_secs(30));
        assert_eq!(config.carousel.destinations.window_size, 4);
    }

    #[test]
    fn test_apply_defaults_fills_rotator_zeros() {
        let mut config = SiteConfig::default();
        config.carousel.destinations = RotatorConfig {
            interval_ms: 7000,
            ..RotatorConfig::default()
        };
        config.apply_defaults();
        assert_eq!(config.carousel.destinations.window_size, 4);
        assert_eq!(config.carousel.destinations.interval_ms, 7000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = SiteConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("wanderlens"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
