//! Configuration management using Figment
//!
//! Configuration is loaded from multiple sources with the following precedence (highest to lowest):
//! 1. Environment variables (prefix: COURSENEW_, nested keys separated by `__`)
//! 2. The plain `PORT` environment variable (listen port only)
//! 3. Current working directory: ./config.toml
//! 4. XDG config directory: ~/.config/coursenew/{service_name}/config.toml
//! 5. System directory: /etc/coursenew/{service_name}/config.toml
//! 6. Default values

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

const ENV_PREFIX: &str = "COURSENEW_";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service configuration
    pub service: ServiceConfig,

    /// Middleware configuration
    #[serde(default)]
    pub middleware: MiddlewareConfig,

    /// Users resource configuration
    #[serde(default)]
    pub users: UsersConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service name
    pub name: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Environment (development, staging, production)
    #[serde(default = "default_environment")]
    pub environment: String,
}

/// Middleware configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request body size limit in KB
    #[serde(default = "default_body_limit_kb")]
    pub body_limit_kb: usize,

    /// Enable compression
    #[serde(default = "default_true")]
    pub compression: bool,

    /// CORS mode (permissive, restrictive, disabled)
    #[serde(default = "default_cors_mode")]
    pub cors_mode: String,

    /// Security response headers
    #[serde(default)]
    pub security_headers: SecurityHeadersConfig,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            body_limit_kb: default_body_limit_kb(),
            compression: true,
            cors_mode: default_cors_mode(),
            security_headers: SecurityHeadersConfig::default(),
        }
    }
}

/// Security response headers configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityHeadersConfig {
    /// Master switch
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Send `X-Content-Type-Options: nosniff`
    #[serde(default = "default_true")]
    pub x_content_type_options: bool,

    /// `X-Frame-Options` value; empty disables the header
    #[serde(default = "default_x_frame_options")]
    pub x_frame_options: String,

    /// Send `X-XSS-Protection: 0`
    #[serde(default = "default_true")]
    pub x_xss_protection: bool,

    /// `Referrer-Policy` value; empty disables the header
    #[serde(default = "default_referrer_policy")]
    pub referrer_policy: String,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            x_content_type_options: true,
            x_frame_options: default_x_frame_options(),
            x_xss_protection: true,
            referrer_policy: default_referrer_policy(),
        }
    }
}

/// Users resource configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersConfig {
    /// Seed the store with the three demo users on startup
    #[serde(default = "default_true")]
    pub seed_demo_users: bool,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            seed_demo_users: true,
        }
    }
}

fn default_port() -> u16 {
    5001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_body_limit_kb() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_cors_mode() -> String {
    "permissive".to_string()
}

fn default_x_frame_options() -> String {
    "SAMEORIGIN".to_string()
}

fn default_referrer_policy() -> String {
    "no-referrer".to_string()
}

impl Config {
    /// Load configuration from all sources
    ///
    /// The service name is inferred from the binary name.
    pub fn load() -> Result<Self> {
        let service_name = std::env::current_exe()
            .ok()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "coursenew-api".to_string());

        Self::load_for_service(&service_name)
    }

    /// Load configuration for a specific service name
    pub fn load_for_service(service_name: &str) -> Result<Self> {
        let config_paths = Self::find_config_paths(service_name);

        tracing::debug!("Searching for config files in order:");
        for path in &config_paths {
            tracing::debug!("  - {}", path.display());
        }

        let mut defaults = Config::default();
        defaults.service.name = service_name.to_string();

        let mut figment = Figment::new().merge(Serialized::defaults(defaults));

        // Lowest priority first so higher priority files override
        for path in config_paths.iter().rev() {
            if path.exists() {
                tracing::info!("Loading configuration from: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
        }

        Self::finish(Self::with_env(figment))
    }

    /// Load configuration from a specific file
    ///
    /// Bypasses the XDG and system directories. Environment variables still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()));

        Self::finish(Self::with_env(figment))
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(Env::raw().only(&["port"]).map(|_| "service.port".into()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn finish(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Find all possible config file paths for a service
    ///
    /// Returns paths in priority order (highest first).
    fn find_config_paths(service_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        let xdg_dirs = xdg::BaseDirectories::with_prefix("coursenew");
        if let Some(path) = xdg_dirs.find_config_file(Path::new(service_name).join("config.toml")) {
            paths.push(path);
        }

        paths.push(
            PathBuf::from("/etc/coursenew")
                .join(service_name)
                .join("config.toml"),
        );

        paths
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.service.name.is_empty() {
            return Err(invalid("service.name cannot be empty"));
        }

        if self.service.port == 0 {
            return Err(invalid("service.port must be greater than 0"));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.service.log_level.as_str()) {
            return Err(invalid(format!(
                "service.log_level must be one of: {}",
                valid_log_levels.join(", ")
            )));
        }

        if self.middleware.body_limit_kb == 0 {
            return Err(invalid("middleware.body_limit_kb must be greater than 0"));
        }

        Ok(())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.service.timeout_secs)
    }

    /// Request body limit in bytes
    pub fn body_limit_bytes(&self) -> usize {
        self.middleware.body_limit_kb.saturating_mul(1024)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Config(Box::new(figment::Error::from(message.into())))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                name: "coursenew-api".to_string(),
                port: default_port(),
                log_level: default_log_level(),
                timeout_secs: default_timeout(),
                environment: default_environment(),
            },
            middleware: MiddlewareConfig::default(),
            users: UsersConfig::default(),
        }
    }
}
