//! Application configuration.
//!
//! Loaded from `~/.config/salon-booking/config.toml` (or `SALON_CONFIG`);
//! every section is optional and falls back to its defaults. Secrets and
//! common deployment knobs can be overridden from the environment.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV: &str = "SALON_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub booking: BookingConfig,
    pub catalog: CatalogConfig,
    pub uploads: UploadsConfig,
    pub cors: CorsConfig,
    /// Absent means notifications are only logged
    pub smtp: Option<SmtpConfig>,
    pub frontend: FrontendConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight work on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8000,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub refresh_secret: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
    pub reset_token_minutes: i64,
    /// Mark the refresh cookie `Secure` (HTTPS deployments)
    pub cookie_secure: bool,
}

pub const DEV_JWT_SECRET: &str = "dev-access-secret-change-me";
pub const DEV_REFRESH_SECRET: &str = "dev-refresh-secret-change-me";

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            refresh_secret: DEV_REFRESH_SECRET.to_string(),
            access_token_minutes: 15,
            refresh_token_days: 7,
            reset_token_minutes: 60,
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@lucysbeautyparlour.com".to_string(),
            password: "change-me-now".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    /// Confirmed appointments allowed per calendar date
    pub daily_capacity: usize,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self { daily_capacity: 15 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub allowed_categories: Vec<String>,
    pub max_images_per_service: usize,
    pub seed_defaults: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            allowed_categories: Vec::new(),
            max_images_per_service: 8,
            seed_defaults: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    pub dir: PathBuf,
    pub max_image_bytes: usize,
    pub thumbnail_width: u32,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_image_bytes: 5 * 1024 * 1024,
            thumbnail_width: 400,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:8080".to_string(),
                "https://lucysbeautyparlour.com".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub sender: String,
    /// Where new-booking alerts go; defaults to the admin email
    #[serde(default)]
    pub admin_recipient: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub business_name: String,
    pub password_reset_url: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            business_name: "Lucy's Beauty Parlour".to_string(),
            password_reset_url: "https://lucysbeautyparlour.com/reset-password".to_string(),
        }
    }
}

/// `<config dir>/salon-booking/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("salon-booking")
        .join("config.toml")
}

/// `SALON_CONFIG` if set, else [`default_config_path`].
pub fn resolve_config_path() -> PathBuf {
    std::env::var(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

impl AppConfig {
    /// Parse the file at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.api_port = port;
        }
        if let Some(v) = get("ADMIN_EMAIL") {
            self.admin.email = v;
        }
        if let Some(v) = get("ADMIN_PASSWORD") {
            self.admin.password = v;
        }
        if let Some(v) = get("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = get("REFRESH_SECRET") {
            self.security.refresh_secret = v;
        }

        if let Some(host) = get("SMTP_HOST") {
            let smtp = self.smtp.get_or_insert_with(|| SmtpConfig {
                host: String::new(),
                port: default_smtp_port(),
                username: String::new(),
                password: String::new(),
                sender: String::new(),
                admin_recipient: None,
            });
            smtp.host = host;
        }
        if let Some(smtp) = self.smtp.as_mut() {
            if let Some(port) = get("SMTP_PORT").and_then(|p| p.trim().parse().ok()) {
                smtp.port = port;
            }
            if let Some(v) = get("SMTP_USER") {
                smtp.username = v;
            }
            if let Some(v) = get("SMTP_PASSWORD") {
                smtp.password = v;
            }
            if let Some(v) = get("SENDER_EMAIL") {
                smtp.sender = v;
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.admin.email.trim().is_empty() || self.admin.password.is_empty() {
            return invalid("admin.email and admin.password are required");
        }
        if self.security.jwt_secret.is_empty() || self.security.refresh_secret.is_empty() {
            return invalid("security.jwt_secret and security.refresh_secret are required");
        }
        if self.security.access_token_minutes <= 0
            || self.security.refresh_token_days <= 0
            || self.security.reset_token_minutes <= 0
        {
            return invalid("token lifetimes must be positive");
        }
        if self.booking.daily_capacity == 0 {
            return invalid("booking.daily_capacity must be at least 1");
        }
        if self.catalog.max_images_per_service == 0 {
            return invalid("catalog.max_images_per_service must be at least 1");
        }
        if let Some(smtp) = &self.smtp {
            if smtp.host.trim().is_empty() || smtp.sender.trim().is_empty() {
                return invalid("smtp.host and smtp.sender are required when smtp is set");
            }
        }
        Ok(())
    }

    /// Still running with the built-in development secrets
    pub fn uses_dev_secrets(&self) -> bool {
        self.security.jwt_secret == DEV_JWT_SECRET
            || self.security.refresh_secret == DEV_REFRESH_SECRET
    }

    /// Admin alert recipient: `smtp.admin_recipient`, else the admin email.
    pub fn admin_recipient(&self) -> String {
        self.smtp
            .as_ref()
            .and_then(|s| s.admin_recipient.clone())
            .unwrap_or_else(|| self.admin.email.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.api_port, 8000);
        assert_eq!(cfg.booking.daily_capacity, 15);
        assert_eq!(cfg.catalog.max_images_per_service, 8);
        assert!(cfg.smtp.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9100

            [catalog]
            allowed_categories = ["Hair", "Nails"]

            [smtp]
            host = "smtp.example.com"
            sender = "Salon <no-reply@example.com>"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 9100);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.catalog.allowed_categories.len(), 2);
        assert!(cfg.catalog.seed_defaults);
        let smtp = cfg.smtp.as_ref().unwrap();
        assert_eq!(smtp.port, 587);
        assert_eq!(cfg.admin_recipient(), cfg.admin.email);
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("ADMIN_EMAIL", "lucy@example.com"),
            ("JWT_SECRET", "s3cret"),
            ("SMTP_HOST", "mail.example.com"),
            ("SENDER_EMAIL", "no-reply@example.com"),
            ("SMTP_PORT", "not-a-port"),
            ("ADMIN_PASSWORD", "  "),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.server.api_port, 9000);
        assert_eq!(cfg.admin.email, "lucy@example.com");
        assert_eq!(cfg.admin.password, AdminConfig::default().password);
        assert_eq!(cfg.security.jwt_secret, "s3cret");
        let smtp = cfg.smtp.as_ref().unwrap();
        assert_eq!(smtp.host, "mail.example.com");
        assert_eq!(smtp.port, 587);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut cfg = AppConfig::default();
        cfg.booking.daily_capacity = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.security.jwt_secret.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|k| (k == "SMTP_HOST").then(|| "smtp.x".to_string()));
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = std::env::temp_dir().join(format!("salon-missing-{}.toml", uuid::Uuid::new_v4()));
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.server.api_port, 8000);
    }
}
