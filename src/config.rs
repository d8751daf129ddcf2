//! Configuration, loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Secrets are never stored here: bootstrap entries only name
//! the environment variable holding each password.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::export::{ExportFormatter, PdfRenderer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config format: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Upper bound for one render in milliseconds; 0 disables the bound
    #[serde(default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,

    /// Heading printed on exported documents
    #[serde(default = "default_title")]
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    #[serde(default)]
    pub admins: Vec<AdminSeed>,
}

/// An administrator account to create at bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    /// Environment variable holding the initial password
    pub password_env: String,
}

fn default_render_timeout_ms() -> u64 {
    10_000
}

fn default_title() -> String {
    "Abbreviations".to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            render_timeout_ms: default_render_timeout_ms(),
            title: default_title(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl ExportConfig {
    pub fn render_timeout(&self) -> Option<Duration> {
        match self.render_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Formatter backed by the built-in PDF renderer.
    pub fn formatter(&self) -> ExportFormatter {
        let renderer = PdfRenderer::new().with_title(self.title.clone());
        ExportFormatter::new(Arc::new(renderer)).with_timeout(self.render_timeout())
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.export.title.trim().is_empty() {
            return Err(invalid("export.title", "must not be empty"));
        }

        let mut seen = BTreeSet::new();
        for (index, admin) in self.bootstrap.admins.iter().enumerate() {
            let field = |name: &str| format!("bootstrap.admins[{index}].{name}");
            if admin.name.trim().is_empty() {
                return Err(invalid(&field("name"), "must not be empty"));
            }
            if !admin.email.contains('@') {
                return Err(invalid(&field("email"), "is not an email address"));
            }
            if !seen.insert(admin.email.to_ascii_lowercase()) {
                return Err(invalid(&field("email"), "is listed twice"));
            }
            if admin.password_env.trim().is_empty() {
                return Err(invalid(&field("password_env"), "must name a variable"));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}
