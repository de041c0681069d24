//! Client configuration.
//!
//! Settings come from three places, highest precedence first: command-line
//! flags, a YAML config file, and built-in defaults.  The config file is read
//! from `--config` when given and from `$HOME/.config/pulsarctl/config.yaml`
//! otherwise (silently skipped when it does not exist).
//!
//! ```yaml
//! admin_service_url: https://broker.example.com:8443
//! bookie_service_url: http://bookie-0.example.com:8000
//! auth_token: eyJhbGciOiJIUzI1NiJ9...
//! tls_allow_insecure: false
//! output: json
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::cli_utils::OutputFormat;
use crate::errors::{CtlError, Result};

/// Default broker web service URL.
pub const DEFAULT_ADMIN_SERVICE_URL: &str = "http://localhost:8080";

/// Default BookKeeper HTTP service URL.
pub const DEFAULT_BOOKIE_SERVICE_URL: &str = "http://localhost:8080";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CtlConfig {
    /// Broker web service URL used for `/admin` requests.
    pub admin_service_url: String,
    /// BookKeeper HTTP service URL used for `/api/v1/bookie` requests.
    pub bookie_service_url: String,
    /// Bearer token attached to every request.
    pub auth_token: Option<String>,
    /// Accept TLS certificates that fail verification.
    pub tls_allow_insecure: bool,
    /// Rendering of decoded results.
    pub output: OutputFormat,
}

impl Default for CtlConfig {
    fn default() -> Self {
        Self {
            admin_service_url: DEFAULT_ADMIN_SERVICE_URL.to_string(),
            bookie_service_url: DEFAULT_BOOKIE_SERVICE_URL.to_string(),
            auth_token: None,
            tls_allow_insecure: false,
            output: OutputFormat::Json,
        }
    }
}

/// Values given on the command line; `None` leaves the file/default value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `--admin-service-url`
    pub admin_service_url: Option<String>,
    /// `--bookie-service-url`
    pub bookie_service_url: Option<String>,
    /// `--auth-token`
    pub auth_token: Option<String>,
    /// `--tls-allow-insecure`; only ever turns the setting on.
    pub tls_allow_insecure: bool,
    /// `--output`
    pub output: Option<OutputFormat>,
}

impl CtlConfig {
    /// Parses a YAML config document.  Missing keys keep their defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(content)?)
    }

    /// Reads and parses the config file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CtlError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// `$HOME/.config/pulsarctl/config.yaml`, when `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        let home = std::env::var_os("HOME")?;
        Some(
            PathBuf::from(home)
                .join(".config")
                .join("pulsarctl")
                .join("config.yaml"),
        )
    }

    /// Loads the config file (explicit or default), applies `overrides` and validates the result.
    pub fn resolve(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load(&path)?,
                _ => Self::default(),
            },
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Applies command-line overrides on top of this configuration.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(url) = overrides.admin_service_url {
            self.admin_service_url = url;
        }
        if let Some(url) = overrides.bookie_service_url {
            self.bookie_service_url = url;
        }
        if overrides.auth_token.is_some() {
            self.auth_token = overrides.auth_token;
        }
        if overrides.tls_allow_insecure {
            self.tls_allow_insecure = true;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
    }

    /// Checks that both service URLs are absolute http(s) URLs.
    pub fn validate(&self) -> Result<()> {
        validate_service_url("admin_service_url", &self.admin_service_url)?;
        validate_service_url("bookie_service_url", &self.bookie_service_url)?;
        Ok(())
    }
}

fn validate_service_url(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CtlError::Config(format!("{} cannot be empty", field)));
    }
    let url = Url::parse(value)
        .map_err(|e| CtlError::Config(format!("{} '{}' is not a valid URL: {}", field, value, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(CtlError::Config(format!(
            "{} '{}' uses unsupported scheme '{}'",
            field, value, scheme
        ))),
    }
}
