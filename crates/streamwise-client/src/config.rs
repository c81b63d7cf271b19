//! Client configuration and factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use streamwise_core::pagination::DEFAULT_PAGE_SIZE;

use crate::admin::HttpAdminClient;
use crate::scoring::HttpScoringClient;

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "STREAMWISE_API_URL";
/// Environment variable overriding `admin_password`.
pub const ADMIN_PASSWORD_ENV: &str = "STREAMWISE_ADMIN_PASSWORD";

/// Top-level streamwise configuration.
///
/// Note: Custom Debug impl masks the admin password to prevent accidental
/// exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the scoring/admin backend.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Timeout for every remote exchange, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Questions per questionnaire page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Question bank file; the bundled bank is used when unset.
    #[serde(default)]
    pub questions_path: Option<PathBuf>,
    /// Admin password for non-interactive admin commands.
    #[serde(default)]
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .field("questions_path", &self.questions_path)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "***"),
            )
            .finish()
    }
}

fn default_api_base_url() -> String {
    "https://academy-backend-skp6.onrender.com".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            questions_path: None,
            admin_password: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn scoring_client(&self) -> HttpScoringClient {
        HttpScoringClient::new(&self.api_base_url, self.timeout())
    }

    pub fn admin_client(&self) -> HttpAdminClient {
        HttpAdminClient::new(&self.api_base_url, self.timeout())
    }

    /// Apply environment overrides, reading variables through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(password) = lookup(ADMIN_PASSWORD_ENV) {
            self.admin_password = Some(password);
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.page_size >= 1, "page_size must be at least 1");
        anyhow::ensure!(self.timeout_secs >= 1, "timeout_secs must be at least 1");
        anyhow::ensure!(
            self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"),
            "api_base_url must be an http(s) URL, got {}",
            self.api_base_url
        );
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted verbatim and never rescanned.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `streamwise.toml` in the current directory
/// 2. `~/.config/streamwise/config.toml`
///
/// Environment variable overrides: `STREAMWISE_API_URL`,
/// `STREAMWISE_ADMIN_PASSWORD`.
pub fn load_config() -> Result<ClientConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("streamwise.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ClientConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ClientConfig::default(),
    };

    config.apply_env_overrides(|name| std::env::var(name).ok());

    config.api_base_url = resolve_env_vars(&config.api_base_url);
    config.admin_password = config.admin_password.as_deref().map(resolve_env_vars);

    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("streamwise"))
}
