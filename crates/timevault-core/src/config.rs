//! TimeVault sweeper configuration.
//!
//! Loaded from `~/.timevault/config.toml`; secrets can be overridden via
//! environment variables so nothing sensitive has to live on disk
//! (`TIMEVAULT_EMAIL_PASSWORD`, `TIMEVAULT_SERVICE_ACCOUNT`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, TimeVaultError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimeVaultConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub links: LinkConfig,
}

impl TimeVaultConfig {
    /// Load config from the default path (~/.timevault/config.toml),
    /// then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load config from a specific path (no env overrides).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TimeVaultError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| TimeVaultError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the TimeVault home directory (~/.timevault).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".timevault")
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(pass) = std::env::var("TIMEVAULT_EMAIL_PASSWORD")
            && !pass.is_empty()
        {
            self.email.password = pass;
        }
        if let Ok(path) = std::env::var("TIMEVAULT_SERVICE_ACCOUNT")
            && !path.is_empty()
        {
            self.store.credentials_path = path;
        }
    }

    /// Sanity-check the fields a sweep cannot run without.
    pub fn validate(&self) -> Result<()> {
        if self.store.project_id.is_empty() {
            return Err(TimeVaultError::Config("store.project_id is not set".into()));
        }
        if self.email.address.is_empty() {
            return Err(TimeVaultError::Config("email.address is not set".into()));
        }
        Ok(())
    }
}

/// Firestore project + credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
}

fn default_credentials_path() -> String {
    TimeVaultConfig::home_dir()
        .join("service-account.json")
        .to_string_lossy()
        .into_owned()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            credentials_path: default_credentials_path(),
        }
    }
}

/// SMTP sender account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Sender address; also used as Reply-To on every unlock mail.
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_display_name")]
    pub display_name: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".into()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_display_name() -> String {
    "Time Vault".into()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            address: String::new(),
            password: String::new(),
            display_name: default_display_name(),
        }
    }
}

/// Push (FCM) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
}

fn bool_true() -> bool {
    true
}

impl Default for PushConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Outbound link targets embedded in notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Web fallback page; userId/vaultId are appended as query parameters.
    #[serde(default = "default_vault_web_base")]
    pub vault_web_base: String,
}

fn default_vault_web_base() -> String {
    "https://alok-kumar2024.github.io/Vault-Web/vault.html".into()
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            vault_web_base: default_vault_web_base(),
        }
    }
}
