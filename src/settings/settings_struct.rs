use std::path::Path;
use std::sync::Arc;
use std::sync::LazyLock;
use std::sync::RwLock;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::utils::http::DEFAULT_TIMEOUT;

pub const DEFAULT_SINGBOX_TEMPLATE: &str =
    "https://gist.githubusercontent.com/crb912/c952899eccbc176fd3b47fe410408006/raw/net_config_singbox";
pub const DEFAULT_CLASH_TEMPLATE: &str =
    "https://gist.githubusercontent.com/crb912/10ad5c3292add2fc6f6d91c504008f89/raw/net_config_clash.yaml";

/// 30 days
pub const DEFAULT_SUBMISSION_TTL: u64 = 60 * 60 * 24 * 30;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML settings: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings structure to hold global configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Path the settings were loaded from, empty for built-in defaults
    #[serde(skip)]
    pub pref_path: String,
    pub log_level: String,
    pub server: ServerSettings,
    pub templates: TemplateSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub listen_address: String,
    pub listen_port: u16,
    pub max_concur_threads: usize,
}

/// Endpoints of the merge templates, either URLs or local file paths
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    pub singbox: String,
    pub clash: String,
    /// Fetch timeout in seconds
    pub timeout: u64,
    /// Upstream proxy for template fetches, `SYSTEM` to use the environment
    pub proxy: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// How long a submission stays readable, in seconds
    pub ttl: u64,
}

// Default value functions
pub fn default_listen_address() -> String {
    "127.0.0.1".to_string()
}

pub fn default_listen_port() -> u16 {
    25500
}

pub fn default_max_concur_threads() -> usize {
    4
}

pub fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            pref_path: String::new(),
            log_level: default_log_level(),
            server: ServerSettings::default(),
            templates: TemplateSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
            max_concur_threads: default_max_concur_threads(),
        }
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        TemplateSettings {
            singbox: DEFAULT_SINGBOX_TEMPLATE.to_string(),
            clash: DEFAULT_CLASH_TEMPLATE.to_string(),
            timeout: DEFAULT_TIMEOUT,
            proxy: String::new(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            ttl: DEFAULT_SUBMISSION_TTL,
        }
    }
}

impl Settings {
    /// Create a new settings instance with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current() -> Arc<Settings> {
        match GLOBAL.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Parse settings, trying TOML first and falling back to YAML
    pub fn load_from_content(content: &str) -> Result<Self, SettingsError> {
        if toml::from_str::<toml::Table>(content).is_ok() {
            return Self::load_from_toml(content);
        }
        Self::load_from_yaml(content)
    }

    pub fn load_from_yaml(content: &str) -> Result<Self, SettingsError> {
        // An empty document deserializes to null, which serde(default) does not cover
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        let mut settings: Settings = serde_yaml::from_str(content)?;
        settings.normalize();
        Ok(settings)
    }

    pub fn load_from_toml(content: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = toml::from_str(content)?;
        settings.normalize();
        Ok(settings)
    }

    /// Load settings from a file, using the extension to pick the format
    pub fn load_from_file(path: &str) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_string(),
            source,
        })?;

        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase);
        let mut settings = match extension.as_deref() {
            Some("toml") => Settings::load_from_toml(&content)?,
            Some("yaml") | Some("yml") => Settings::load_from_yaml(&content)?,
            _ => Settings::load_from_content(&content)?,
        };
        settings.pref_path = path.to_owned();
        Ok(settings)
    }

    fn normalize(&mut self) {
        if self.server.listen_address.trim().is_empty() {
            self.server.listen_address = default_listen_address();
        }
        if self.server.max_concur_threads == 0 {
            self.server.max_concur_threads = default_max_concur_threads();
        }
        if self.templates.timeout == 0 {
            self.templates.timeout = DEFAULT_TIMEOUT;
        }
    }

    /// `address:port` to bind, honouring an address that already carries a port
    pub fn listen_address(&self) -> String {
        if self.server.listen_address.contains(':') {
            self.server.listen_address.clone()
        } else {
            format!(
                "{}:{}",
                self.server.listen_address, self.server.listen_port
            )
        }
    }
}

// Global settings instance
static GLOBAL: LazyLock<RwLock<Arc<Settings>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Settings::new())));

fn replace_global(settings: Settings) {
    let mut guard = match GLOBAL.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = Arc::new(settings);
}

/// Initialise the global settings, an empty path keeps the defaults
pub fn init_settings(path: &str) -> Result<(), SettingsError> {
    if path.is_empty() {
        info!("No settings file given, using defaults");
        return Ok(());
    }
    let settings = Settings::load_from_file(path)?;
    info!("Loaded settings from {}", path);
    replace_global(settings);
    Ok(())
}

pub fn update_settings_from_content(content: &str) -> Result<(), SettingsError> {
    replace_global(Settings::load_from_content(content)?);
    Ok(())
}
