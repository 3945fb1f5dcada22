//! Settings module
//!
//! Global configuration loaded from a YAML or TOML file.

pub mod settings_struct;

pub use settings_struct::{
    init_settings, update_settings_from_content, ServerSettings, Settings, SettingsError,
    StorageSettings, TemplateSettings,
};
