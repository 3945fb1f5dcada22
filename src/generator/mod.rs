pub mod config;

// Re-export format converters
pub use config::formats::clash::proxy_to_clash;
pub use config::formats::singbox::{proxy_to_singbox, MergeError};
