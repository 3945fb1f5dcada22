pub mod clash;
pub mod singbox;

// Re-export all format converters
pub use clash::proxy_to_clash;
pub use singbox::{proxy_to_singbox, MergeError};
