pub mod http;
pub mod system;
pub mod url;
pub mod yaml;

// Re-export common utilities
pub use http::{RemoteTemplates, TemplateSource};
pub use url::{url_decode, url_encode};
