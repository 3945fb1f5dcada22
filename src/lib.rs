pub mod generator;
pub mod interfaces;
pub mod models;
pub mod parser;
pub mod settings;
pub mod storage;
pub mod utils;
pub mod web_handlers;

// Re-export the main types for easier access
pub use interfaces::{Artifact, ConvertError, Converter};
pub use models::{AppState, Target, VlessNode};
pub use settings::Settings;
