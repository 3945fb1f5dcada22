//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use vless2sub::models::{Target, VlessNode};
//!
//! let mut node = VlessNode::default();
//! node.hostname = "example.com".to_string();
//! node.port = 443;
//! assert_eq!(node.remark, "Node");
//! assert_eq!(Target::from_str("clash"), Some(Target::Clash));
//! ```

mod app_state;
mod proxy;
mod target;

pub use app_state::AppState;
pub use proxy::*;
pub use target::Target;
