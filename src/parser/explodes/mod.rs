pub mod common;
pub mod vless;

pub use common::{explode_sub, filter_links};
pub use vless::{explode_vless, VLESS_SCHEME};
