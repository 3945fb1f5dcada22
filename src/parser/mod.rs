pub mod explodes;

pub use explodes::{explode_sub, explode_vless};
