//! System utilities

use std::env;

const PROXY_ENV: [&str; 6] = [
    "all_proxy",
    "ALL_PROXY",
    "https_proxy",
    "HTTPS_PROXY",
    "http_proxy",
    "HTTP_PROXY",
];

/// Get environment variable value, or an empty string if unset
pub fn get_env(name: &str) -> String {
    env::var(name).unwrap_or_default()
}

/// Get the proxy configured through the usual environment variables
///
/// # Returns
///
/// The proxy server string or empty string if none is set
pub fn get_system_proxy() -> String {
    PROXY_ENV
        .iter()
        .map(|var| get_env(var))
        .find(|proxy| !proxy.is_empty())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env() {
        let path = get_env("PATH");
        assert!(!path.is_empty());
        assert!(get_env("VLESS2SUB_SURELY_UNSET_VARIABLE").is_empty());
    }
}
