use crate::models::Target;
use crate::settings::TemplateSettings;
use crate::utils::system::get_system_proxy;
use crate::utils::url::is_link;
use log::debug;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Proxy, StatusCode};
use thiserror::Error;

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 15;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("No template configured for {0}")]
    NotConfigured(Target),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Failed to send request: {0}")]
    Request(String),

    #[error("HTTP error: {0}")]
    Status(StatusCode),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ProxyConfig {
    pub proxy: Option<String>,
}

/// Interpret the `proxy` setting: `SYSTEM` reads the environment, `NONE` or empty disables it
pub fn parse_proxy(proxy_str: &str) -> ProxyConfig {
    match proxy_str {
        "SYSTEM" => {
            let system = get_system_proxy();
            ProxyConfig {
                proxy: (!system.is_empty()).then_some(system),
            }
        }
        "NONE" | "" => ProxyConfig { proxy: None },
        other => ProxyConfig {
            proxy: Some(other.to_string()),
        },
    }
}

/// Makes an HTTP GET request and returns the body of a `200 OK` response
///
/// # Arguments
/// * `url` - The URL to request
/// * `proxy_config` - Optional upstream proxy
/// * `timeout` - Upper bound for the whole request
pub async fn web_get_async(
    url: &str,
    proxy_config: &ProxyConfig,
    timeout: Duration,
) -> Result<String, FetchError> {
    let mut client_builder = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("vless2sub/", env!("CARGO_PKG_VERSION")));

    if let Some(proxy) = &proxy_config.proxy {
        let proxy = Proxy::all(proxy)
            .map_err(|e| FetchError::Client(format!("Failed to set proxy: {}", e)))?;
        client_builder = client_builder.proxy(proxy);
    }

    let client = client_builder
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Request(e.to_string()))?;

    if response.status() != StatusCode::OK {
        return Err(FetchError::Status(response.status()));
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::Body(e.to_string()))
}

/// Where merge templates come from
///
/// Implementations fetch fresh content on every call; nothing is cached.
pub trait TemplateSource {
    fn fetch(&self, target: Target) -> impl Future<Output = Result<String, FetchError>>;
}

/// Templates addressed by URL (fetched over HTTP) or by local file path
#[derive(Debug, Clone)]
pub struct RemoteTemplates {
    endpoints: HashMap<Target, String>,
    timeout: Duration,
    proxy: ProxyConfig,
}

impl RemoteTemplates {
    pub fn new(endpoints: HashMap<Target, String>) -> Self {
        Self {
            endpoints,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            proxy: ProxyConfig::default(),
        }
    }

    pub fn from_settings(settings: &TemplateSettings) -> Self {
        let endpoints = HashMap::from([
            (Target::SingBox, settings.singbox.clone()),
            (Target::Clash, settings.clash.clone()),
        ]);
        Self {
            endpoints,
            timeout: Duration::from_secs(settings.timeout),
            proxy: parse_proxy(&settings.proxy),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self, target: Target) -> Option<&str> {
        self.endpoints
            .get(&target)
            .map(String::as_str)
            .filter(|endpoint| !endpoint.is_empty())
    }
}

impl TemplateSource for RemoteTemplates {
    async fn fetch(&self, target: Target) -> Result<String, FetchError> {
        let endpoint = self
            .endpoint(target)
            .ok_or(FetchError::NotConfigured(target))?;
        debug!("Fetching {} template from {}", target, endpoint);

        if is_link(endpoint) {
            web_get_async(endpoint, &self.proxy, self.timeout).await
        } else {
            tokio::fs::read_to_string(endpoint)
                .await
                .map_err(|source| FetchError::Io {
                    path: endpoint.to_string(),
                    source,
                })
        }
    }
}
