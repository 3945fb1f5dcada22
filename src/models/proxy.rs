//! Proxy model definitions
//!
//! Contains the node record produced by the link parser and consumed by
//! both output generators.

/// Remark used when a link carries no fragment.
pub const DEFAULT_REMARK: &str = "Node";

/// Network mode assumed when the link has no `type` parameter.
pub const DEFAULT_NETWORK: &str = "tcp";

/// Represents one parsed `vless://` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlessNode {
    /// Display name taken from the URL fragment
    pub remark: String,
    pub hostname: String,
    pub port: u16,
    /// The user id carried in the URL username
    pub uuid: String,
    /// Transport network (`tcp`, `ws`, `grpc`, ...)
    pub network: String,
    /// Set for both `security=tls` and `security=reality`
    pub tls_secure: bool,
    pub server_name: Option<String>,
    pub flow: Option<String>,
    pub reality: bool,
    /// Reality public key (`pbk`)
    pub public_key: Option<String>,
    /// Reality short id (`sid`)
    pub short_id: Option<String>,
    /// uTLS client fingerprint (`fp`)
    pub fingerprint: Option<String>,
}

impl Default for VlessNode {
    fn default() -> Self {
        VlessNode {
            remark: DEFAULT_REMARK.to_string(),
            hostname: String::new(),
            port: 0,
            uuid: String::new(),
            network: DEFAULT_NETWORK.to_string(),
            tls_secure: false,
            server_name: None,
            flow: None,
            reality: false,
            public_key: None,
            short_id: None,
            fingerprint: None,
        }
    }
}

impl VlessNode {
    pub fn is_websocket(&self) -> bool {
        self.network == "ws"
    }
}
