use crate::models::{VlessNode, DEFAULT_NETWORK, DEFAULT_REMARK};
use crate::utils::url::url_decode;
use log::debug;
use std::collections::HashMap;
use url::Url;

pub const VLESS_SCHEME: &str = "vless://";

/// Port assumed when a link does not spell one out
const DEFAULT_PORT: u16 = 443;

/// Parse a VLESS link into a node record
///
/// Returns `None` for anything that is not a well-formed
/// `vless://uuid@host:port?query#remark` link.
pub fn explode_vless(vless: &str) -> Option<VlessNode> {
    let vless = vless.trim();
    if !vless.starts_with(VLESS_SCHEME) {
        return None;
    }

    let url = match Url::parse(vless) {
        Ok(url) => url,
        Err(e) => {
            debug!("Skipping malformed vless link: {}", e);
            return None;
        }
    };

    // Extract uuid
    let uuid = url.username();
    if uuid.is_empty() {
        debug!("Skipping vless link without user id");
        return None;
    }

    // Extract host and port
    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return None,
    };
    let port = url.port().unwrap_or(DEFAULT_PORT);

    // Extract parameters from the query string, first occurrence wins
    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in url.query_pairs() {
        if value.is_empty() {
            continue;
        }
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }

    let security = params.get("security").map(String::as_str);
    let reality = security == Some("reality");
    let tls_secure = reality || security == Some("tls");

    let remark = url_decode(url.fragment().unwrap_or(""));
    let remark = if remark.is_empty() {
        DEFAULT_REMARK.to_string()
    } else {
        remark
    };

    Some(VlessNode {
        remark,
        hostname: host.to_string(),
        port,
        uuid: uuid.to_string(),
        network: params
            .remove("type")
            .unwrap_or_else(|| DEFAULT_NETWORK.to_string()),
        tls_secure,
        server_name: params.remove("sni"),
        flow: params.remove("flow"),
        reality,
        public_key: params.remove("pbk"),
        short_id: params.remove("sid"),
        fingerprint: params.remove("fp"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WS_LINK: &str = "vless://11111111-1111-1111-1111-111111111111@example.com:443?type=ws&security=tls&sni=example.com#NodeA";

    #[test]
    fn test_explode_ws_tls() {
        let node = explode_vless(WS_LINK).unwrap();
        assert_eq!(node.remark, "NodeA");
        assert_eq!(node.hostname, "example.com");
        assert_eq!(node.port, 443);
        assert_eq!(node.uuid, "11111111-1111-1111-1111-111111111111");
        assert_eq!(node.network, "ws");
        assert!(node.tls_secure);
        assert!(!node.reality);
        assert_eq!(node.server_name.as_deref(), Some("example.com"));
        assert_eq!(node.flow, None);
        assert_eq!(node.fingerprint, None);
    }

    #[test]
    fn test_explode_reality() {
        let link = "vless://abc@1.2.3.4:8443?security=reality&pbk=PUBKEY&sid=0123&fp=firefox&flow=xtls-rprx-vision&sni=www.microsoft.com#R";
        let node = explode_vless(link).unwrap();
        assert!(node.tls_secure);
        assert!(node.reality);
        assert_eq!(node.public_key.as_deref(), Some("PUBKEY"));
        assert_eq!(node.short_id.as_deref(), Some("0123"));
        assert_eq!(node.fingerprint.as_deref(), Some("firefox"));
        assert_eq!(node.flow.as_deref(), Some("xtls-rprx-vision"));
        assert_eq!(node.network, "tcp");
        assert_eq!(node.port, 8443);
    }

    #[test]
    fn test_explode_defaults() {
        let node = explode_vless("vless://id@host.example:80").unwrap();
        assert_eq!(node.remark, DEFAULT_REMARK);
        assert_eq!(node.network, DEFAULT_NETWORK);
        assert!(!node.tls_secure);
        assert_eq!(node.server_name, None);
    }

    #[test]
    fn test_explode_missing_port_is_best_effort() {
        let node = explode_vless("vless://id@host.example?security=tls").unwrap();
        assert_eq!(node.port, 443);
    }

    #[test]
    fn test_explode_percent_encoded_remark() {
        let node = explode_vless("vless://id@h:1#%E9%A6%99%E6%B8%AF%20HK").unwrap();
        assert_eq!(node.remark, "香港 HK");
    }

    #[test]
    fn test_explode_unknown_security_is_plain() {
        let node = explode_vless("vless://id@h:1?security=none").unwrap();
        assert!(!node.tls_secure);
        assert!(!node.reality);
    }

    #[test]
    fn test_explode_empty_params_are_absent() {
        let node = explode_vless("vless://id@h:1?sni=&type=&flow=").unwrap();
        assert_eq!(node.server_name, None);
        assert_eq!(node.flow, None);
        assert_eq!(node.network, "tcp");
    }

    #[test]
    fn test_explode_repeated_param_first_wins() {
        let node = explode_vless("vless://id@h:1?sni=a.com&sni=b.com").unwrap();
        assert_eq!(node.server_name.as_deref(), Some("a.com"));
    }

    #[test]
    fn test_explode_malformed() {
        assert!(explode_vless("vless://not-a-valid-url").is_none());
        assert!(explode_vless("vless://").is_none());
        assert!(explode_vless("vless://id@h:99999").is_none());
        assert!(explode_vless("vmess://id@h:1").is_none());
        assert!(explode_vless("not a link at all").is_none());
    }

    #[test]
    fn test_explode_is_idempotent() {
        let first = explode_vless(WS_LINK).unwrap();
        let second = explode_vless(WS_LINK).unwrap();
        assert_eq!(first, second);
    }
}
