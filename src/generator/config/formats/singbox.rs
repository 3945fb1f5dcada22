use crate::models::{Target, VlessNode};
use crate::utils::http::TemplateSource;
use log::{debug, warn};
use serde_json::{self, json, Map, Value};
use thiserror::Error;

/// Tag that marks where new outbounds go in a template
pub const PLACEHOLDER_TAG: &str = "my_vps";

/// Outbound types that pick among other outbounds by tag
const GROUP_TYPES: [&str; 3] = ["selector", "urltest", "fallback"];

const DEFAULT_FINGERPRINT: &str = "chrome";

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to parse any VLESS link")]
    NoValidLinks,

    #[error("failed to fetch {target} template")]
    TemplateFetch { target: Target, details: String },
}

impl MergeError {
    /// The error document served in place of a configuration
    pub fn to_value(&self) -> Value {
        match self {
            MergeError::NoValidLinks => json!({ "error": self.to_string() }),
            MergeError::TemplateFetch { details, .. } => json!({
                "error": self.to_string(),
                "details": details,
            }),
        }
    }
}

/// Build a SingBox outbound for one node
pub fn node_to_outbound(node: &VlessNode) -> Value {
    let mut tls = json!({
        "enabled": node.tls_secure,
        "utls": {
            "enabled": true,
            "fingerprint": node.fingerprint.as_deref().unwrap_or(DEFAULT_FINGERPRINT)
        }
    });
    if let Some(server_name) = &node.server_name {
        tls["server_name"] = json!(server_name);
    }

    if node.reality {
        let mut reality = Map::new();
        reality.insert("enabled".to_string(), json!(true));
        if let Some(public_key) = &node.public_key {
            reality.insert("public_key".to_string(), json!(public_key));
        }
        if let Some(short_id) = &node.short_id {
            reality.insert("short_id".to_string(), json!(short_id));
        }
        tls["reality"] = Value::Object(reality);
    }

    let mut outbound = json!({
        "type": "vless",
        "tag": node.remark,
        "server": node.hostname,
        "server_port": node.port,
        "uuid": node.uuid,
        "flow": node.flow.as_deref().unwrap_or(""),
        "tls": tls,
        "packet_encoding": "xudp"
    });

    if node.is_websocket() {
        outbound["transport"] = json!({
            "type": "ws",
            "path": "/",
            "headers": {}
        });
    }

    outbound
}

/// Splice outbounds into a parsed SingBox template
///
/// Every group that referenced [`PLACEHOLDER_TAG`] loses that reference and
/// gains the tags of `outbounds` at the end of its list. Top-level entries
/// tagged with the placeholder are removed.
pub fn merge_outbounds(config: &mut Map<String, Value>, outbounds: Vec<Value>) {
    let tags: Vec<Value> = outbounds
        .iter()
        .filter_map(|outbound| outbound.get("tag").cloned())
        .collect();

    // Ensure outbounds array exists
    if !matches!(config.get("outbounds"), Some(Value::Array(_))) {
        config.insert("outbounds".to_string(), json!([]));
    }
    let Some(Value::Array(all_outbounds)) = config.get_mut("outbounds") else {
        return;
    };

    all_outbounds.extend(outbounds);

    for outbound in all_outbounds.iter_mut() {
        let is_group = outbound
            .get("type")
            .and_then(Value::as_str)
            .is_some_and(|t| GROUP_TYPES.contains(&t));
        if !is_group {
            continue;
        }
        let Some(Value::Array(members)) = outbound.get_mut("outbounds") else {
            continue;
        };
        if let Some(index) = members
            .iter()
            .position(|member| member.as_str() == Some(PLACEHOLDER_TAG))
        {
            members.remove(index);
            members.extend(tags.iter().cloned());
        }
    }

    all_outbounds
        .retain(|outbound| outbound.get("tag").and_then(Value::as_str) != Some(PLACEHOLDER_TAG));
}

/// Convert nodes to a SingBox configuration built on the remote template
///
/// # Arguments
/// * `nodes` - Parsed nodes, in input order
/// * `source` - Where the template is fetched from
pub async fn proxy_to_singbox<T: TemplateSource>(
    nodes: &[VlessNode],
    source: &T,
) -> Result<Value, MergeError> {
    if nodes.is_empty() {
        return Err(MergeError::NoValidLinks);
    }
    let outbounds: Vec<Value> = nodes.iter().map(node_to_outbound).collect();

    let base_conf = source.fetch(Target::SingBox).await.map_err(|e| {
        warn!("Failed to fetch SingBox template: {}", e);
        MergeError::TemplateFetch {
            target: Target::SingBox,
            details: e.to_string(),
        }
    })?;

    // Parse the base configuration
    let mut config = match serde_json::from_str::<Value>(&base_conf) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(MergeError::TemplateFetch {
                target: Target::SingBox,
                details: "template is not a JSON object".to_string(),
            })
        }
        Err(e) => {
            return Err(MergeError::TemplateFetch {
                target: Target::SingBox,
                details: e.to_string(),
            })
        }
    };

    debug!("Merging {} outbound(s) into SingBox template", outbounds.len());
    merge_outbounds(&mut config, outbounds);
    Ok(Value::Object(config))
}
