use crate::models::{Target, VlessNode};
use crate::utils::http::TemplateSource;
use crate::utils::yaml::{sequence_item, to_yaml_string, yaml_flow_scalar};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};

/// New proxies are inserted right before this line of the template
pub const PROXY_GROUPS_MARKER: &str = "proxy-groups:";

/// Inline member list of a proxy group, e.g. `proxies: [Auto, DIRECT]`.
/// The key must open a line; the list body may span several lines.
/// Block sequences are not matched.
static GROUP_PROXIES_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)(^[ \t]*(?:- )?proxies:\s*\[)([^\]]*)(\])").unwrap()
});

fn insert_str(map: &mut Mapping, key: &str, value: &str) {
    map.insert(
        Value::String(key.to_string()),
        Value::String(value.to_string()),
    );
}

/// Build one node as a Clash proxy mapping, keys in output order
pub fn node_to_clash_mapping(node: &VlessNode) -> Mapping {
    let mut proxy = Mapping::new();
    insert_str(&mut proxy, "name", &node.remark);
    insert_str(&mut proxy, "server", &node.hostname);
    proxy.insert(
        Value::String("port".to_string()),
        Value::Number(node.port.into()),
    );
    insert_str(&mut proxy, "type", "vless");
    insert_str(&mut proxy, "uuid", &node.uuid);
    proxy.insert(Value::String("tls".to_string()), Value::Bool(true));
    if let Some(flow) = &node.flow {
        insert_str(&mut proxy, "flow", flow);
    }
    if node.reality {
        let mut reality_opts = Mapping::new();
        insert_str(
            &mut reality_opts,
            "public-key",
            node.public_key.as_deref().unwrap_or(""),
        );
        if let Some(short_id) = &node.short_id {
            insert_str(&mut reality_opts, "short-id", short_id);
        }
        proxy.insert(
            Value::String("reality-opts".to_string()),
            Value::Mapping(reality_opts),
        );
    }
    if let Some(server_name) = &node.server_name {
        insert_str(&mut proxy, "servername", server_name);
    }
    if let Some(fingerprint) = &node.fingerprint {
        insert_str(&mut proxy, "client-fingerprint", fingerprint);
    }
    insert_str(&mut proxy, "network", &node.network);
    proxy.insert(Value::String("udp".to_string()), Value::Bool(true));
    proxy
}

/// Render one node as an entry of the top-level `proxies:` sequence
pub fn node_to_clash_proxy(node: &VlessNode) -> Result<String, serde_yaml::Error> {
    let rendered = to_yaml_string(&Value::Mapping(node_to_clash_mapping(node)))?;
    Ok(sequence_item(&rendered, 2))
}

/// Build the `proxies:` block holding every node
pub fn build_proxies_block(nodes: &[VlessNode]) -> Result<String, serde_yaml::Error> {
    let mut block = String::from("proxies:\n");
    for node in nodes {
        block.push_str(&node_to_clash_proxy(node)?);
    }
    Ok(block)
}

/// Insert the block before the first `proxy-groups:`, or append it when there is none
pub fn insert_proxies_block(base_conf: &str, block: &str) -> String {
    if base_conf.contains(PROXY_GROUPS_MARKER) {
        base_conf.replacen(
            PROXY_GROUPS_MARKER,
            &format!("{}\n{}", block, PROXY_GROUPS_MARKER),
            1,
        )
    } else {
        format!("{}\n{}", base_conf, block)
    }
}

/// Append `names` to every inline group member list
pub fn append_group_members(base_conf: &str, names: &[String]) -> Result<String, serde_yaml::Error> {
    let joined = names
        .iter()
        .map(|name| yaml_flow_scalar(name))
        .collect::<Result<Vec<_>, _>>()?
        .join(", ");

    Ok(GROUP_PROXIES_REGEX
        .replace_all(base_conf, |caps: &Captures| {
            let (prefix, content, suffix) = (&caps[1], &caps[2], &caps[3]);
            if content.trim().is_empty() {
                format!("{} {} {}", prefix, joined, suffix)
            } else {
                let existing = content.trim_end();
                let trailing = &content[existing.len()..];
                format!("{}{}, {}{}{}", prefix, existing, joined, trailing, suffix)
            }
        })
        .into_owned())
}

/// Merge nodes into an already fetched Clash template
///
/// With no nodes the template is returned unchanged. Group lists are
/// rewritten on the template alone, so the inserted proxies are never
/// mistaken for a group.
pub fn merge_clash_template(
    base_conf: String,
    nodes: &[VlessNode],
) -> Result<String, serde_yaml::Error> {
    if nodes.is_empty() {
        return Ok(base_conf);
    }
    let names: Vec<String> = nodes.iter().map(|node| node.remark.clone()).collect();
    let grouped = append_group_members(&base_conf, &names)?;
    Ok(insert_proxies_block(&grouped, &build_proxies_block(nodes)?))
}

/// Convert nodes to a Clash configuration built on the remote template
///
/// Failures never escape: a template that cannot be fetched yields a YAML
/// comment describing the error.
pub async fn proxy_to_clash<T: TemplateSource>(nodes: &[VlessNode], source: &T) -> String {
    let base_conf = match source.fetch(Target::Clash).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to fetch Clash template: {}", e);
            return format!("# Error fetching Clash template: {}", e);
        }
    };

    debug!("Merging {} proxy(ies) into Clash template", nodes.len());
    match merge_clash_template(base_conf, nodes) {
        Ok(merged) => merged,
        Err(e) => {
            warn!("Failed to render Clash proxies: {}", e);
            format!("# Error rendering Clash proxies: {}", e)
        }
    }
}
