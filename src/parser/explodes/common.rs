use super::vless::{explode_vless, VLESS_SCHEME};
use crate::models::VlessNode;
use log::debug;

/// Keep only the lines that look like VLESS links
pub fn filter_links(sub: &str) -> Vec<&str> {
    sub.lines()
        .map(str::trim)
        .filter(|line| line.starts_with(VLESS_SCHEME))
        .collect()
}

/// Explode a multi-line submission into node records
///
/// Lines that are not VLESS links are ignored, malformed links are dropped.
/// The returned nodes keep the order of the input.
pub fn explode_sub(sub: &str) -> Vec<VlessNode> {
    let links = filter_links(sub);
    let nodes: Vec<VlessNode> = links.iter().filter_map(|link| explode_vless(link)).collect();

    if nodes.len() != links.len() {
        debug!(
            "Dropped {} malformed link(s) out of {}",
            links.len() - nodes.len(),
            links.len()
        );
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_links_excludes_other_lines() {
        let sub = "# my nodes\n  vless://a@h:1#A\r\ntrojan://p@h:1\n\nhttp://x\nvless://b@h:2#B";
        assert_eq!(filter_links(sub), vec!["vless://a@h:1#A", "vless://b@h:2#B"]);
    }

    #[test]
    fn test_explode_sub_drops_malformed_and_keeps_order() {
        let sub = "vless://id1@one.example:1#First\nvless://not-a-valid-url\nvless://id2@two.example:2#Second";
        let nodes = explode_sub(sub);
        let remarks: Vec<&str> = nodes.iter().map(|n| n.remark.as_str()).collect();
        assert_eq!(remarks, vec!["First", "Second"]);
    }

    #[test]
    fn test_explode_sub_empty() {
        assert!(explode_sub("").is_empty());
        assert!(explode_sub("nothing useful\nhere").is_empty());
    }
}
