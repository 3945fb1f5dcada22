use std::collections::HashMap;

use vless2sub::utils::RemoteTemplates;
use vless2sub::{Artifact, ConvertError, Converter, Target};

const LINKS: &str = "\
vless://11111111-1111-1111-1111-111111111111@example.com:443?type=ws&security=tls&sni=example.com#NodeA
vless://not-a-valid-url
   vless://22222222-2222-2222-2222-222222222222@203.0.113.7:8443?security=reality&pbk=PK&sid=01&fp=chrome&flow=xtls-rprx-vision#Node%20B
some note that is not a link
";

fn file_templates(dir: &tempfile::TempDir, singbox: &str, clash: &str) -> RemoteTemplates {
    let singbox_path = dir.path().join("singbox.json");
    let clash_path = dir.path().join("clash.yaml");
    std::fs::write(&singbox_path, singbox).unwrap();
    std::fs::write(&clash_path, clash).unwrap();
    RemoteTemplates::new(HashMap::from([
        (Target::SingBox, singbox_path.to_string_lossy().into_owned()),
        (Target::Clash, clash_path.to_string_lossy().into_owned()),
    ]))
}

#[cfg(test)]
mod convert_tests {
    use super::*;

    #[actix_web::test]
    async fn test_singbox_from_file_template() {
        let dir = tempfile::tempdir().unwrap();
        let templates = file_templates(
            &dir,
            r#"{"outbounds": [{"type": "selector", "tag": "select", "outbounds": ["my_vps", "direct"]}, {"type": "direct", "tag": "direct"}]}"#,
            "",
        );
        let converter = Converter::new(templates);

        let Artifact::Document(config) = converter.convert(LINKS, Target::SingBox).await else {
            panic!("expected a document");
        };
        assert_eq!(
            config["outbounds"][0]["outbounds"],
            serde_json::json!(["direct", "NodeA", "Node B"])
        );
        let reality = &config["outbounds"][3];
        assert_eq!(reality["tag"], "Node B");
        assert_eq!(reality["server"], "203.0.113.7");
        assert_eq!(reality["server_port"], 8443);
        assert_eq!(reality["tls"]["reality"]["public_key"], "PK");
        assert_eq!(reality["tls"]["reality"]["short_id"], "01");
    }

    #[actix_web::test]
    async fn test_clash_from_file_template() {
        let dir = tempfile::tempdir().unwrap();
        let clash = "mode: rule\nproxy-groups:\n  - name: select\n    type: select\n    proxies: [DIRECT]\n";
        let templates = file_templates(&dir, "{}", clash);
        let converter = Converter::new(templates);

        let Artifact::Text(text) = converter.convert(LINKS, Target::Clash).await else {
            panic!("expected text");
        };
        assert!(text.contains("  - name: NodeA\n"));
        assert!(text.contains("  - name: Node B\n"));
        assert!(text.contains("    reality-opts:\n      public-key: PK\n      short-id: '01'\n"));
        assert!(text.contains("proxies: [DIRECT, NodeA, Node B]"));
        assert!(!text.contains("not-a-valid-url"));
    }

    #[actix_web::test]
    async fn test_missing_template_file() {
        let converter = Converter::new(RemoteTemplates::new(HashMap::from([(
            Target::Clash,
            "/nonexistent/clash.yaml".to_string(),
        )])));
        let Artifact::Text(text) = converter.convert(LINKS, Target::Clash).await else {
            panic!("expected text");
        };
        assert!(text.starts_with("# Error fetching Clash template: Failed to read /nonexistent/clash.yaml"));
    }

    #[actix_web::test]
    async fn test_unknown_selector() {
        let converter = Converter::new(RemoteTemplates::new(HashMap::new()));
        assert_eq!(
            converter.convert_selector(LINKS, "v2ray").await.unwrap_err(),
            ConvertError::UnknownTarget("v2ray".to_string())
        );
    }
}
