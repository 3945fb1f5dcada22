use std::fmt;

/// Output format a subscription can be rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Target {
    #[default]
    SingBox,
    Clash,
}

impl Target {
    /// Parse the `target` query value. Returns `None` for anything unsupported.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "singbox" => Some(Target::SingBox),
            "clash" => Some(Target::Clash),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::SingBox => "singbox",
            Target::Clash => "clash",
        }
    }

    /// Content type the rendered artifact is served with.
    pub fn content_type(&self) -> &'static str {
        match self {
            Target::SingBox => "application/json; charset=utf-8",
            Target::Clash => "text/yaml; charset=utf-8",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_from_str() {
        assert_eq!(Target::from_str("singbox"), Some(Target::SingBox));
        assert_eq!(Target::from_str("clash"), Some(Target::Clash));
        assert_eq!(Target::from_str("surge"), None);
        assert_eq!(Target::from_str("Clash"), None);
    }

    #[test]
    fn test_default_target() {
        assert_eq!(Target::default(), Target::SingBox);
    }
}
