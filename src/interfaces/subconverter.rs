use crate::generator::config::formats::{clash::proxy_to_clash, singbox::proxy_to_singbox};
use crate::models::Target;
use crate::parser::explode_sub;
use crate::utils::http::TemplateSource;
use log::info;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Unknown target: {0}")]
    UnknownTarget(String),
}

/// Result of a conversion, ready to be served
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    /// SingBox configuration, or the error document that replaces it
    Document(Value),
    /// Clash configuration text
    Text(String),
}

impl Artifact {
    pub fn content_type(&self) -> &'static str {
        match self {
            Artifact::Document(_) => Target::SingBox.content_type(),
            Artifact::Text(_) => Target::Clash.content_type(),
        }
    }

    /// Serialize the artifact into the response body
    pub fn into_body(self) -> String {
        match self {
            Artifact::Document(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
            Artifact::Text(text) => text,
        }
    }

    /// Whether this is the error document produced by a failed SingBox merge
    pub fn is_error(&self) -> bool {
        matches!(self, Artifact::Document(value) if value.get("error").is_some())
    }
}

/// Turns submitted link lists into configurations
#[derive(Debug, Clone)]
pub struct Converter<T> {
    templates: T,
}

impl<T: TemplateSource> Converter<T> {
    pub fn new(templates: T) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &T {
        &self.templates
    }

    /// Resolve a `target` selector, an empty one meaning the default
    pub fn resolve_target(selector: &str) -> Result<Target, ConvertError> {
        if selector.is_empty() {
            return Ok(Target::default());
        }
        Target::from_str(selector).ok_or_else(|| ConvertError::UnknownTarget(selector.to_string()))
    }

    /// Convert for a target given by its query string name
    ///
    /// An unsupported name is rejected before any template is fetched.
    pub async fn convert_selector(&self, raw: &str, selector: &str) -> Result<Artifact, ConvertError> {
        let target = Self::resolve_target(selector)?;
        Ok(self.convert(raw, target).await)
    }

    /// Convert raw submitted text into the requested format
    ///
    /// Every failure is turned into a value: SingBox gets an error document,
    /// Clash gets the template or an error comment.
    pub async fn convert(&self, raw: &str, target: Target) -> Artifact {
        let nodes = explode_sub(raw);
        info!(
            "Processing conversion of {} node(s) to {}",
            nodes.len(),
            target
        );

        match target {
            Target::SingBox => match proxy_to_singbox(&nodes, &self.templates).await {
                Ok(config) => Artifact::Document(config),
                Err(e) => {
                    info!("SingBox conversion produced an error document: {}", e);
                    Artifact::Document(e.to_value())
                }
            },
            Target::Clash => Artifact::Text(proxy_to_clash(&nodes, &self.templates).await),
        }
    }
}
