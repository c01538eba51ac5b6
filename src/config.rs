use serde::Deserialize;
use std::path::Path;

use crate::errors::ConfigError;

/// Attribute names and the open-context sentinel the validator works with.
/// Every key is configurable so deployments can rename the underlying
/// attributes without code changes.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Requested context meaning "no specific factor required".
    pub open_context: String,
    /// Attribute listing contexts the session has actually completed.
    pub proven_attribute: String,
    /// Attribute listing contexts satisfied through delegated trust.
    pub trusted_attribute: String,
    /// Boolean attribute set when a factor was administratively skipped.
    pub bypass_flag_attribute: String,
    /// Attribute naming which context was skipped.
    pub bypass_provider_attribute: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            open_context: "OPEN".into(),
            proven_attribute: "authn_method".into(),
            trusted_attribute: "trusted_authn".into(),
            bypass_flag_attribute: "bypassMultifactorAuthentication".into(),
            bypass_provider_attribute: "bypassedMultifactorAuthenticationProviderId".into(),
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_open_context(mut self, value: impl Into<String>) -> Self {
        self.open_context = value.into();
        self
    }

    pub fn with_proven_attribute(mut self, value: impl Into<String>) -> Self {
        self.proven_attribute = value.into();
        self
    }

    pub fn with_trusted_attribute(mut self, value: impl Into<String>) -> Self {
        self.trusted_attribute = value.into();
        self
    }

    pub fn with_bypass_attributes(
        mut self,
        flag: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        self.bypass_flag_attribute = flag.into();
        self.bypass_provider_attribute = provider.into();
        self
    }

    /// Parse a JSON document; missing keys fall back to the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ValidatorConfig::from_json(r#"{"proven_attribute":"amr"}"#).unwrap();
        assert_eq!(cfg.proven_attribute, "amr");
        assert_eq!(cfg.trusted_attribute, "trusted_authn");
        assert_eq!(cfg.open_context, "OPEN");
    }

    #[test]
    fn builder_overrides() {
        let cfg = ValidatorConfig::new()
            .with_open_context("NONE")
            .with_trusted_attribute("remembered")
            .with_bypass_attributes("skipped", "skipped_provider");
        assert_eq!(cfg.open_context, "NONE");
        assert_eq!(cfg.trusted_attribute, "remembered");
        assert_eq!(cfg.bypass_flag_attribute, "skipped");
        assert_eq!(cfg.bypass_provider_attribute, "skipped_provider");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ValidatorConfig::from_path("/nonexistent/mfa-gate.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
