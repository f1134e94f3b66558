//! Gate configuration
//!
//! Loaded from TOML; every field is optional and falls back to its default.
//!
//! ```toml
//! partial_parse = "reject"
//! spec_layout = "trimmed"
//! check_invariants = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use specgate_inject::SpecLayout;

use crate::error::ConfigError;

/// What to do with sources that parse only partially
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartialParsePolicy {
    /// Extract anchors outside the error regions and flag the structure
    #[default]
    Tolerate,
    /// Fail extraction with `ExtractError::PartialParse`
    Reject,
}

/// Gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
    /// Handling of local parse errors
    pub partial_parse: PartialParsePolicy,
    /// Shaping of spec text before insertion
    pub spec_layout: SpecLayout,
    /// Verify structure invariants after every extraction
    pub check_invariants: bool,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            partial_parse: PartialParsePolicy::Tolerate,
            spec_layout: SpecLayout::Verbatim,
            check_invariants: true,
        }
    }
}

impl GateConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With partial parse policy
    #[inline]
    #[must_use]
    pub fn with_partial_parse(mut self, policy: PartialParsePolicy) -> Self {
        self.partial_parse = policy;
        self
    }

    /// With spec layout
    #[inline]
    #[must_use]
    pub fn with_spec_layout(mut self, layout: SpecLayout) -> Self {
        self.spec_layout = layout;
        self
    }

    /// With invariant checking on or off
    #[inline]
    #[must_use]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] for malformed input or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded gate config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = GateConfig::new();
        assert_eq!(config.partial_parse, PartialParsePolicy::Tolerate);
        assert_eq!(config.spec_layout, SpecLayout::Verbatim);
        assert!(config.check_invariants);
    }

    #[test]
    fn builder_methods() {
        let config = GateConfig::new()
            .with_partial_parse(PartialParsePolicy::Reject)
            .with_spec_layout(SpecLayout::Trimmed)
            .with_invariant_checks(false);
        assert_eq!(config.partial_parse, PartialParsePolicy::Reject);
        assert_eq!(config.spec_layout, SpecLayout::Trimmed);
        assert!(!config.check_invariants);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GateConfig::from_toml_str("spec_layout = \"trimmed\"\n").unwrap();
        assert_eq!(config.spec_layout, SpecLayout::Trimmed);
        assert_eq!(config.partial_parse, PartialParsePolicy::Tolerate);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = GateConfig::from_toml_str("strictness = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "partial_parse = \"reject\"").unwrap();

        let config = GateConfig::load(file.path()).unwrap();
        assert_eq!(config.partial_parse, PartialParsePolicy::Reject);
    }

    #[test]
    fn load_missing_file() {
        let err = GateConfig::load("/nonexistent/specgate.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
