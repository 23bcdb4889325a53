//! Conversion defaults loaded from TOML.

use std::fmt;

use serde::Deserialize;

use super::collapse::DEFAULT_COLLAPSE_DEPTH;
use super::error::Error;

const DEFAULT_CONFIG_TOML: &str = include_str!("../../resources/default.config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConvertConfig {
    /// Chain code given to residues read from files without chains.
    #[serde(default = "default_chain_code")]
    pub default_chain_code: String,
    /// Trailing characters examined when collapsing atom names.
    #[serde(default = "default_collapse_depth")]
    pub collapse_depth: usize,
    #[serde(default)]
    pub spectrum: SpectrumConfig,
}

fn default_chain_code() -> String {
    "A".to_string()
}
fn default_collapse_depth() -> usize {
    DEFAULT_COLLAPSE_DEPTH
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            default_chain_code: default_chain_code(),
            collapse_depth: default_collapse_depth(),
            spectrum: SpectrumConfig::default(),
        }
    }
}

/// Settings for the synthesized spectral windows of exported spectra.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpectrumConfig {
    /// Factor applied to the observed shift range to get the sweep width.
    #[serde(default = "default_margin")]
    pub margin: f64,
    /// Proton frequency in MHz used when a spectrum does not record one.
    #[serde(default = "default_proton_frequency")]
    pub proton_frequency: f64,
    #[serde(default)]
    pub folding: Folding,
}

fn default_margin() -> f64 {
    1.1
}
fn default_proton_frequency() -> f64 {
    600.0
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            margin: default_margin(),
            proton_frequency: default_proton_frequency(),
            folding: Folding::default(),
        }
    }
}

/// NEF folding mode of a spectral dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folding {
    None,
    #[default]
    Circular,
    Mirror,
}

impl Folding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Folding::None => "none",
            Folding::Circular => "circular",
            Folding::Mirror => "mirror",
        }
    }
}

impl fmt::Display for Folding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a user TOML overlay, or the embedded defaults when none is given.
pub fn load_config(custom_toml: Option<&str>) -> Result<ConvertConfig, Error> {
    let config: ConvertConfig = toml::from_str(custom_toml.unwrap_or(DEFAULT_CONFIG_TOML))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_default_impl() {
        assert_eq!(load_config(None).unwrap(), ConvertConfig::default());
    }

    #[test]
    fn overlay_keeps_missing_fields_at_defaults() {
        let config = load_config(Some("[spectrum]\nfolding = \"mirror\"\n")).unwrap();
        assert_eq!(config.spectrum.folding, Folding::Mirror);
        assert_eq!(config.spectrum.margin, 1.1);
        assert_eq!(config.default_chain_code, "A");
        assert_eq!(config.collapse_depth, 2);
    }

    #[test]
    fn empty_overlay_is_all_defaults() {
        assert_eq!(load_config(Some("")).unwrap(), ConvertConfig::default());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = load_config(Some("collapse_depth = \"two\"")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
