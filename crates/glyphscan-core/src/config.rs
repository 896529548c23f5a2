//! Configuration types for glyphscan.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{ElementKind, Error};

/// Detector configuration loaded from a YAML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Scanner settings
    pub scan: ScanSettings,
    /// Rendering settings
    pub render: RenderSettings,
    /// Extra multi-row templates added to the built-in table
    pub templates: Vec<TemplateConfig>,
    /// Extra single-line rules added to the built-in table
    pub patterns: Vec<PatternConfig>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            scan: ScanSettings::default(),
            render: RenderSettings::default(),
            templates: vec![],
            patterns: vec![],
            log_level: "info".to_string(),
        }
    }
}

impl DetectorConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: DetectorConfig =
            serde_yaml::from_str(yaml).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Extra templates and patterns are not checked here; a malformed one is
    /// rejected on its own when the template library is built.
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.scan.threshold > 0.0 && self.scan.threshold <= 1.0) {
            return Err(Error::Config("scan.threshold must be in (0, 1]".to_string()));
        }

        if self.scan.max_work == 0 {
            return Err(Error::Config("scan.max_work must be > 0".to_string()));
        }

        if self.render.bar_width == 0 {
            return Err(Error::Config("render.bar_width must be > 0".to_string()));
        }

        if self.render.percent_decimals > 1 {
            return Err(Error::Config(
                "render.percent_decimals must be 0 or 1".to_string(),
            ));
        }

        if self.log_level.trim().is_empty() {
            return Err(Error::Config("log_level cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Scanner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Minimum confidence for a multi-row window to be retained
    pub threshold: f64,
    /// Upper bound on cell comparisons per pass
    pub max_work: u64,
    /// Apply the border/keyword context multiplier
    pub context_bonus: bool,
    /// Glyph used to pad cells outside the grid
    pub blank_glyph: char,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            threshold: 0.7,
            max_work: 50_000_000,
            context_bonus: false,
            blank_glyph: ' ',
        }
    }
}

/// Rendering settings for replacement text and reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Cell width of a normalized progress bar
    pub bar_width: usize,
    /// Decimal places for report confidence percentages (0 or 1)
    pub percent_decimals: u8,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            bar_width: 10,
            percent_decimals: 0,
        }
    }
}

/// Extra multi-row template definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Element kind this template detects
    pub kind: ElementKind,
    /// Template rows (equal width)
    pub rows: Vec<String>,
    /// Base confidence weight in (0, 1]
    pub weight: f64,
}

/// Extra single-line rule definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Rule name (identifier)
    pub name: String,
    /// Element kind to generate
    pub kind: ElementKind,
    /// Regular expression pattern
    pub pattern: String,
    /// Fixed confidence for every match
    #[serde(default = "default_pattern_confidence")]
    pub confidence: f64,
    /// Fixed replacement text; the kind's default formatter when absent
    #[serde(default)]
    pub replacement: Option<String>,
}

fn default_pattern_confidence() -> f64 {
    0.9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DetectorConfig::default();
        assert_eq!(config.scan.threshold, 0.7);
        assert_eq!(config.scan.blank_glyph, ' ');
        assert!(!config.scan.context_bonus);
        assert_eq!(config.render.bar_width, 10);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_validation() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = DetectorConfig::default();
        config.scan.threshold = 0.0;
        assert!(config.validate().is_err());
        config.scan.threshold = 1.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_bar_width() {
        let mut config = DetectorConfig::default();
        config.render.bar_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_max_work() {
        let mut config = DetectorConfig::default();
        config.scan.max_work = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
scan:
  threshold: 0.8
  max_work: 1000000
  context_bonus: true
  blank_glyph: "░"

render:
  bar_width: 20
  percent_decimals: 1

log_level: debug
"#;

        let config = DetectorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.scan.threshold, 0.8);
        assert_eq!(config.scan.max_work, 1_000_000);
        assert!(config.scan.context_bonus);
        assert_eq!(config.scan.blank_glyph, '░');
        assert_eq!(config.render.bar_width, 20);
        assert_eq!(config.render.percent_decimals, 1);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_extra_templates_and_patterns() {
        let yaml = r######"
templates:
  - kind: arrow_down
    rows: ["  #  ", " ### ", "#####"]
    weight: 0.95
patterns:
  - name: "ok_button"
    kind: button
    pattern: "<OK>"
    replacement: "[OK]"
"######;

        let config = DetectorConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.templates.len(), 1);
        assert_eq!(config.templates[0].kind, ElementKind::ArrowDown);
        assert_eq!(config.templates[0].rows.len(), 3);
        assert_eq!(config.patterns.len(), 1);
        assert_eq!(config.patterns[0].confidence, 0.9);
        assert_eq!(config.patterns[0].replacement.as_deref(), Some("[OK]"));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let yaml = r###"
templates:
  - kind: slider
    rows: ["##"]
    weight: 0.9
"###;
        assert!(DetectorConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(DetectorConfig::from_yaml("scan: [").is_err());
    }
}
