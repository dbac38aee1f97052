use crate::hit_test::DROP_TOLERANCE;
use crate::viewport::ZoomLimits;
use org_graph::{SeedConfig, DEFAULT_COMPANY_LABEL};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value the editor cannot work with.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("zoom range {min}..{max} must be positive with min <= max")]
    ZoomRange { min: f32, max: f32 },
    #[error("zoom step {0} must be positive")]
    ZoomStep(f32),
    #[error("drop tolerance {0} must be zero or more")]
    DropTolerance(f32),
}

/// Tunables for one editor instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Label of the company root node.
    pub company_label: String,
    pub zoom: ZoomLimits,
    /// Slack around group circles when resolving drops and group clicks.
    pub drop_tolerance: f32,
    pub seed: SeedConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            company_label: DEFAULT_COMPANY_LABEL.to_string(),
            zoom: ZoomLimits::default(),
            drop_tolerance: DROP_TOLERANCE,
            seed: SeedConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Check values that would otherwise be silently replaced or misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zoom.validate()?;
        if !(self.drop_tolerance.is_finite() && self.drop_tolerance >= 0.0) {
            return Err(ConfigError::DropTolerance(self.drop_tolerance));
        }
        Ok(())
    }

    pub fn with_company_label(mut self, label: impl Into<String>) -> Self {
        self.company_label = label.into();
        self
    }

    pub fn with_drop_tolerance(mut self, tolerance: f32) -> Self {
        self.drop_tolerance = tolerance;
        self
    }

    pub fn with_seed(mut self, seed: SeedConfig) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{"company_label": "Acme", "zoom": {"max": 3.0}}"#).unwrap();
        assert_eq!(config.company_label, "Acme");
        assert_eq!(config.zoom.max, 3.0);
        assert_eq!(config.zoom.min, ZoomLimits::default().min);
        assert_eq!(config.drop_tolerance, DROP_TOLERANCE);
        assert_eq!(config.seed, SeedConfig::default());
    }

    #[test]
    fn test_validate_rejects_inverted_zoom_and_negative_tolerance() {
        assert_eq!(EditorConfig::default().validate(), Ok(()));

        let config: EditorConfig = serde_json::from_str(r#"{"zoom": {"min": 3.0}}"#).unwrap();
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZoomRange { min: 3.0, max: 2.0 })
        );

        let config = EditorConfig::default().with_drop_tolerance(-1.0);
        assert_eq!(config.validate(), Err(ConfigError::DropTolerance(-1.0)));
    }

    #[test]
    fn test_builders() {
        let config = EditorConfig::default()
            .with_company_label("Fleet")
            .with_drop_tolerance(12.0)
            .with_seed(SeedConfig::default().with_region_spacing(300.0));
        assert_eq!(config.company_label, "Fleet");
        assert_eq!(config.drop_tolerance, 12.0);
        assert_eq!(config.seed.region_spacing, 300.0);
    }
}
