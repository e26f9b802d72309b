//! Sample configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! Unknown keys are rejected to catch typos.

use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Edge length of the interop cubemap and default viewport.
pub const DEFAULT_TEXTURE_SIZE: u32 = 1024;

/// Settings shared by the renderers and the face image writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleConfig {
    /// Edge length in pixels of each face of the layered cubemap.
    pub cubemap_size: u32,
    /// Viewport used by the quad renderer until the first resize.
    pub viewport: [u32; 2],
    /// File name prefix for extracted face images.
    pub output_prefix: String,
    /// Clear color for the quad renderer, RGBA in [0, 1].
    pub clear_color: [f32; 4],
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            cubemap_size: DEFAULT_TEXTURE_SIZE,
            viewport: [DEFAULT_TEXTURE_SIZE, DEFAULT_TEXTURE_SIZE],
            output_prefix: "cubemap".to_string(),
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl SampleConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RenderError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks sizes are non-zero, the prefix is a plain file name stem, and
    /// clear color channels lie in [0, 1].
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.cubemap_size == 0 || self.viewport.contains(&0) {
            return Err(RenderError::InvalidDimensions);
        }
        if self.output_prefix.is_empty()
            || self
                .output_prefix
                .contains(|c: char| c == '/' || c == '\\' || c.is_control())
        {
            return Err(RenderError::InvalidConfig(format!(
                "output_prefix must be a non-empty file name stem, got {:?}",
                self.output_prefix
            )));
        }
        if self
            .clear_color
            .iter()
            .any(|c| !(0.0..=1.0).contains(c))
        {
            return Err(RenderError::InvalidConfig(format!(
                "clear_color channels must be in [0, 1], got {:?}",
                self.clear_color
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = SampleConfig::from_json("{}").unwrap();
        assert_eq!(config, SampleConfig::default());
        assert_eq!(config.cubemap_size, 1024);
        assert_eq!(config.viewport, [1024, 1024]);
        assert_eq!(config.output_prefix, "cubemap");
    }

    #[test]
    fn partial_object_overrides_only_given_fields() {
        let config = SampleConfig::from_json(r#"{"cubemap_size": 256}"#).unwrap();
        assert_eq!(config.cubemap_size, 256);
        assert_eq!(config.viewport, [1024, 1024]);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = SampleConfig::from_json(r#"{"cubemap_sise": 256}"#).unwrap_err();
        assert!(matches!(err, RenderError::InvalidConfig(_)), "got {err:?}");
        assert!(err.to_string().contains("cubemap_sise"), "got: {err}");
    }

    #[test]
    fn zero_size_is_rejected() {
        let err = SampleConfig::from_json(r#"{"viewport": [0, 10]}"#).unwrap_err();
        assert!(matches!(err, RenderError::InvalidDimensions));
    }

    #[test]
    fn prefix_with_path_separator_is_rejected() {
        let config = SampleConfig {
            output_prefix: "../faces".into(),
            ..SampleConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RenderError::InvalidConfig(_))
        ));
    }

    #[test]
    fn out_of_range_clear_color_is_rejected() {
        let config = SampleConfig {
            clear_color: [0.0, 1.5, 0.0, 1.0],
            ..SampleConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("clear_color"), "got: {err}");
    }

    #[test]
    fn serializes_back_to_equal_config() {
        let config = SampleConfig {
            cubemap_size: 64,
            ..SampleConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SampleConfig::from_json(&json).unwrap(), config);
    }
}
