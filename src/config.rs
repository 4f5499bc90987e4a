use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::gpu_texture::UploadPolicy;
use crate::core::texture_units::TextureUnit;
use crate::error::{RendererError, Result};
use crate::producer::Pattern;

/// Highest texture unit the display pipeline accepts (wgpu's default bind-group limit is 4)
pub const MAX_TEXTURE_UNIT: u32 = 3;

/// Runtime settings for the renderer binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Image and initial window width in pixels
    pub width: u32,
    /// Image and initial window height in pixels
    pub height: u32,
    pub pattern: Pattern,
    pub upload_policy: UploadPolicy,
    /// Frames per second written by the producer thread
    pub producer_hz: f32,
    /// Bind-group index the texture is sampled through
    pub texture_unit: u32,
    pub title: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            pattern: Pattern::default(),
            upload_policy: UploadPolicy::default(),
            producer_hz: 60.0,
            texture_unit: 0,
            title: "Image Renderer".to_string(),
        }
    }
}

impl RendererConfig {
    /// Load a JSON config file; missing keys take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn unit(&self) -> TextureUnit {
        TextureUnit(self.texture_unit)
    }

    /// Reject values the renderer cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RendererError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.producer_hz > 0.0 && self.producer_hz.is_finite()) {
            return Err(RendererError::Config(format!(
                "producer_hz must be positive, got {}",
                self.producer_hz
            )));
        }
        if self.texture_unit > MAX_TEXTURE_UNIT {
            return Err(RendererError::Config(format!(
                "texture_unit must be at most {}, got {}",
                MAX_TEXTURE_UNIT, self.texture_unit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_1000_by_800_window() {
        let config = RendererConfig::default();
        assert_eq!((config.width, config.height), (1000, 800));
        assert_eq!(config.upload_policy, UploadPolicy::Always);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = RendererConfig::from_json(
            r#"{ "width": 320, "pattern": "diffusion", "upload_policy": "on-change" }"#,
        )
        .unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 800);
        assert_eq!(config.pattern, Pattern::Diffusion);
        assert_eq!(config.upload_policy, UploadPolicy::OnChange);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = RendererConfig::from_json(r#"{ "widht": 10 }"#);
        assert!(matches!(result, Err(RendererError::Json(_))));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let zero = RendererConfig { width: 0, ..Default::default() };
        assert!(matches!(zero.validate(), Err(RendererError::InvalidDimensions { .. })));

        let stalled = RendererConfig { producer_hz: 0.0, ..Default::default() };
        assert!(matches!(stalled.validate(), Err(RendererError::Config(_))));

        let unit = RendererConfig { texture_unit: MAX_TEXTURE_UNIT + 1, ..Default::default() };
        assert!(unit.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = RendererConfig::from_json_file("/nonexistent/renderer.json");
        assert!(matches!(result, Err(RendererError::Io(_))));
    }
}
