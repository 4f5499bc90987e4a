// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

use crate::config::RendererConfig;
use crate::core::gpu_texture::UploadPolicy;
use crate::error::Result;
use crate::producer::Pattern;

#[derive(Parser, Debug, Clone)]
#[command(name = "image-renderer")]
#[command(about = "Displays a continuously produced pixel buffer through a GPU texture", long_about = None)]
pub struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Pixel source
    #[arg(long, value_enum)]
    pub pattern: Option<Pattern>,

    /// When to re-upload the image to the GPU
    #[arg(long = "upload-policy", value_enum)]
    pub upload_policy: Option<UploadPolicy>,

    /// Producer frames per second
    #[arg(long = "producer-hz")]
    pub producer_hz: Option<f32>,

    /// Texture unit (bind-group index) the image is sampled through
    #[arg(long = "texture-unit")]
    pub texture_unit: Option<u32>,
}

impl Cli {
    /// Resolve the final config: defaults, then the config file, then flags
    pub fn into_config(self) -> Result<RendererConfig> {
        let mut config = match &self.config {
            Some(path) => RendererConfig::from_json_file(path)?,
            None => RendererConfig::default(),
        };

        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(pattern) = self.pattern {
            config.pattern = pattern;
        }
        if let Some(policy) = self.upload_policy {
            config.upload_policy = policy;
        }
        if let Some(hz) = self.producer_hz {
            config.producer_hz = hz;
        }
        if let Some(unit) = self.texture_unit {
            config.texture_unit = unit;
        }

        config.validate()?;
        Ok(config)
    }
}
