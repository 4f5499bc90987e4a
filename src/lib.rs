pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod display;
pub mod error;
pub mod geometry;
pub mod producer;
pub mod traits;

pub use crate::core::{
    DirtyState, GpuContext, GpuTexture, PixelFormat, PixelStore, RenderContext, SharedBuffer,
    TextureUnit, TextureUnits, UploadOutcome, UploadPolicy,
};
pub use error::{RendererError, Result};
pub use traits::{FrameProducer, ImageBuffer, TextureBackend};
