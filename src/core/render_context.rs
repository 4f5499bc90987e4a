use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::gpu_context::GpuContext;
use super::gpu_texture::{GpuTexture, UploadPolicy};
use super::wgpu_texture::WgpuTexture;
use crate::error::Result;
use crate::traits::{ImageBuffer, TextureBackend};

/// Producer-side handle to the shared image
pub type SharedBuffer = Arc<dyn ImageBuffer>;

/// Everything the producer and the render loop share, built once at startup
///
/// Holders obtain the texture through [`RenderContext::fetch_buffer`] or
/// [`RenderContext::texture`]; the texture is freed when the last clone of
/// either handle is dropped.
pub struct RenderContext<B: TextureBackend + 'static = WgpuTexture> {
    texture: Arc<GpuTexture<B>>,
    frames: AtomicU64,
}

impl RenderContext<WgpuTexture> {
    /// Allocate the shared texture for a `width` x `height` image
    ///
    /// Must run on the render thread; that thread becomes the only one allowed
    /// to upload.
    pub fn setup(gpu: &GpuContext, width: u32, height: u32, policy: UploadPolicy) -> Result<Self> {
        let texture = GpuTexture::new(gpu, width, height, policy)?;
        Ok(Self::from_texture(texture))
    }
}

impl<B: TextureBackend + 'static> RenderContext<B> {
    pub fn from_texture(texture: GpuTexture<B>) -> Self {
        Self {
            texture: Arc::new(texture),
            frames: AtomicU64::new(0),
        }
    }

    /// Shared handle for producers
    pub fn fetch_buffer(&self) -> SharedBuffer {
        self.texture.clone()
    }

    /// Shared handle for the render loop
    pub fn texture(&self) -> Arc<GpuTexture<B>> {
        self.texture.clone()
    }

    /// Record a rendered frame and return its number (starting at 0)
    pub fn advance_frame(&self) -> u64 {
        self.frames.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of frames rendered so far
    pub fn frame_count(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }
}
