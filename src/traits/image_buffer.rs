use crate::core::pixel_store::{DirtyState, PixelFormat, BYTES_PER_PIXEL};
use crate::error::Result;

/// Producer-facing view of a shared pixel buffer
///
/// Implementors guard every byte access with a single lock, so callers on any
/// thread may write while the render loop uploads.
pub trait ImageBuffer: Send + Sync {
    /// Image dimensions in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Size of the RGBA buffer in bytes
    fn byte_count(&self) -> usize;

    /// Replace the image from `byte_count` bytes of RGBA data
    fn write_rgba_image(&self, source: &[u8]) -> Result<()>;

    /// Replace the image from one luminance byte per pixel
    fn write_grayscale_image(&self, source: &[u8]) -> Result<()>;

    /// Copy the current RGBA image into `dest`
    fn read_image(&self, dest: &mut [u8]) -> Result<()>;

    /// Whether there are writes the GPU has not seen yet
    fn dirty_state(&self) -> DirtyState;

    /// Write `source` in the given layout
    fn write_image(&self, format: PixelFormat, source: &[u8]) -> Result<()> {
        match format {
            PixelFormat::Rgba8 => self.write_rgba_image(source),
            PixelFormat::Gray8 => self.write_grayscale_image(source),
        }
    }

    /// Number of pixels in the image
    fn pixel_count(&self) -> usize {
        self.byte_count() / BYTES_PER_PIXEL
    }
}
