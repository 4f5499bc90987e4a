use parking_lot::Mutex;

use crate::error::{RendererError, Result};
use crate::traits::ImageBuffer;

/// Bytes per stored RGBA pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Source layout accepted by the store's writers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 4 bytes per pixel, R G B A
    Rgba8,
    /// 1 luminance byte per pixel, replicated into all four channels
    Gray8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 => BYTES_PER_PIXEL,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// Whether the buffer holds writes that have not been uploaded yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirtyState {
    /// No writes since the last upload
    Clean,
    /// At least one write since the last upload (or never uploaded)
    Dirty,
}

struct Guarded {
    pixels: Box<[u8]>,
    dirty: DirtyState,
}

/// Fixed-size RGBA pixel buffer shared between a producer and the render loop
///
/// Every access to the bytes goes through one lock, so readers and the upload
/// path never see a mix of two writes. The buffer starts zeroed and `Dirty`.
pub struct PixelStore {
    width: u32,
    height: u32,
    byte_count: usize,
    state: Mutex<Guarded>,
}

impl PixelStore {
    /// Allocate a store for a `width` x `height` image
    ///
    /// A buffer the allocator cannot provide is reported as `ResourceAllocation`.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let byte_count = Self::byte_count_for(width, height)?;

        let mut pixels = Vec::new();
        pixels.try_reserve_exact(byte_count).map_err(|e| {
            RendererError::ResourceAllocation(format!(
                "{}x{} pixel buffer ({} bytes): {}",
                width, height, byte_count, e
            ))
        })?;
        pixels.resize(byte_count, 0);

        Ok(Self {
            width,
            height,
            byte_count,
            state: Mutex::new(Guarded {
                pixels: pixels.into_boxed_slice(),
                dirty: DirtyState::Dirty,
            }),
        })
    }

    /// RGBA byte count for the given dimensions, rejecting zero or overflowing sizes
    pub fn byte_count_for(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(RendererError::InvalidDimensions { width, height });
        }

        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or(RendererError::InvalidDimensions { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Total size in bytes of the RGBA buffer
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    pub fn pixel_count(&self) -> usize {
        self.byte_count / BYTES_PER_PIXEL
    }

    /// Replace the whole buffer with `source`, which must be exactly `byte_count` bytes
    pub fn write_rgba_image(&self, source: &[u8]) -> Result<()> {
        self.check_len(self.byte_count, source.len())?;

        let mut state = self.state.lock();
        state.pixels.copy_from_slice(source);
        state.dirty = DirtyState::Dirty;
        Ok(())
    }

    /// Replace the whole buffer from one luminance byte per pixel
    ///
    /// Each byte is copied into R, G, B and A alike, so alpha equals luminance.
    pub fn write_grayscale_image(&self, source: &[u8]) -> Result<()> {
        self.check_len(self.pixel_count(), source.len())?;

        let mut state = self.state.lock();
        for (pixel, &luma) in state.pixels.chunks_exact_mut(BYTES_PER_PIXEL).zip(source) {
            pixel.fill(luma);
        }
        state.dirty = DirtyState::Dirty;
        Ok(())
    }

    /// Copy the current image into `dest`, which must be exactly `byte_count` bytes
    pub fn read_image(&self, dest: &mut [u8]) -> Result<()> {
        self.check_len(self.byte_count, dest.len())?;

        let state = self.state.lock();
        dest.copy_from_slice(&state.pixels);
        Ok(())
    }

    /// Copy the current image into a freshly allocated vector
    pub fn snapshot(&self) -> Vec<u8> {
        self.state.lock().pixels.to_vec()
    }

    pub fn dirty_state(&self) -> DirtyState {
        self.state.lock().dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_state() == DirtyState::Dirty
    }

    /// Hand the guarded bytes to `consume` and mark the store clean afterwards
    ///
    /// `consume` sees the dirty state as of lock acquisition and runs entirely
    /// inside the critical section, so no writer can interleave with it.
    pub(crate) fn consume<R>(&self, consume: impl FnOnce(&[u8], DirtyState) -> R) -> R {
        let mut state = self.state.lock();
        let result = consume(&state.pixels, state.dirty);
        state.dirty = DirtyState::Clean;
        result
    }

    fn check_len(&self, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(RendererError::SizeMismatch { expected, actual })
        }
    }
}

impl std::fmt::Debug for PixelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelStore")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("byte_count", &self.byte_count)
            .finish_non_exhaustive()
    }
}

impl ImageBuffer for PixelStore {
    fn dimensions(&self) -> (u32, u32) {
        PixelStore::dimensions(self)
    }

    fn byte_count(&self) -> usize {
        self.byte_count
    }

    fn write_rgba_image(&self, source: &[u8]) -> Result<()> {
        PixelStore::write_rgba_image(self, source)
    }

    fn write_grayscale_image(&self, source: &[u8]) -> Result<()> {
        PixelStore::write_grayscale_image(self, source)
    }

    fn read_image(&self, dest: &mut [u8]) -> Result<()> {
        PixelStore::read_image(self, dest)
    }

    fn dirty_state(&self) -> DirtyState {
        PixelStore::dirty_state(self)
    }
}
