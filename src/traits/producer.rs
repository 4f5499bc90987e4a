use crate::core::pixel_store::PixelFormat;

/// Source of pixel data driven by a producer thread
pub trait FrameProducer: Send {
    /// Layout of the bytes written by `produce`
    fn format(&self) -> PixelFormat;

    /// Fill `out` with the image for `frame`
    ///
    /// `out` holds exactly `pixel_count * format().bytes_per_pixel()` bytes.
    fn produce(&mut self, frame: u64, out: &mut [u8]);

    /// Name for logging
    fn name(&self) -> &str {
        "producer"
    }
}
