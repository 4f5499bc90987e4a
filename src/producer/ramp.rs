use crate::core::pixel_store::PixelFormat;
use crate::traits::FrameProducer;

/// RGBA test pattern: byte `i` of frame `f` is `(i + f) mod 256`
#[derive(Debug, Clone, Default)]
pub struct ScrollingRamp;

impl ScrollingRamp {
    pub fn new() -> Self {
        Self
    }
}

impl FrameProducer for ScrollingRamp {
    fn format(&self) -> PixelFormat {
        PixelFormat::Rgba8
    }

    fn produce(&mut self, frame: u64, out: &mut [u8]) {
        let offset = (frame % 256) as usize;
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = ((i + offset) % 256) as u8;
        }
    }

    fn name(&self) -> &str {
        "ramp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_wraps_at_256() {
        let mut ramp = ScrollingRamp::new();
        let mut out = vec![0u8; 300];
        ramp.produce(0, &mut out);
        assert_eq!(out[0], 0);
        assert_eq!(out[255], 255);
        assert_eq!(out[256], 0);
    }

    #[test]
    fn ramp_shifts_with_frame() {
        let mut ramp = ScrollingRamp::new();
        let mut out = vec![0u8; 8];
        ramp.produce(3, &mut out);
        assert_eq!(out, vec![3, 4, 5, 6, 7, 8, 9, 10]);

        ramp.produce(259, &mut out);
        assert_eq!(out[0], 3);
    }
}
