use crate::core::pixel_store::PixelFormat;
use crate::traits::FrameProducer;

/// Explicit-step coefficient; must stay below 0.25 for the 5-point stencil to be stable
const DIFFUSION_RATE: f32 = 0.2;
/// Fraction of heat kept per step
const COOLING: f32 = 0.995;
/// Solver steps per produced frame
const STEPS_PER_FRAME: usize = 4;

/// Grayscale heat diffusion on a grid the size of the image
///
/// A hot disk orbits the centre and the field spreads out with insulated
/// edges. Temperatures in `[0, 1]` map linearly to luminance.
#[derive(Debug, Clone)]
pub struct HeatDiffusion {
    width: usize,
    height: usize,
    field: Vec<f32>,
    scratch: Vec<f32>,
    source_radius: f32,
}

impl HeatDiffusion {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        let cells = width * height;

        Self {
            width,
            height,
            field: vec![0.0; cells],
            scratch: vec![0.0; cells],
            source_radius: (width.min(height) as f32 / 16.0).max(1.0),
        }
    }

    /// Temperature at a cell
    pub fn temperature(&self, x: usize, y: usize) -> f32 {
        self.field[y * self.width + x]
    }

    /// Total heat in the field
    pub fn total_heat(&self) -> f32 {
        self.field.iter().sum()
    }

    /// Set every cell inside the source disk for `frame` to full temperature
    pub fn heat_source(&mut self, frame: u64) {
        let angle = frame as f32 * 0.02;
        let cx = self.width as f32 * (0.5 + 0.3 * angle.cos());
        let cy = self.height as f32 * (0.5 + 0.3 * angle.sin());
        let r = self.source_radius;

        let x0 = (cx - r).floor().max(0.0) as usize;
        let y0 = (cy - r).floor().max(0.0) as usize;
        let x1 = ((cx + r).ceil() as usize).min(self.width - 1);
        let y1 = ((cy + r).ceil() as usize).min(self.height - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let (dx, dy) = (x as f32 - cx, y as f32 - cy);
                if dx * dx + dy * dy <= r * r {
                    self.field[y * self.width + x] = 1.0;
                }
            }
        }
    }

    /// Advance the field by one explicit diffusion step
    pub fn step(&mut self) {
        let (w, h) = (self.width, self.height);

        for y in 0..h {
            for x in 0..w {
                let idx = y * w + x;
                let center = self.field[idx];
                // Insulated edges: out-of-range neighbours mirror the centre
                let left = if x > 0 { self.field[idx - 1] } else { center };
                let right = if x + 1 < w { self.field[idx + 1] } else { center };
                let up = if y > 0 { self.field[idx - w] } else { center };
                let down = if y + 1 < h { self.field[idx + w] } else { center };

                let laplacian = left + right + up + down - 4.0 * center;
                self.scratch[idx] = (center + DIFFUSION_RATE * laplacian) * COOLING;
            }
        }

        std::mem::swap(&mut self.field, &mut self.scratch);
    }
}

impl FrameProducer for HeatDiffusion {
    fn format(&self) -> PixelFormat {
        PixelFormat::Gray8
    }

    fn produce(&mut self, frame: u64, out: &mut [u8]) {
        self.heat_source(frame);
        for _ in 0..STEPS_PER_FRAME {
            self.step();
        }

        for (luma, &t) in out.iter_mut().zip(&self.field) {
            *luma = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
    }

    fn name(&self) -> &str {
        "diffusion"
    }
}
