pub mod diffusion;
pub mod ramp;
pub mod worker;

pub use diffusion::HeatDiffusion;
pub use ramp::ScrollingRamp;
pub use worker::ProducerThread;

use serde::{Deserialize, Serialize};

use crate::traits::FrameProducer;

/// Built-in pixel sources selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    /// RGBA bytes cycling with the frame number
    #[default]
    Ramp,
    /// Grayscale heat diffusion around a moving source
    Diffusion,
}

impl Pattern {
    /// Build the producer for an image of the given size
    pub fn build(self, width: u32, height: u32) -> Box<dyn FrameProducer> {
        match self {
            Pattern::Ramp => Box::new(ScrollingRamp::new()),
            Pattern::Diffusion => Box::new(HeatDiffusion::new(width, height)),
        }
    }
}
