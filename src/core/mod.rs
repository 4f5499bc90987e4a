pub mod frame_stats;
pub mod gpu_context;
pub mod gpu_texture;
pub mod pixel_store;
pub mod render_context;
pub mod texture_units;
pub mod wgpu_texture;

pub use frame_stats::FrameStats;
pub use gpu_context::GpuContext;
pub use gpu_texture::{GpuTexture, UploadOutcome, UploadPolicy};
pub use pixel_store::{DirtyState, PixelFormat, PixelStore, BYTES_PER_PIXEL};
pub use render_context::{RenderContext, SharedBuffer};
pub use texture_units::{TextureUnit, TextureUnits};
pub use wgpu_texture::{WgpuTexture, TEXTURE_FORMAT};
