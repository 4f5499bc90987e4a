pub mod image_buffer;
pub mod producer;
pub mod texture_backend;

pub use image_buffer::*;
pub use producer::*;
pub use texture_backend::*;
