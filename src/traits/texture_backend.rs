/// GPU-side half of a texture: receives full-image uploads and hands out the
/// binding the render pass attaches to a texture unit.
///
/// Calls must come from the thread that owns the graphics context.
pub trait TextureBackend: Send + Sync {
    /// What a texture unit holds once the texture is bound (a bind group under wgpu)
    type Binding: Clone;

    /// Dimensions of the allocated texture
    fn dimensions(&self) -> (u32, u32);

    /// Replace the whole texture with tightly packed RGBA rows
    fn upload(&self, pixels: &[u8], width: u32, height: u32);

    /// Binding for this texture
    fn binding(&self) -> &Self::Binding;
}
