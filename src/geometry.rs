/// Vertex of the display quad: clip-space position and texture coordinates
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    const fn new(position: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self { position, tex_coords }
    }

    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    /// Vertex buffer layout matching `image.wgsl`
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

const BOTTOM_LEFT: Vertex = Vertex::new([-1.0, -1.0, 0.0], [0.0, 0.0]);
const TOP_LEFT: Vertex = Vertex::new([-1.0, 1.0, 0.0], [0.0, 1.0]);
const BOTTOM_RIGHT: Vertex = Vertex::new([1.0, -1.0, 0.0], [1.0, 0.0]);
const TOP_RIGHT: Vertex = Vertex::new([1.0, 1.0, 0.0], [1.0, 1.0]);

/// Two triangles covering clip space; texture row 0 lands at the bottom edge
pub const QUAD_VERTICES: [Vertex; 6] = [
    BOTTOM_LEFT,
    TOP_LEFT,
    BOTTOM_RIGHT,
    TOP_LEFT,
    BOTTOM_RIGHT,
    TOP_RIGHT,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        assert_eq!(Vertex::layout().array_stride, 20);
        assert_eq!(Vertex::layout().attributes[1].offset, 12);
    }

    #[test]
    fn quad_covers_clip_space() {
        for v in QUAD_VERTICES {
            assert_eq!(v.position[0].abs(), 1.0);
            assert_eq!(v.position[1].abs(), 1.0);
            // texture coordinates follow position linearly
            assert_eq!(v.tex_coords[0], (v.position[0] + 1.0) / 2.0);
            assert_eq!(v.tex_coords[1], (v.position[1] + 1.0) / 2.0);
        }
    }

    #[test]
    fn quad_bytes_cast() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 6 * 20);
    }
}
