use wgpu::{BindGroup, BindGroupLayout, Device, Sampler, Texture, TextureView};

use super::gpu_context::GpuContext;
use crate::error::{RendererError, Result};
use crate::traits::TextureBackend;

/// Texture format of the uploaded image
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A single RGBA texture with a linear sampler and the bind group exposing both
///
/// Binding 0 is the texture, binding 1 the sampler. The render pipeline
/// must be built with [`WgpuTexture::bind_group_layout`] at the unit index the
/// texture is bound to.
pub struct WgpuTexture {
    gpu: GpuContext,
    texture: Texture,
    view: TextureView,
    sampler: Sampler,
    bind_group_layout: BindGroupLayout,
    bind_group: BindGroup,
    width: u32,
    height: u32,
}

impl WgpuTexture {
    /// Allocate and configure the texture
    ///
    /// Fails with `InvalidDimensions` when the size exceeds the device limit and
    /// with `ResourceAllocation` when the device reports an error while the
    /// texture, sampler or bind group is being created.
    pub fn new(gpu: &GpuContext, width: u32, height: u32) -> Result<Self> {
        let max = gpu.device().limits().max_texture_dimension_2d;
        if width == 0 || height == 0 || width > max || height > max {
            return Err(RendererError::InvalidDimensions { width, height });
        }

        let (parts, error) = gpu.capture_errors(|device| {
            let texture = Self::create_texture(device, width, height);
            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
            let sampler = Self::create_sampler(device);
            let bind_group_layout = Self::create_bind_group_layout(device);
            let bind_group = Self::create_bind_group(device, &bind_group_layout, &view, &sampler);
            (texture, view, sampler, bind_group_layout, bind_group)
        });

        if let Some(error) = error {
            return Err(RendererError::ResourceAllocation(error.to_string()));
        }

        let (texture, view, sampler, bind_group_layout, bind_group) = parts;
        log::info!("Allocated {}x{} texture", width, height);

        Ok(Self {
            gpu: gpu.clone(),
            texture,
            view,
            sampler,
            bind_group_layout,
            bind_group,
            width,
            height,
        })
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn view(&self) -> &TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Layout the shader's texture group must be declared with
    pub fn bind_group_layout(&self) -> &BindGroupLayout {
        &self.bind_group_layout
    }

    /// Copy the texture contents back to the CPU as tightly packed RGBA rows
    ///
    /// Blocks until the GPU has finished all submitted work.
    pub fn read_back(&self) -> Result<Vec<u8>> {
        let unpadded = self.width * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded = unpadded.div_ceil(align) * align;

        let buffer = self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("Texture Readback Buffer"),
            size: padded as u64 * self.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Texture Readback Encoder"),
            });
        encoder.copy_texture_to_buffer(
            self.texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            self.extent(),
        );
        self.gpu.queue().submit(Some(encoder.finish()));

        let raw = self.gpu.read_buffer_sync(&buffer)?;
        let pixels = raw
            .chunks_exact(padded as usize)
            .flat_map(|row| &row[..unpadded as usize])
            .copied()
            .collect();
        Ok(pixels)
    }

    fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }

    fn create_texture(device: &Device, width: u32, height: u32) -> Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Image Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    fn create_sampler(device: &Device) -> Sampler {
        device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Image Texture Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        })
    }

    fn create_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Image Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    fn create_bind_group(
        device: &Device,
        layout: &BindGroupLayout,
        view: &TextureView,
        sampler: &Sampler,
    ) -> BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Image Texture Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }
}

impl TextureBackend for WgpuTexture {
    type Binding = BindGroup;

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn upload(&self, pixels: &[u8], width: u32, height: u32) {
        self.gpu.queue().write_texture(
            self.texture.as_image_copy(),
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn binding(&self) -> &BindGroup {
        &self.bind_group
    }
}
