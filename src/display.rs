use std::sync::Arc;

use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, Device, RenderPipeline, Surface, SurfaceConfiguration};

use crate::core::{GpuContext, GpuTexture, TextureUnit, TextureUnits, UploadOutcome};
use crate::error::{RendererError, Result};
use crate::geometry::{Vertex, QUAD_VERTICES};

const SHADER_TEMPLATE: &str = include_str!("image.wgsl");

/// Draws the shared texture onto a window surface once per frame
///
/// Owns the surface, the full-screen quad and the pipeline whose shader samples
/// the texture at the configured unit.
pub struct ImageDisplay {
    gpu: GpuContext,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    render_pipeline: RenderPipeline,
    vertex_buffer: Buffer,
    texture: Arc<GpuTexture>,
    unit: TextureUnit,
    units: TextureUnits<BindGroup>,
}

impl ImageDisplay {
    /// Configure `surface` at `width` x `height` and build the pipeline for `texture`
    pub fn new(
        gpu: GpuContext,
        surface: Surface<'static>,
        width: u32,
        height: u32,
        texture: Arc<GpuTexture>,
        unit: TextureUnit,
    ) -> Result<Self> {
        let surface_caps = surface.get_capabilities(gpu.adapter());
        let surface_format = Self::pick_surface_format(&surface_caps.formats)
            .ok_or_else(|| RendererError::Surface("surface reports no supported formats".into()))?;

        let surface_config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(gpu.device(), &surface_config);

        let vertex_buffer = gpu
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Vertex Buffer"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let mut units = TextureUnits::new();
        let render_pipeline =
            Self::create_render_pipeline(gpu.device(), &texture, unit, surface_format, &mut units);

        Ok(Self {
            gpu,
            surface,
            surface_config,
            render_pipeline,
            vertex_buffer,
            texture,
            unit,
            units,
        })
    }

    /// Upload the latest image, draw it and present
    pub fn render_frame(&mut self) -> Result<UploadOutcome> {
        let outcome = self.texture.update_and_bind(self.unit, &mut self.units)?;

        let surface_texture = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                self.surface.configure(self.gpu.device(), &self.surface_config);
                return Ok(outcome);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring surface texture, skipping frame");
                return Ok(outcome);
            }
            Err(e) => return Err(RendererError::Surface(e.to_string())),
        };

        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Image Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Image Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.render_pipeline);
            self.units.apply(&mut render_pass);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.draw(0..QUAD_VERTICES.len() as u32, 0..1);
        }

        self.gpu.queue().submit(Some(encoder.finish()));
        surface_texture.present();

        Ok(outcome)
    }

    /// Resize the surface; the image keeps its fixed size and is stretched
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(self.gpu.device(), &self.surface_config);
    }

    /// Current surface dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    /// Prefer a non-sRGB format so texel bytes reach the screen unchanged
    ///
    /// The image texture is `Rgba8Unorm`, so an sRGB target would re-encode sampled values.
    pub fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
        formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| formats.first())
            .copied()
    }

    /// Shader source with the texture group set to `unit`
    pub fn shader_source(unit: TextureUnit) -> String {
        SHADER_TEMPLATE.replace("{{TEXTURE_UNIT}}", &unit.0.to_string())
    }

    /// Build the pipeline; units below `unit` get empty bind groups so the layout is complete
    fn create_render_pipeline(
        device: &Device,
        texture: &GpuTexture,
        unit: TextureUnit,
        surface_format: wgpu::TextureFormat,
        units: &mut TextureUnits<BindGroup>,
    ) -> RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Image Display Shader"),
            source: wgpu::ShaderSource::Wgsl(Self::shader_source(unit).into()),
        });

        let empty_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Empty Bind Group Layout"),
            entries: &[],
        });
        let empty_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Empty Bind Group"),
            layout: &empty_layout,
            entries: &[],
        });

        let mut bind_group_layouts = Vec::with_capacity(unit.0 as usize + 1);
        for index in 0..unit.0 {
            bind_group_layouts.push(&empty_layout);
            units.bind(TextureUnit(index), empty_group.clone());
        }
        bind_group_layouts.push(texture.backend().bind_group_layout());

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Image Render Pipeline Layout"),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Image Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
