use std::sync::Arc;
use wgpu::{Adapter, Buffer, Device, DeviceDescriptor, Features, Instance, Limits, Queue, Surface};
use winit::window::Window;

use crate::error::{RendererError, Result};

/// Shared GPU context for the texture and the render loop
///
/// Device and queue sit behind `Arc`s so the context can be cloned cheaply
/// into every component that records GPU work.
#[derive(Clone)]
pub struct GpuContext {
    instance: Arc<Instance>,
    adapter: Arc<Adapter>,
    device: Arc<Device>,
    queue: Arc<Queue>,
}

impl GpuContext {
    /// Create a GPU context without a surface (offscreen work and tests)
    pub fn new() -> Result<Self> {
        let instance = Self::create_instance();
        let adapter = pollster::block_on(Self::request_adapter(&instance, None))?;
        Self::finish(instance, adapter)
    }

    /// Create a GPU context together with a surface for `window`
    ///
    /// The adapter is chosen for compatibility with that surface.
    pub fn for_window(window: Arc<Window>) -> Result<(Self, Surface<'static>)> {
        let instance = Self::create_instance();
        let surface = instance
            .create_surface(window)
            .map_err(|e| RendererError::Surface(e.to_string()))?;

        let adapter = pollster::block_on(Self::request_adapter(&instance, Some(&surface)))?;
        let gpu = Self::finish(instance, adapter)?;
        Ok((gpu, surface))
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }

    /// Get reference to the device
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Get reference to the queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Run `f` inside out-of-memory and validation error scopes
    ///
    /// Resource creation in wgpu reports failures asynchronously; this turns
    /// them back into a value the caller can inspect before using the resource.
    pub fn capture_errors<T>(&self, f: impl FnOnce(&Device) -> T) -> (T, Option<wgpu::Error>) {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let value = f(&self.device);

        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        (value, validation.or(out_of_memory))
    }

    /// Synchronously read back a mappable buffer
    ///
    /// WARNING: This blocks the current thread until the device is idle.
    pub fn read_buffer_sync(&self, buffer: &Buffer) -> Result<Vec<u8>> {
        let buffer_slice = buffer.slice(..);

        let (sender, receiver) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            sender.send(result).ok();
        });

        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .map_err(|e| RendererError::Readback(format!("device poll failed: {:?}", e)))?;

        match receiver.recv() {
            Ok(Ok(())) => {
                let data = buffer_slice.get_mapped_range();
                let result = data.to_vec();
                drop(data);
                buffer.unmap();
                Ok(result)
            }
            Ok(Err(e)) => Err(RendererError::Readback(format!("buffer mapping failed: {:?}", e))),
            Err(_) => Err(RendererError::Readback(
                "channel closed before receiving result".into(),
            )),
        }
    }

    fn create_instance() -> Instance {
        Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        })
    }

    fn finish(instance: Instance, adapter: Adapter) -> Result<Self> {
        let info = adapter.get_info();
        log::info!("Using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = pollster::block_on(Self::request_device(&adapter))?;

        Ok(Self {
            instance: Arc::new(instance),
            adapter: Arc::new(adapter),
            device: Arc::new(device),
            queue: Arc::new(queue),
        })
    }

    async fn request_adapter(instance: &Instance, surface: Option<&Surface<'_>>) -> Result<Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: surface,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RendererError::GpuInit(format!("failed to find appropriate adapter: {:?}", e)))
    }

    async fn request_device(adapter: &Adapter) -> Result<(Device, Queue)> {
        let limits = Limits {
            max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
            ..Limits::downlevel_defaults()
        };

        adapter
            .request_device(&DeviceDescriptor {
                label: Some("Image Renderer Device"),
                required_features: Features::empty(),
                required_limits: limits,
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| RendererError::GpuInit(format!("failed to create device: {:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_cheap_to_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<GpuContext>();
    }

    #[test]
    fn context_can_cross_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GpuContext>();
    }
}
