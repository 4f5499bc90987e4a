use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::config::RendererConfig;
use crate::core::{FrameStats, GpuContext, RenderContext, UploadOutcome};
use crate::display::ImageDisplay;
use crate::error::{RendererError, Result};
use crate::producer::ProducerThread;

/// Render-loop driver: owns the window, the GPU context and the producer thread
pub struct App {
    config: RendererConfig,
    window: Option<Arc<Window>>,
    context: Option<RenderContext>,
    display: Option<ImageDisplay>,
    producer: Option<ProducerThread>,
    stats: FrameStats,
    failure: Option<RendererError>,
}

impl App {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            window: None,
            context: None,
            display: None,
            producer: None,
            stats: FrameStats::default(),
            failure: None,
        }
    }

    /// Error that stopped the event loop, if any
    pub fn take_failure(&mut self) -> Option<RendererError> {
        self.failure.take()
    }

    /// Shared render context once the window exists
    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let config = &self.config;
        let window = event_loop
            .create_window(
                Window::default_attributes()
                    .with_title(config.title.clone())
                    .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height)),
            )
            .map(Arc::new)
            .map_err(|e| RendererError::Surface(format!("failed to create window: {}", e)))?;

        let (gpu, surface) = GpuContext::for_window(window.clone())?;

        // This thread owns the graphics context from here on
        let context = RenderContext::setup(&gpu, config.width, config.height, config.upload_policy)?;

        let size = window.inner_size();
        let display = ImageDisplay::new(
            gpu,
            surface,
            size.width,
            size.height,
            context.texture(),
            config.unit(),
        )?;

        let producer = ProducerThread::spawn(
            context.fetch_buffer(),
            config.pattern.build(config.width, config.height),
            config.producer_hz,
        )?;

        log::info!(
            "Displaying {}x{} {:?} image on texture unit {} ({:?} uploads)",
            config.width,
            config.height,
            config.pattern,
            config.texture_unit,
            config.upload_policy
        );

        self.window = Some(window);
        self.context = Some(context);
        self.display = Some(display);
        self.producer = Some(producer);
        Ok(())
    }

    fn redraw(&mut self) -> Result<()> {
        let (Some(display), Some(context)) = (&mut self.display, &self.context) else {
            return Ok(());
        };

        let outcome = display.render_frame()?;
        let frame = context.advance_frame();
        if outcome == UploadOutcome::Skipped {
            log::debug!("Frame {}: image unchanged, upload skipped", frame);
        }

        if let Some(fps) = self.stats.tick() {
            log::info!("FPS: {:.1}", fps);
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RendererError) {
        log::error!("{}", error);
        self.failure = Some(error);
        event_loop.exit();
    }

    fn shutdown(&mut self) {
        if let Some(producer) = self.producer.take() {
            match producer.stop() {
                Ok(frames) => log::info!("Producer wrote {} frames", frames),
                Err(e) => log::error!("Producer ended with error: {}", e),
            }
        }
        // Texture and surface go before the window they were created for
        self.display = None;
        self.context = None;
        self.window = None;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(display) = &mut self.display {
                    display.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.fail(event_loop, e);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
