use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::render_context::SharedBuffer;
use crate::error::{RendererError, Result};
use crate::traits::FrameProducer;

/// A producer running on its own thread, writing into a shared buffer at a fixed rate
///
/// Stopping (explicitly or on drop) lets the current frame finish and joins the thread.
pub struct ProducerThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Result<u64>>>,
}

impl ProducerThread {
    /// Start writing frames from `producer` into `buffer`, `hz` times per second
    ///
    /// Frame 0 is produced and written on the calling thread before the worker starts.
    pub fn spawn(buffer: SharedBuffer, mut producer: Box<dyn FrameProducer>, hz: f32) -> Result<Self> {
        if !(hz > 0.0 && hz.is_finite()) {
            return Err(RendererError::Config(format!("producer rate must be positive, got {}", hz)));
        }

        let interval = Duration::from_secs_f32(1.0 / hz);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let name = producer.name().to_string();

        // First frame is written before returning so the buffer never shows its zeroed start
        let len = buffer.pixel_count() * producer.format().bytes_per_pixel();
        let mut scratch = vec![0u8; len];
        producer.produce(0, &mut scratch);
        buffer.write_image(producer.format(), &scratch)?;

        let handle = thread::Builder::new()
            .name(format!("producer-{}", name))
            .spawn(move || {
                log::info!("Producer '{}' started at {:.1} Hz", name, hz);
                let mut frame = 1u64;

                while !stop_flag.load(Ordering::Acquire) {
                    let started = Instant::now();

                    producer.produce(frame, &mut scratch);
                    if let Err(e) = buffer.write_image(producer.format(), &scratch) {
                        log::error!("Producer '{}' failed on frame {}: {}", name, frame, e);
                        return Err(e);
                    }
                    frame += 1;

                    if let Some(remaining) = interval.checked_sub(started.elapsed()) {
                        thread::sleep(remaining);
                    }
                }

                log::info!("Producer '{}' stopped after {} frames", name, frame);
                Ok(frame)
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// Signal the thread to stop and wait for it
    /// Returns the number of frames written
    pub fn stop(mut self) -> Result<u64> {
        self.shutdown()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    fn shutdown(&mut self) -> Result<u64> {
        self.stop.store(true, Ordering::Release);
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| RendererError::Producer("thread panicked".into()))?,
            None => Ok(0),
        }
    }
}

impl Drop for ProducerThread {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            log::error!("Producer thread failed: {}", e);
        }
    }
}
