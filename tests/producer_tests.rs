use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use image_renderer::core::{DirtyState, PixelFormat, PixelStore};
use image_renderer::producer::{Pattern, ProducerThread, ScrollingRamp};
use image_renderer::{FrameProducer, ImageBuffer, RendererError, Result, SharedBuffer};

/// Producer that fills every byte with the low bits of the frame number
struct FrameStamp;

impl FrameProducer for FrameStamp {
    fn format(&self) -> PixelFormat {
        PixelFormat::Gray8
    }

    fn produce(&mut self, frame: u64, out: &mut [u8]) {
        out.fill(frame as u8);
    }
}

/// Buffer that accepts a fixed number of writes and rejects the rest
struct FailingBuffer {
    remaining: AtomicUsize,
}

impl ImageBuffer for FailingBuffer {
    fn dimensions(&self) -> (u32, u32) {
        (1, 1)
    }

    fn byte_count(&self) -> usize {
        4
    }

    fn write_rgba_image(&self, source: &[u8]) -> Result<()> {
        self.write_grayscale_image(source)
    }

    fn write_grayscale_image(&self, source: &[u8]) -> Result<()> {
        let left = self.remaining.load(Ordering::SeqCst);
        if left == 0 {
            return Err(RendererError::SizeMismatch {
                expected: 0,
                actual: source.len(),
            });
        }
        self.remaining.store(left - 1, Ordering::SeqCst);
        Ok(())
    }

    fn read_image(&self, _dest: &mut [u8]) -> Result<()> {
        Ok(())
    }

    fn dirty_state(&self) -> DirtyState {
        DirtyState::Dirty
    }
}

fn shared_store(width: u32, height: u32) -> (Arc<PixelStore>, SharedBuffer) {
    let store = Arc::new(PixelStore::new(width, height).unwrap());
    let buffer: SharedBuffer = store.clone();
    (store, buffer)
}

#[test]
fn test_first_frame_written_before_spawn_returns() {
    let (store, buffer) = shared_store(4, 4);
    let producer = ProducerThread::spawn(buffer, Box::new(ScrollingRamp::new()), 1.0).unwrap();

    // Ramp frame 0: byte i == i
    let expected: Vec<u8> = (0..64).collect();
    assert_eq!(store.snapshot(), expected);

    producer.stop().unwrap();
}

#[test]
fn test_producer_keeps_writing_until_stopped() {
    let (store, buffer) = shared_store(2, 2);
    let producer = ProducerThread::spawn(buffer, Box::new(FrameStamp), 200.0).unwrap();
    assert!(producer.is_running());

    thread::sleep(Duration::from_millis(100));
    let frames = producer.stop().unwrap();
    assert!(frames > 1, "only {} frames written", frames);

    let snapshot = store.snapshot();
    let last = ((frames - 1) % 256) as u8;
    assert_eq!(snapshot, vec![last; 16]);
}

#[test]
fn test_non_positive_rate_rejected() {
    let (_, buffer) = shared_store(1, 1);
    for hz in [0.0, -5.0, f32::NAN] {
        let result = ProducerThread::spawn(buffer.clone(), Box::new(FrameStamp), hz);
        assert!(matches!(result, Err(RendererError::Config(_))));
    }
}

#[test]
fn test_dropping_handle_stops_thread() {
    let (store, buffer) = shared_store(1, 1);
    let producer = ProducerThread::spawn(buffer, Box::new(FrameStamp), 500.0).unwrap();
    thread::sleep(Duration::from_millis(20));
    drop(producer);

    let frozen = store.snapshot();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(store.snapshot(), frozen);
}

#[test]
fn test_patterns_match_buffer_layout() {
    for pattern in [Pattern::Ramp, Pattern::Diffusion] {
        let (store, buffer) = shared_store(40, 30);
        let producer = ProducerThread::spawn(buffer, pattern.build(40, 30), 120.0).unwrap();
        thread::sleep(Duration::from_millis(30));
        producer.stop().unwrap();

        assert_eq!(store.snapshot().len(), 40 * 30 * 4);
    }
}

#[test]
fn test_diffusion_writes_grayscale_pixels() {
    let (store, buffer) = shared_store(64, 64);
    let producer = ProducerThread::spawn(buffer, Pattern::Diffusion.build(64, 64), 1.0).unwrap();
    producer.stop().unwrap();

    let pixels = store.snapshot();
    assert!(pixels.iter().any(|&b| b > 0));
    for px in pixels.chunks_exact(4) {
        assert!(px.iter().all(|&c| c == px[0]));
    }
}

#[test]
fn test_failed_write_ends_thread_with_error() {
    let buffer: SharedBuffer = Arc::new(FailingBuffer {
        remaining: AtomicUsize::new(3),
    });
    let producer = ProducerThread::spawn(buffer, Box::new(FrameStamp), 500.0).unwrap();

    for _ in 0..200 {
        if !producer.is_running() {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert!(!producer.is_running());
    assert!(matches!(producer.stop(), Err(RendererError::SizeMismatch { .. })));
}
