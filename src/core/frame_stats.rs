use std::time::Instant;

/// Tracks frame delta time and reports an averaged FPS at a fixed interval
#[derive(Debug)]
pub struct FrameStats {
    last_tick: Instant,
    report_interval: f32,
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FrameStats {
    /// Create stats starting now, reporting every `report_interval` seconds
    pub fn new(report_interval: f32) -> Self {
        Self {
            last_tick: Instant::now(),
            report_interval,
            frames: 0,
            elapsed: 0.0,
            fps: 0.0,
        }
    }

    /// Mark a frame at the current time
    /// Returns the new FPS value when a report is due
    pub fn tick(&mut self) -> Option<f32> {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.record(delta)
    }

    /// Account for one frame that took `delta` seconds
    pub fn record(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += delta;

        if self.elapsed >= self.report_interval {
            self.fps = self.frames as f32 / self.elapsed;
            self.frames = 0;
            self.elapsed = 0.0;
            Some(self.fps)
        } else {
            None
        }
    }

    /// Last reported FPS
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(1.0)
    }
}
