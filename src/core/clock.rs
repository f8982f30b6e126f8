use std::time::Instant;

/// Per-frame timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    pub number: u64,
    /// Seconds since the previous tick
    pub delta: f32,
    /// Seconds since the clock started
    pub elapsed: f32,
}

/// Frame clock - tracks delta and total time
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    last_tick: Instant,
    frame_number: u64,
}

impl Clock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frame_number: 0,
        }
    }

    /// Advance to the next frame
    pub fn tick(&mut self) -> FrameTiming {
        let now = Instant::now();
        let timing = FrameTiming {
            number: self.frame_number,
            delta: now.duration_since(self.last_tick).as_secs_f32(),
            elapsed: now.duration_since(self.start).as_secs_f32(),
        };
        self.last_tick = now;
        self.frame_number += 1;
        timing
    }

    /// Restart delta measurement without touching total time, e.g. after the
    /// window was hidden
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages the frame rate over a fixed reporting interval
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    interval: f32,
    frames: u32,
    accumulator: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            frames: 0,
            accumulator: 0.0,
        }
    }

    /// Count one frame; returns the average FPS once per interval
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.frames += 1;
        self.accumulator += delta;

        if self.accumulator >= self.interval {
            let fps = self.frames as f32 / self.accumulator;
            self.frames = 0;
            self.accumulator = 0.0;
            Some(fps)
        } else {
            None
        }
    }
}
