//! Fixed-step frame driving.

/// Steps a frame callback at a fixed delta and keeps time.
///
/// Durations are converted to a whole number of frames up front, so running
/// for `2.0` seconds at 60 fps always takes exactly 120 frames.
#[derive(Debug, Clone)]
pub struct FrameDriver {
    dt: f32,
    frames: u64,
    time: f64,
}

impl FrameDriver {
    /// Driver stepping at `fps` frames per second (at least 1).
    pub fn new(fps: u32) -> Self {
        Self::with_dt(1.0 / fps.max(1) as f32)
    }

    /// Driver stepping by `dt` seconds.
    pub fn with_dt(dt: f32) -> Self {
        Self {
            dt,
            frames: 0,
            time: 0.0,
        }
    }

    /// Run one frame.
    pub fn step<E, F>(&mut self, mut frame: F) -> Result<(), E>
    where
        F: FnMut(f32) -> Result<(), E>,
    {
        frame(self.dt)?;
        self.frames += 1;
        self.time += f64::from(self.dt);
        Ok(())
    }

    /// Run frames covering `seconds`. Returns the number of frames run.
    pub fn run_for<E, F>(&mut self, seconds: f64, mut frame: F) -> Result<u64, E>
    where
        F: FnMut(f32) -> Result<(), E>,
    {
        let count = self.frames_for(seconds);
        for _ in 0..count {
            self.step(&mut frame)?;
        }
        Ok(count)
    }

    /// Frames needed to cover `seconds`.
    pub fn frames_for(&self, seconds: f64) -> u64 {
        if seconds <= 0.0 || self.dt <= 0.0 {
            return 0;
        }
        (seconds / f64::from(self.dt)).round() as u64
    }

    /// Frame delta in seconds.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Seconds covered so far.
    pub fn time(&self) -> f64 {
        self.time
    }
}
