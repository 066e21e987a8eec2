//! Frame pacing for the animation loop.
//!
//! The platform calls [`FrameScheduler::tick`] on every animation frame with
//! its timestamp; the scheduler decides whether that frame does any work.
//! Skipped frames are never queued or replayed.

/// Work description for one executed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Seconds since `start`.
    pub time_sec: f32,
    /// Seconds since the previous executed frame (0 for the first).
    pub dt_sec: f32,
    /// 1-based count of executed frames.
    pub frame: u64,
    pub update_lines: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickDecision {
    Stopped,
    Paused,
    Throttled,
    Run(FrameTick),
}

#[derive(Clone, Debug)]
pub struct FrameScheduler {
    interval_ms: f64,
    line_stride: u32,
    running: bool,
    intersecting: bool,
    page_hidden: bool,
    origin_ms: f64,
    last_frame_ms: Option<f64>,
    last_run_ms: Option<f64>,
    frame_count: u64,
}

impl FrameScheduler {
    pub fn new(interval_ms: f64, line_stride: u32) -> Self {
        Self {
            interval_ms,
            line_stride,
            running: false,
            intersecting: true,
            page_hidden: false,
            origin_ms: 0.0,
            last_frame_ms: None,
            last_run_ms: None,
            frame_count: 0,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.running = true;
        self.origin_ms = now_ms;
        // first tick after start always runs
        self.last_frame_ms = None;
        self.last_run_ms = None;
        self.frame_count = 0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_intersecting(&mut self, intersecting: bool) {
        self.intersecting = intersecting;
    }

    pub fn set_page_hidden(&mut self, hidden: bool) {
        self.page_hidden = hidden;
    }

    /// True when the surface is on screen and the page is visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.intersecting && !self.page_hidden
    }

    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn tick(&mut self, now_ms: f64) -> TickDecision {
        if !self.running {
            return TickDecision::Stopped;
        }
        if !self.is_visible() {
            return TickDecision::Paused;
        }
        match self.last_frame_ms {
            Some(last) => {
                let elapsed = now_ms - last;
                if elapsed < self.interval_ms {
                    return TickDecision::Throttled;
                }
                // keep the remainder so the cadence does not drift
                self.last_frame_ms = Some(now_ms - (elapsed % self.interval_ms));
            }
            None => self.last_frame_ms = Some(now_ms),
        }
        self.frame_count += 1;

        let dt_sec = self
            .last_run_ms
            .map_or(0.0, |prev| ((now_ms - prev) / 1000.0) as f32);
        self.last_run_ms = Some(now_ms);

        let update_lines = self.line_stride <= 1 || self.frame_count % self.line_stride as u64 == 0;
        TickDecision::Run(FrameTick {
            time_sec: ((now_ms - self.origin_ms) / 1000.0) as f32,
            dt_sec,
            frame: self.frame_count,
            update_lines,
        })
    }
}
