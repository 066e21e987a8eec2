//! Renderer-side state for one mounted flow-line field.
//!
//! `FlowScene` owns every buffer the GPU front-end reads. All storage is sized
//! once from the config in [`FlowScene::new`]; per-frame updates only write in
//! place. Driving is explicit: call [`FlowScene::frame`] from the platform's
//! animation-frame callback, or [`FlowScene::step`] directly in tests.

use crate::config::SceneConfig;
use crate::error::FlowResult;
use crate::lines::LineField;
use crate::metrics::FpsMeter;
use crate::scheduler::{FrameScheduler, FrameTick, TickDecision};
use crate::signals::SignalField;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// Not started, or disposed.
    Stopped,
    /// Off screen or page hidden.
    Paused,
    /// Arrived before the frame interval elapsed.
    Throttled,
    Rendered {
        lines_updated: bool,
        /// Executed-frame rate, reported about once per second.
        fps: Option<u32>,
    },
}

pub struct FlowScene {
    config: SceneConfig,
    lines: LineField,
    signals: SignalField,
    scheduler: FrameScheduler,
    fps: FpsMeter,
    rng: StdRng,
    disposed: bool,
}

impl FlowScene {
    pub fn new(config: SceneConfig, seed: u64) -> FlowResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Seed from the platform entropy source.
    pub fn with_entropy(config: SceneConfig) -> FlowResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    fn with_rng(config: SceneConfig, mut rng: StdRng) -> FlowResult<Self> {
        config.validate()?;
        let lines = LineField::new(&config);
        let signals = SignalField::new(&config, &mut rng);
        let scheduler = FrameScheduler::new(config.frame_interval_ms(), config.line_update_stride);
        log::info!(
            "[flow] scene tier={:?} lines={} signals={} segments={} fps={}",
            config.tier,
            config.line_count,
            config.signal_count,
            config.segment_count,
            config.target_fps
        );
        Ok(Self {
            config,
            lines,
            signals,
            scheduler,
            fps: FpsMeter::default(),
            rng,
            disposed: false,
        })
    }

    /// Start the clock and lay out the lanes so the first frames never draw
    /// an empty line arena.
    pub fn start(&mut self, now_ms: f64) {
        if self.disposed {
            return;
        }
        self.scheduler.start(now_ms);
        self.lines.write_geometry(&self.config, 0.0);
    }

    /// One animation-frame callback. Does nothing unless the scheduler says
    /// the frame is due.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        if self.disposed {
            return FrameOutcome::Stopped;
        }
        match self.scheduler.tick(now_ms) {
            TickDecision::Stopped => FrameOutcome::Stopped,
            TickDecision::Paused => FrameOutcome::Paused,
            TickDecision::Throttled => FrameOutcome::Throttled,
            TickDecision::Run(tick) => {
                self.step(&tick);
                FrameOutcome::Rendered {
                    lines_updated: tick.update_lines,
                    fps: self.fps.record(now_ms),
                }
            }
        }
    }

    /// Apply one executed frame: lines (when due) before signals.
    pub fn step(&mut self, tick: &FrameTick) {
        if self.disposed {
            return;
        }
        if tick.update_lines {
            self.lines.update(&self.config, tick.time_sec);
        }
        self.signals
            .update(&self.config, &mut self.rng, tick.time_sec);
    }

    pub fn set_intersecting(&mut self, intersecting: bool) {
        self.scheduler.set_intersecting(intersecting);
    }

    pub fn set_page_hidden(&mut self, hidden: bool) {
        self.scheduler.set_page_hidden(hidden);
    }

    /// Stop the loop and free all buffers. Later calls are no-ops.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.scheduler.stop();
        self.lines.release();
        self.signals.release();
        log::info!("[flow] scene disposed");
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        !self.disposed && self.scheduler.is_running()
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    #[inline]
    pub fn lines(&self) -> &LineField {
        &self.lines
    }

    #[inline]
    pub fn signals(&self) -> &SignalField {
        &self.signals
    }

    #[inline]
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }
}
