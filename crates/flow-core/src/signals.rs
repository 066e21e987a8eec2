//! Moving markers that travel along lanes and leave a short fading trail.
//!
//! Draw data lives in two signal-major arenas (positions and colors), each
//! signal owning `trail_draw_count` consecutive `xyz` / `rgb` slots.

use crate::config::SceneConfig;
use crate::constants::{SIGNAL_FIXED_STEP, SIGNAL_SPEED_MIN, SIGNAL_SPEED_SPAN};
use crate::fade::advance_fade;
use crate::path::path_point;
use glam::Vec3;
use rand::Rng;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct Signal {
    pub lane: usize,
    pub progress: f32,
    pub speed: f32,
    pub history: VecDeque<Vec3>,
    /// Index into the scene's signal palette.
    pub color_index: usize,
    pub opacity: f32,
}

/// Advance `progress` by `step`, wrapping once past 1.0.
///
/// Returns the new progress and whether it wrapped. The overshoot is carried
/// into the next lap so 0.95 + 0.5 lands on 0.45.
#[inline]
pub fn advance_progress(progress: f32, step: f32) -> (f32, bool) {
    let next = progress + step;
    if next > 1.0 {
        ((next - 1.0).clamp(0.0, 1.0), true)
    } else {
        (next.max(0.0), false)
    }
}

pub struct SignalField {
    signals: Vec<Signal>,
    palette: Vec<Vec3>,
    trail_length: usize,
    draw_count: usize,
    positions: Vec<f32>,
    colors: Vec<f32>,
    last_update_time: Option<f32>,
    generation: u64,
}

impl SignalField {
    pub fn new<R: Rng + ?Sized>(cfg: &SceneConfig, rng: &mut R) -> Self {
        let palette = cfg.signal_palette();
        let draw_count = cfg.trail_draw_count();
        let signals = (0..cfg.signal_count)
            .map(|_| Signal {
                lane: rng.gen_range(0..cfg.line_count),
                progress: rng.gen::<f32>(),
                speed: SIGNAL_SPEED_MIN + rng.gen::<f32>() * SIGNAL_SPEED_SPAN,
                history: VecDeque::with_capacity(cfg.trail_length + 2),
                color_index: rng.gen_range(0..palette.len()),
                opacity: 0.0,
            })
            .collect();
        Self {
            signals,
            palette,
            trail_length: cfg.trail_length,
            draw_count,
            positions: vec![0.0; cfg.signal_count * draw_count * 3],
            colors: vec![0.0; cfg.signal_count * draw_count * 3],
            last_update_time: None,
            generation: 0,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, cfg: &SceneConfig, rng: &mut R, time: f32) {
        let dt = self
            .last_update_time
            .map_or(0.0, |prev| (time - prev).max(0.0));
        self.last_update_time = Some(time);

        let step_scale = SIGNAL_FIXED_STEP * cfg.speed_global;
        let max_history = self.trail_length + 1;
        let draw_count = self.draw_count;
        let stride = draw_count * 3;

        for (i, sig) in self.signals.iter_mut().enumerate() {
            let (progress, wrapped) = advance_progress(sig.progress, sig.speed * step_scale);
            sig.progress = progress;
            if wrapped {
                sig.lane = rng.gen_range(0..cfg.line_count);
                sig.history.clear();
                sig.color_index = rng.gen_range(0..self.palette.len());
                log::trace!("[flow] signal {} -> lane {}", i, sig.lane);
            }

            sig.opacity = advance_fade(
                sig.opacity,
                1.0,
                cfg.signal_fade_step,
                cfg.fade_mode,
                cfg.target_fps,
                dt,
            );

            let head = path_point(cfg, sig.progress, sig.lane, time);
            sig.history.push_back(head);
            while sig.history.len() > max_history {
                sig.history.pop_front();
            }

            let color = self.palette[sig.color_index] * sig.opacity;
            let pos_out = &mut self.positions[i * stride..(i + 1) * stride];
            let col_out = &mut self.colors[i * stride..(i + 1) * stride];
            let len = sig.history.len();
            for k in 0..draw_count {
                // newest first; pad with the oldest known point
                let idx = len.saturating_sub(1 + k);
                let p = sig.history.get(idx).copied().unwrap_or(head);
                pos_out[k * 3..k * 3 + 3].copy_from_slice(&p.to_array());

                let alpha = trail_alpha(k, self.trail_length);
                col_out[k * 3..k * 3 + 3].copy_from_slice(&(color * alpha).to_array());
            }
        }
        self.generation += 1;
    }

    #[inline]
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    #[inline]
    pub fn palette(&self) -> &[Vec3] {
        &self.palette
    }

    /// Vertices drawn per signal (the trail draw range, at least 1).
    #[inline]
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    pub fn trail_positions(&self, signal: usize) -> &[f32] {
        let stride = self.draw_count * 3;
        &self.positions[signal * stride..(signal + 1) * stride]
    }

    pub fn trail_colors(&self, signal: usize) -> &[f32] {
        let stride = self.draw_count * 3;
        &self.colors[signal * stride..(signal + 1) * stride]
    }

    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn release(&mut self) {
        self.signals = Vec::new();
        self.positions = Vec::new();
        self.colors = Vec::new();
    }
}

/// Linear falloff along the trail; sample 0 is the head.
#[inline]
pub fn trail_alpha(sample: usize, trail_length: usize) -> f32 {
    if trail_length == 0 {
        1.0
    } else {
        (1.0 - sample as f32 / trail_length as f32).max(0.0)
    }
}
