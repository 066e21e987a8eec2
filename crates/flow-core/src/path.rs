//! Lane geometry.
//!
//! Every lane starts fanned out on the left (the curved section, `x < 0`) and
//! converges into a flat parallel bundle on the right (`x >= 0`). The lateral
//! spread eases out with a raised-cosine bump so lanes meet the junction at
//! `x = 0` with zero offset, which keeps the path continuous there.

use crate::config::SceneConfig;
use crate::constants::WAVE_X_FREQUENCY;
use glam::Vec3;
use std::f32::consts::PI;

/// Raised-cosine ease for the curved section: 1 at the far left, 0 at the
/// junction.
#[inline]
pub fn shape_factor(ratio: f32, curve_power: f32) -> f32 {
    let bump = ((ratio * PI).cos() + 1.0) / 2.0;
    bump.max(0.0).powf(curve_power)
}

/// Lane position in `[-1, 1)` across the lane count.
#[inline]
pub fn spread_factor(lane: usize, line_count: usize) -> f32 {
    (lane as f32 / line_count.max(1) as f32 - 0.5) * 2.0
}

/// Point on `lane` at normalized arc-length `t` for scene time `time` (seconds).
pub fn path_point(cfg: &SceneConfig, t: f32, lane: usize, time: f32) -> Vec3 {
    let total_len = cfg.curve_length + cfg.straight_length;
    let x = -cfg.curve_length + t * total_len;
    if x >= 0.0 {
        return Vec3::new(x, 0.0, 0.0);
    }

    let spread = spread_factor(lane, cfg.line_count);
    let ratio = (x + cfg.curve_length) / cfg.curve_length;
    let shape = shape_factor(ratio, cfg.curve_power);
    let mut y = spread * cfg.spread_height * shape;
    let z = spread * cfg.spread_depth * shape;

    if cfg.waves_enabled() {
        let phase = time * cfg.wave_speed + x * WAVE_X_FREQUENCY + lane as f32;
        y += phase.sin() * cfg.wave_height * shape;
    }
    Vec3::new(x, y, z)
}
