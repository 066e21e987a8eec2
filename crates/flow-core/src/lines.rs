//! Background lane geometry, stored lane-major in one pre-allocated arena.

use crate::config::SceneConfig;
use crate::fade::advance_fade;
use crate::path::path_point;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LaneFade {
    pub opacity: f32,
    pub target: f32,
    pub start_delay_sec: f32,
}

pub struct LineField {
    segment_count: usize,
    positions: Vec<f32>,
    fades: Vec<LaneFade>,
    last_update_time: Option<f32>,
    generation: u64,
}

impl LineField {
    pub fn new(cfg: &SceneConfig) -> Self {
        let fades = (0..cfg.line_count)
            .map(|lane| LaneFade {
                opacity: 0.0,
                target: cfg.line_opacity,
                start_delay_sec: lane as f32 * cfg.lane_stagger_sec,
            })
            .collect();
        Self {
            segment_count: cfg.segment_count,
            positions: vec![0.0; cfg.line_count * cfg.segment_count * 3],
            fades,
            last_update_time: None,
            generation: 0,
        }
    }

    /// Recompute every lane at scene time `time` and advance fade-ins.
    pub fn update(&mut self, cfg: &SceneConfig, time: f32) {
        let dt = self
            .last_update_time
            .map_or(0.0, |prev| (time - prev).max(0.0));
        self.last_update_time = Some(time);

        self.write_geometry(cfg, time);

        for fade in &mut self.fades {
            if time >= fade.start_delay_sec {
                fade.opacity = advance_fade(
                    fade.opacity,
                    fade.target,
                    cfg.line_fade_step,
                    cfg.fade_mode,
                    cfg.target_fps,
                    dt,
                );
            }
        }
    }

    /// Resample every lane at `time` without touching fade-in state.
    pub fn write_geometry(&mut self, cfg: &SceneConfig, time: f32) {
        let seg = self.segment_count;
        let denom = (seg - 1) as f32;
        for (lane, lane_buf) in self.positions.chunks_exact_mut(seg * 3).enumerate() {
            for (j, xyz) in lane_buf.chunks_exact_mut(3).enumerate() {
                let p = path_point(cfg, j as f32 / denom, lane, time);
                xyz.copy_from_slice(&p.to_array());
            }
        }
        self.generation += 1;
    }

    #[inline]
    pub fn lane_count(&self) -> usize {
        self.fades.len()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Flat `xyz` samples for one lane.
    pub fn lane_positions(&self, lane: usize) -> &[f32] {
        let stride = self.segment_count * 3;
        &self.positions[lane * stride..(lane + 1) * stride]
    }

    /// Whole arena, lane-major.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    #[inline]
    pub fn fades(&self) -> &[LaneFade] {
        &self.fades
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn release(&mut self) {
        self.positions = Vec::new();
        self.fades = Vec::new();
    }
}
