use crate::constants::*;
use crate::device::{DeviceInfo, DeviceTier};
use crate::error::{FlowError, FlowResult};
use glam::Vec3;

/// How fade-in opacity advances per update.
///
/// `PerUpdate` adds a fixed step on every update call, so lanes on the low
/// tier (recomputed on 1 of 3 frames) take three times longer to appear.
/// `WallClock` scales the same step by elapsed time so both tiers fade in
/// over the same duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FadeMode {
    #[default]
    PerUpdate,
    WallClock,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub tier: DeviceTier,

    // counts
    pub line_count: usize,
    pub signal_count: usize,
    pub segment_count: usize,

    // path shape
    pub spread_height: f32,
    pub spread_depth: f32,
    pub curve_length: f32,
    pub straight_length: f32,
    pub curve_power: f32,
    pub wave_speed: f32,
    pub wave_height: f32,

    // signals
    pub speed_global: f32,
    pub trail_length: usize,

    // opacity / fade-in
    pub line_opacity: f32,
    pub line_fade_step: f32,
    pub signal_fade_step: f32,
    pub lane_stagger_sec: f32,
    pub fade_mode: FadeMode,

    // pacing
    pub target_fps: f32,
    pub line_update_stride: u32,

    // post + surface
    pub bloom_strength: f32,
    pub bloom_radius: f32,
    pub bloom_threshold: f32,
    pub max_pixel_ratio: f64,
    pub antialias: bool,

    // camera + atmosphere
    pub camera_fov_deg: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_z: f32,
    pub fog_density: f32,

    // palette (linear RGB)
    pub color_bg: Vec3,
    pub color_line: Vec3,
    pub color_signal: Vec3,
    pub color_signal_alt: Vec3,
    pub use_alt_signal_color: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            tier: DeviceTier::Full,
            line_count: FULL_LINE_COUNT,
            signal_count: FULL_SIGNAL_COUNT,
            segment_count: FULL_SEGMENT_COUNT,
            spread_height: SPREAD_HEIGHT,
            spread_depth: SPREAD_DEPTH,
            curve_length: CURVE_LENGTH,
            straight_length: STRAIGHT_LENGTH,
            curve_power: CURVE_POWER,
            wave_speed: WAVE_SPEED,
            wave_height: WAVE_HEIGHT,
            speed_global: SPEED_GLOBAL,
            trail_length: TRAIL_LENGTH,
            line_opacity: LINE_OPACITY,
            line_fade_step: LINE_FADE_STEP,
            signal_fade_step: SIGNAL_FADE_STEP,
            lane_stagger_sec: LANE_STAGGER_SEC,
            fade_mode: FadeMode::PerUpdate,
            target_fps: FULL_TARGET_FPS,
            line_update_stride: 1,
            bloom_strength: FULL_BLOOM_STRENGTH,
            bloom_radius: BLOOM_RADIUS,
            bloom_threshold: BLOOM_THRESHOLD,
            max_pixel_ratio: FULL_MAX_PIXEL_RATIO,
            antialias: true,
            camera_fov_deg: CAMERA_FOV_DEG,
            camera_near: CAMERA_NEAR,
            camera_far: CAMERA_FAR,
            camera_z: CAMERA_Z,
            fog_density: FOG_DENSITY,
            color_bg: srgb_hex_to_linear(COLOR_BG),
            color_line: srgb_hex_to_linear(COLOR_LINE),
            color_signal: srgb_hex_to_linear(COLOR_SIGNAL),
            color_signal_alt: srgb_hex_to_linear(COLOR_SIGNAL_ALT),
            use_alt_signal_color: true,
        }
    }
}

/// Pick the scene configuration for a device. Pure; called once per mount.
pub fn derive_config(device: &DeviceInfo) -> SceneConfig {
    let tier = device.tier();
    let mut cfg = match tier {
        DeviceTier::Full => SceneConfig::default(),
        DeviceTier::Low => SceneConfig {
            tier,
            line_count: LOW_LINE_COUNT,
            signal_count: LOW_SIGNAL_COUNT,
            segment_count: LOW_SEGMENT_COUNT,
            target_fps: LOW_TARGET_FPS,
            line_update_stride: LOW_LINE_UPDATE_STRIDE,
            bloom_strength: LOW_BLOOM_STRENGTH,
            max_pixel_ratio: LOW_MAX_PIXEL_RATIO,
            antialias: false,
            ..SceneConfig::default()
        },
    };
    if device.prefers_reduced_motion {
        cfg.wave_speed = 0.0;
        cfg.wave_height = 0.0;
    }
    cfg
}

impl SceneConfig {
    pub fn validate(&self) -> FlowResult<()> {
        let fail = |msg: &str| Err(FlowError::InvalidConfig(msg.to_string()));
        if self.line_count == 0 {
            return fail("line_count must be at least 1");
        }
        if self.segment_count < 2 {
            return fail("segment_count must be at least 2");
        }
        if self.trail_length > MAX_TRAIL {
            return fail("trail_length exceeds per-signal capacity");
        }
        if !(self.curve_length > 0.0) || !(self.straight_length >= 0.0) {
            return fail("curve_length must be positive and straight_length non-negative");
        }
        if !(self.curve_power > 0.0) {
            return fail("curve_power must be positive");
        }
        if !(self.target_fps > 0.0) {
            return fail("target_fps must be positive");
        }
        if !(0.0..=1.0).contains(&self.line_opacity) {
            return fail("line_opacity must be within [0, 1]");
        }
        if !(self.line_fade_step > 0.0) || !(self.signal_fade_step > 0.0) {
            return fail("fade steps must be positive");
        }
        if !(self.speed_global >= 0.0) {
            return fail("speed_global must be non-negative");
        }
        Ok(())
    }

    /// Minimum wall-clock spacing between executed frames.
    #[inline]
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps as f64
    }

    /// Vertices written per signal per frame (the trail draw range).
    #[inline]
    pub fn trail_draw_count(&self) -> usize {
        self.trail_length.max(1)
    }

    /// Horizontal offset that centres the curve + straight span on screen.
    #[inline]
    pub fn content_offset_x(&self) -> f32 {
        (self.curve_length - self.straight_length) / 2.0
    }

    #[inline]
    pub fn waves_enabled(&self) -> bool {
        self.wave_speed != 0.0 && self.wave_height != 0.0
    }

    pub fn signal_palette(&self) -> Vec<Vec3> {
        if self.use_alt_signal_color {
            vec![self.color_signal, self.color_signal_alt]
        } else {
            vec![self.color_signal]
        }
    }
}

#[inline]
fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a `0xRRGGBB` sRGB color into linear RGB.
pub fn srgb_hex_to_linear(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(
        srgb_channel_to_linear(r),
        srgb_channel_to_linear(g),
        srgb_channel_to_linear(b),
    )
}

/// Display transfer for one linear channel; the inverse of the sRGB decode
/// above. The composite shader applies the same curve when the surface view
/// is not an sRGB format.
#[inline]
pub fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Encode a linear color to the 8-bit sRGB triple a display surface holds.
pub fn linear_to_srgb_bytes(color: Vec3) -> [u8; 3] {
    let enc = |c: f32| (linear_to_srgb(c) * 255.0).round() as u8;
    [enc(color.x), enc(color.y), enc(color.z)]
}
