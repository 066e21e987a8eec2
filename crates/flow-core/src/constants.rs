// Shared tuning constants for the flow-line scene.

// Device tiering
pub const MOBILE_UA_TOKENS: [&str; 4] = ["iphone", "ipad", "ipod", "android"];
pub const LOW_TIER_MAX_CORES: u32 = 4; // at or below this many logical cores -> low tier

// Scene sizing per tier
pub const FULL_LINE_COUNT: usize = 50;
pub const LOW_LINE_COUNT: usize = 30;
pub const FULL_SIGNAL_COUNT: usize = 35;
pub const LOW_SIGNAL_COUNT: usize = 20;
pub const FULL_SEGMENT_COUNT: usize = 120;
pub const LOW_SEGMENT_COUNT: usize = 80;

// Frame pacing per tier
pub const FULL_TARGET_FPS: f32 = 30.0;
pub const LOW_TARGET_FPS: f32 = 20.0;
pub const LOW_LINE_UPDATE_STRIDE: u32 = 3; // recompute lines on 1 of every N executed frames

// Path shape
pub const SPREAD_HEIGHT: f32 = 30.33;
pub const SPREAD_DEPTH: f32 = 0.0;
pub const CURVE_LENGTH: f32 = 50.0;
pub const STRAIGHT_LENGTH: f32 = 100.0;
pub const CURVE_POWER: f32 = 0.8265;
pub const WAVE_SPEED: f32 = 2.48;
pub const WAVE_HEIGHT: f32 = 0.145;
pub const WAVE_X_FREQUENCY: f32 = 0.1; // phase advance per world unit along x

// Signals
pub const SPEED_GLOBAL: f32 = 0.345;
pub const SIGNAL_FIXED_STEP: f32 = 0.005; // progress per executed frame per unit speed
pub const SIGNAL_SPEED_MIN: f32 = 0.2;
pub const SIGNAL_SPEED_SPAN: f32 = 0.5;
pub const TRAIL_LENGTH: usize = 3;
pub const MAX_TRAIL: usize = 150; // per-signal vertex capacity ceiling

// Opacity and fade-in
pub const LINE_OPACITY: f32 = 0.4;
pub const LINE_FADE_STEP: f32 = 0.01;
pub const SIGNAL_FADE_STEP: f32 = 0.02;
pub const LANE_STAGGER_SEC: f32 = 0.04;

// Post-processing
pub const FULL_BLOOM_STRENGTH: f32 = 2.5;
pub const LOW_BLOOM_STRENGTH: f32 = 1.5;
pub const BLOOM_RADIUS: f32 = 0.4;
pub const BLOOM_THRESHOLD: f32 = 0.0;

// Camera and atmosphere
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 1000.0;
pub const CAMERA_Z: f32 = 90.0;
pub const FOG_DENSITY: f32 = 0.003;

// Surface
pub const FULL_MAX_PIXEL_RATIO: f64 = 2.0;
pub const LOW_MAX_PIXEL_RATIO: f64 = 1.0;
pub const RESIZE_DEBOUNCE_MS: f64 = 150.0;

// Palette (sRGB hex)
pub const COLOR_BG: u32 = 0x050505; // void black
pub const COLOR_LINE: u32 = 0x8c8c8c; // subtle gray
pub const COLOR_SIGNAL: u32 = 0xccff00; // acid green
pub const COLOR_SIGNAL_ALT: u32 = 0x3b82f6; // signal blue
