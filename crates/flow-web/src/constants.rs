// Web front-end tuning constants

// Bloom chain renders at 1/N of the surface size
pub const BLOOM_DOWNSCALE: u32 = 2;

// Sample count for the scene pass when antialiasing is enabled
pub const MSAA_SAMPLES: u32 = 4;

// Canvas created inside the mount container
pub const CANVAS_CLASS: &str = "flow-lines-canvas";
pub const CANVAS_STYLE: &str = "display:block;width:100%;height:100%;pointer-events:none;";

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Scene start-up rating thresholds (milliseconds)
pub const SCENE_LOAD_GOOD_MS: f64 = 1000.0;
pub const SCENE_LOAD_POOR_MS: f64 = 2000.0;
