// Host-side tests for the web front-end's pure modules.
// The main crate is wasm-only, so we include them directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod perf {
    include!("../src/perf.rs");
}

use constants::*;
use perf::{rate_scene_load, LoadRating};

#[test]
#[allow(clippy::assertions_on_constants)]
fn post_constants_are_sane() {
    assert!(BLOOM_DOWNSCALE >= 1);
    assert!(MSAA_SAMPLES == 1 || MSAA_SAMPLES == 4);
    assert!(SCENE_LOAD_GOOD_MS < SCENE_LOAD_POOR_MS);
}

#[test]
fn canvas_markup_fills_container() {
    assert!(!CANVAS_CLASS.is_empty());
    assert!(CANVAS_STYLE.contains("width:100%"));
    assert!(CANVAS_STYLE.contains("height:100%"));
    assert!(REDUCED_MOTION_QUERY.contains("prefers-reduced-motion"));
}

#[test]
fn scene_load_rating_thresholds() {
    assert_eq!(rate_scene_load(0.0), LoadRating::Good);
    assert_eq!(rate_scene_load(999.9), LoadRating::Good);
    assert_eq!(rate_scene_load(1000.0), LoadRating::NeedsImprovement);
    assert_eq!(rate_scene_load(1999.0), LoadRating::NeedsImprovement);
    assert_eq!(rate_scene_load(2000.0), LoadRating::Poor);
    assert_eq!(rate_scene_load(5000.0), LoadRating::Poor);
}

#[test]
fn rating_labels() {
    assert_eq!(LoadRating::Good.as_str(), "good");
    assert_eq!(LoadRating::NeedsImprovement.as_str(), "needs-improvement");
    assert_eq!(LoadRating::Poor.as_str(), "poor");
}
