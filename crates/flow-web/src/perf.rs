use crate::constants::{SCENE_LOAD_GOOD_MS, SCENE_LOAD_POOR_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadRating {
    Good,
    NeedsImprovement,
    Poor,
}

impl LoadRating {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadRating::Good => "good",
            LoadRating::NeedsImprovement => "needs-improvement",
            LoadRating::Poor => "poor",
        }
    }
}

pub fn rate_scene_load(ms: f64) -> LoadRating {
    if ms < SCENE_LOAD_GOOD_MS {
        LoadRating::Good
    } else if ms < SCENE_LOAD_POOR_MS {
        LoadRating::NeedsImprovement
    } else {
        LoadRating::Poor
    }
}

/// Log scene start-up time once, with its rating.
pub fn log_scene_load(ms: f64) {
    let rating = rate_scene_load(ms);
    log::info!("[mount] scene load {:.0} ms ({})", ms, rating.as_str());
}
