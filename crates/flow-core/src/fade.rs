use crate::config::FadeMode;

/// Advance a fade-in opacity toward `target` by one update.
///
/// The result never decreases and never exceeds `target`.
#[inline]
pub fn advance_fade(
    opacity: f32,
    target: f32,
    step: f32,
    mode: FadeMode,
    target_fps: f32,
    dt_sec: f32,
) -> f32 {
    if opacity >= target {
        return target;
    }
    let inc = match mode {
        FadeMode::PerUpdate => step,
        FadeMode::WallClock => step * target_fps * dt_sec.max(0.0),
    };
    (opacity + inc).min(target)
}
