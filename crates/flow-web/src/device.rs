use crate::constants::REDUCED_MOTION_QUERY;
use flow_core::DeviceInfo;
use web_sys as web;

/// Gather the device signals the tier decision needs. Missing APIs fall back
/// to "unknown" values, which never force the low tier on their own.
pub fn detect(window: &web::Window) -> DeviceInfo {
    let navigator = window.navigator();
    let user_agent = navigator.user_agent().unwrap_or_default();
    let cores = navigator.hardware_concurrency();
    let hardware_concurrency = if cores.is_finite() && cores > 0.0 {
        cores as u32
    } else {
        0
    };
    let prefers_reduced_motion = window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|mq| mq.matches())
        .unwrap_or(false);
    DeviceInfo {
        user_agent,
        hardware_concurrency,
        prefers_reduced_motion,
    }
}
