// Host-side tests for surface sizing, resize debounce, camera and fps metering.

use flow_core::{backing_size, Camera, FpsMeter, ResizeDebouncer, SceneConfig};
use glam::Vec3;

#[test]
fn backing_size_caps_pixel_ratio() {
    assert_eq!(backing_size(800.0, 600.0, 2.0, 2.0), (1600, 1200));
    assert_eq!(backing_size(800.0, 600.0, 3.0, 2.0), (1600, 1200));
    assert_eq!(backing_size(800.0, 600.0, 3.0, 1.0), (800, 600));
    assert_eq!(backing_size(800.0, 600.0, f64::NAN, 2.0), (800, 600));
}

#[test]
fn backing_size_never_zero() {
    assert_eq!(backing_size(0.0, 0.0, 2.0, 2.0), (1, 1));
    assert_eq!(backing_size(-5.0, 10.0, 1.0, 2.0), (1, 10));
}

#[test]
fn debouncer_releases_after_quiet_period() {
    let mut d = ResizeDebouncer::default();
    assert_eq!(d.poll(0.0), None);
    d.request(100, 50, 0.0);
    assert!(d.is_pending());
    assert_eq!(d.poll(100.0), None);
    assert_eq!(d.poll(150.0), Some((100, 50)));
    assert!(!d.is_pending());
    assert_eq!(d.poll(400.0), None);
}

#[test]
fn debouncer_keeps_latest_size_and_restarts_timer() {
    let mut d = ResizeDebouncer::new(150.0);
    d.request(100, 50, 0.0);
    d.request(300, 200, 100.0);
    assert_eq!(d.poll(200.0), None);
    assert_eq!(d.poll(250.0), Some((300, 200)));
}

#[test]
fn fps_meter_reports_once_per_second() {
    let mut m = FpsMeter::default();
    let mut reports = Vec::new();
    for i in 0..=50 {
        if let Some(fps) = m.record(i as f64 * 40.0) {
            reports.push(fps);
        }
    }
    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|&f| (25..=26).contains(&f)), "{:?}", reports);
}

#[test]
fn camera_centres_content() {
    let cfg = SceneConfig::default();
    let cam = Camera::from_config(&cfg, 16.0 / 9.0);
    // the midpoint of the curve + straight span lands on screen centre
    let mid = Vec3::new((cfg.straight_length - cfg.curve_length) / 2.0, 0.0, 0.0);
    let ndc = cam.view_proj().project_point3(mid);
    assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}

#[test]
fn camera_aspect_is_sanitized() {
    let cfg = SceneConfig::default();
    let mut cam = Camera::from_config(&cfg, f32::NAN);
    assert_eq!(cam.aspect, 1.0);
    cam.set_viewport(1920, 1080);
    assert!((cam.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    cam.set_viewport(0, 0);
    assert_eq!(cam.aspect, 1.0);
}
