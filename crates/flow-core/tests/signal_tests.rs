// Host-side tests for signal motion and trails.

use flow_core::{advance_progress, trail_alpha, SceneConfig, SignalField};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn progress_wraps_once_with_overshoot() {
    let (p, wrapped) = advance_progress(0.95, 0.5);
    assert!(wrapped);
    assert!((p - 0.45).abs() < 1e-6, "got {}", p);

    let (p, wrapped) = advance_progress(0.2, 0.1);
    assert!(!wrapped);
    assert!((p - 0.3).abs() < 1e-6);

    let (p, wrapped) = advance_progress(0.5, 0.5);
    assert!(!wrapped);
    assert_eq!(p, 1.0);
}

#[test]
fn progress_never_leaves_unit_range() {
    for &(p, s) in &[(0.99f32, 3.7f32), (0.0, 0.0), (1.0, 1e-3), (0.3, 1.0)] {
        let (next, _) = advance_progress(p, s);
        assert!((0.0..=1.0).contains(&next), "{} + {} -> {}", p, s, next);
    }
}

#[test]
fn trail_alpha_falls_off_linearly() {
    assert_eq!(trail_alpha(0, 3), 1.0);
    assert!((trail_alpha(1, 3) - 2.0 / 3.0).abs() < 1e-6);
    assert!((trail_alpha(2, 3) - 1.0 / 3.0).abs() < 1e-6);
    assert_eq!(trail_alpha(0, 0), 1.0);
}

#[test]
fn history_stays_bounded() {
    let cfg = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(11);
    let mut field = SignalField::new(&cfg, &mut rng);
    assert_eq!(field.draw_count(), cfg.trail_length);
    for frame in 0..500 {
        field.update(&cfg, &mut rng, frame as f32 / 30.0);
        for sig in field.signals() {
            assert!(sig.history.len() <= cfg.trail_length + 1);
            assert!((0.0..=1.0).contains(&sig.progress));
            assert!(sig.lane < cfg.line_count);
        }
    }
    assert_eq!(field.positions().len(), cfg.signal_count * cfg.trail_length * 3);
}

#[test]
fn first_update_pads_trail_with_head() {
    let cfg = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(3);
    let mut field = SignalField::new(&cfg, &mut rng);
    field.update(&cfg, &mut rng, 0.0);
    for i in 0..cfg.signal_count {
        let trail = field.trail_positions(i);
        let head = &trail[0..3];
        for xyz in trail.chunks_exact(3) {
            assert_eq!(xyz, head);
        }
    }
}

#[test]
fn wrapped_signals_restart_their_trail() {
    // every step overshoots the end of the lane
    let cfg = SceneConfig {
        speed_global: 2000.0,
        ..SceneConfig::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let mut field = SignalField::new(&cfg, &mut rng);
    for frame in 0..20 {
        field.update(&cfg, &mut rng, frame as f32 * 0.05);
        for sig in field.signals() {
            assert_eq!(sig.history.len(), 1);
            assert!(sig.color_index < field.palette().len());
        }
    }
}

#[test]
fn head_color_is_palette_times_opacity() {
    let cfg = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(9);
    let mut field = SignalField::new(&cfg, &mut rng);
    field.update(&cfg, &mut rng, 0.0);
    for (i, sig) in field.signals().iter().enumerate() {
        assert!((sig.opacity - cfg.signal_fade_step).abs() < 1e-6);
        let expect = field.palette()[sig.color_index] * sig.opacity;
        let head = &field.trail_colors(i)[0..3];
        assert!((head[0] - expect.x).abs() < 1e-6);
        assert!((head[1] - expect.y).abs() < 1e-6);
        assert!((head[2] - expect.z).abs() < 1e-6);
    }
}

#[test]
fn signal_opacity_fades_in_to_one() {
    let cfg = SceneConfig::default();
    let mut rng = StdRng::seed_from_u64(21);
    let mut field = SignalField::new(&cfg, &mut rng);
    let mut prev = vec![0.0f32; cfg.signal_count];
    for frame in 0..80 {
        field.update(&cfg, &mut rng, frame as f32 / 30.0);
        for (i, sig) in field.signals().iter().enumerate() {
            assert!(sig.opacity >= prev[i]);
            assert!(sig.opacity <= 1.0);
            prev[i] = sig.opacity;
        }
    }
    assert!(field.signals().iter().all(|s| s.opacity == 1.0));
}
