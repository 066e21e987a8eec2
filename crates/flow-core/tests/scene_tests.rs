// End-to-end scene scenarios driven frame by frame.

use flow_core::{
    derive_config, pack_lines, pack_signals, DeviceInfo, FadeMode, FlowError, FlowScene,
    FrameOutcome, FrameTick, LineVertex, SceneConfig,
};

fn small_config() -> SceneConfig {
    SceneConfig {
        line_count: 25,
        signal_count: 15,
        trail_length: 3,
        ..SceneConfig::default()
    }
}

/// Drive `frames` executed frames, one per interval (plus slack so none are
/// throttled). Returns the timestamp after the last one.
fn drive(scene: &mut FlowScene, start_ms: f64, frames: usize) -> f64 {
    let step = scene.config().frame_interval_ms() + 1.0;
    let mut now = start_ms;
    for _ in 0..frames {
        match scene.frame(now) {
            FrameOutcome::Rendered { .. } => {}
            other => panic!("frame at {} not rendered: {:?}", now, other),
        }
        now += step;
    }
    now
}

#[test]
fn two_hundred_frames_stay_bounded_and_finite() {
    let mut scene = FlowScene::new(small_config(), 42).unwrap();
    scene.start(0.0);
    drive(&mut scene, 0.0, 200);

    assert_eq!(scene.scheduler().frame_count(), 200);
    for sig in scene.signals().signals() {
        assert!(sig.history.len() <= 4);
    }
    assert!(scene.lines().positions().iter().all(|v| v.is_finite()));
    assert!(scene.signals().positions().iter().all(|v| v.is_finite()));
    assert!(scene.signals().colors().iter().all(|v| v.is_finite()));

    let mut verts: Vec<LineVertex> = Vec::new();
    pack_lines(scene.lines(), scene.config().color_line, &mut verts);
    assert_eq!(verts.len(), 25 * scene.config().segment_count);
    pack_signals(scene.signals(), &mut verts);
    assert_eq!(verts.len(), 15 * 3);
    assert!(verts.iter().all(|v| v.color[3] == 1.0));
}

#[test]
fn offscreen_scene_does_not_write() {
    let mut scene = FlowScene::new(small_config(), 1).unwrap();
    scene.start(0.0);
    let now = drive(&mut scene, 0.0, 10);

    let lines_gen = scene.lines().generation();
    let signals_gen = scene.signals().generation();
    scene.set_intersecting(false);
    let mut t = now;
    for _ in 0..50 {
        assert_eq!(scene.frame(t), FrameOutcome::Paused);
        t += 16.0;
    }
    assert_eq!(scene.lines().generation(), lines_gen);
    assert_eq!(scene.signals().generation(), signals_gen);

    scene.set_intersecting(true);
    assert!(matches!(scene.frame(t), FrameOutcome::Rendered { .. }));
    assert!(scene.lines().generation() > lines_gen);
    assert!(scene.signals().generation() > signals_gen);
}

#[test]
fn hidden_page_pauses_like_offscreen() {
    let mut scene = FlowScene::new(small_config(), 2).unwrap();
    scene.start(0.0);
    let now = drive(&mut scene, 0.0, 3);
    let signals_gen = scene.signals().generation();
    scene.set_page_hidden(true);
    assert_eq!(scene.frame(now), FrameOutcome::Paused);
    assert_eq!(scene.signals().generation(), signals_gen);
    scene.set_page_hidden(false);
    assert!(matches!(scene.frame(now), FrameOutcome::Rendered { .. }));
}

#[test]
fn dispose_mid_animation_stops_all_writes() {
    let mut scene = FlowScene::new(small_config(), 3).unwrap();
    scene.start(0.0);
    let now = drive(&mut scene, 0.0, 20);
    assert!(scene.is_running());

    scene.dispose();
    assert!(scene.is_disposed());
    assert!(!scene.is_running());
    let lines_gen = scene.lines().generation();
    let signals_gen = scene.signals().generation();

    let mut t = now;
    for _ in 0..20 {
        assert_eq!(scene.frame(t), FrameOutcome::Stopped);
        t += 100.0;
    }
    scene.step(&FrameTick {
        time_sec: 99.0,
        dt_sec: 0.1,
        frame: 999,
        update_lines: true,
    });
    scene.start(t);
    assert_eq!(scene.frame(t), FrameOutcome::Stopped);
    assert_eq!(scene.lines().generation(), lines_gen);
    assert_eq!(scene.signals().generation(), signals_gen);
    assert!(scene.signals().signals().is_empty());

    // idempotent
    scene.dispose();
    assert!(scene.is_disposed());
}

#[test]
fn start_lays_out_lanes_before_first_frame() {
    let mut scene = FlowScene::new(small_config(), 4).unwrap();
    assert_eq!(scene.frame(0.0), FrameOutcome::Stopped);
    assert_eq!(scene.lines().generation(), 0);
    scene.start(0.0);
    assert_eq!(scene.lines().generation(), 1);
    assert!(scene.lines().positions().iter().any(|v| *v != 0.0));
}

#[test]
fn low_tier_updates_lines_every_third_frame() {
    let info = DeviceInfo {
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)".into(),
        hardware_concurrency: 6,
        prefers_reduced_motion: false,
    };
    let mut scene = FlowScene::new(derive_config(&info), 5).unwrap();
    scene.start(0.0);
    let step = scene.config().frame_interval_ms() + 1.0;
    let mut updated = Vec::new();
    for i in 0..6 {
        match scene.frame(i as f64 * step) {
            FrameOutcome::Rendered { lines_updated, .. } => updated.push(lines_updated),
            other => panic!("unexpected {:?}", other),
        }
    }
    assert_eq!(updated, vec![false, false, true, false, false, true]);
    // one layout on start plus two recomputes
    assert_eq!(scene.lines().generation(), 3);
    // signals move every executed frame
    assert_eq!(scene.signals().generation(), 6);
}

#[test]
fn wall_clock_fade_evens_out_low_tier() {
    let low = |mode| SceneConfig {
        target_fps: 20.0,
        line_update_stride: 3,
        fade_mode: mode,
        ..small_config()
    };
    let lane0 = |cfg: SceneConfig| {
        let mut scene = FlowScene::new(cfg, 6).unwrap();
        scene.start(0.0);
        drive(&mut scene, 0.0, 30);
        scene.lines().fades()[0].opacity
    };
    let per_update = lane0(low(FadeMode::PerUpdate));
    let wall_clock = lane0(low(FadeMode::WallClock));
    assert!((per_update - 0.1).abs() < 1e-4, "per-update {}", per_update);
    assert!(wall_clock > per_update, "{} <= {}", wall_clock, per_update);
}

#[test]
fn step_can_be_driven_without_clock() {
    let mut scene = FlowScene::new(small_config(), 8).unwrap();
    for i in 0..5 {
        scene.step(&FrameTick {
            time_sec: i as f32 / 30.0,
            dt_sec: 1.0 / 30.0,
            frame: i + 1,
            update_lines: true,
        });
    }
    assert_eq!(scene.lines().generation(), 5);
    assert_eq!(scene.signals().generation(), 5);
}

#[test]
fn fps_is_reported_after_a_second() {
    let mut scene = FlowScene::new(small_config(), 9).unwrap();
    scene.start(0.0);
    let step = scene.config().frame_interval_ms() + 1.0;
    let mut reported = None;
    let mut t = 0.0;
    while t < 1500.0 {
        if let FrameOutcome::Rendered { fps: Some(fps), .. } = scene.frame(t) {
            reported = Some(fps);
            break;
        }
        t += step;
    }
    let fps = reported.expect("no fps report");
    assert!((25..=31).contains(&fps), "fps {}", fps);
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = SceneConfig {
        segment_count: 0,
        ..SceneConfig::default()
    };
    assert!(matches!(
        FlowScene::new(cfg, 0),
        Err(FlowError::InvalidConfig(_))
    ));
}

#[test]
fn seeded_scenes_are_deterministic() {
    let mut a = FlowScene::new(small_config(), 77).unwrap();
    let mut b = FlowScene::new(small_config(), 77).unwrap();
    a.start(0.0);
    b.start(0.0);
    drive(&mut a, 0.0, 40);
    drive(&mut b, 0.0, 40);
    assert_eq!(a.signals().positions(), b.signals().positions());
    assert_eq!(a.lines().positions(), b.lines().positions());
}
